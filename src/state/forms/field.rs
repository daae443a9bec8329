//! Intake form field catalogue and choice values

use serde::{Deserialize, Serialize};

/// Every field the intake form collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Name,
    Email,
    Company,
    ProjectType,
    Budget,
    Timeline,
    Description,
    ContactMethod,
    PreferredDate,
    PreferredTime,
    ReferralSource,
}

/// How a field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    MultilineText,
    Choice,
    Date,
    Time,
}

impl FieldName {
    pub const ALL: [FieldName; 11] = [
        FieldName::Name,
        FieldName::Email,
        FieldName::Company,
        FieldName::ProjectType,
        FieldName::Budget,
        FieldName::Timeline,
        FieldName::Description,
        FieldName::ContactMethod,
        FieldName::PreferredDate,
        FieldName::PreferredTime,
        FieldName::ReferralSource,
    ];

    /// Human-readable label, used in validation messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Full name",
            Self::Email => "Email",
            Self::Company => "Company",
            Self::ProjectType => "Project type",
            Self::Budget => "Budget",
            Self::Timeline => "Timeline",
            Self::Description => "Project description",
            Self::ContactMethod => "Preferred contact method",
            Self::PreferredDate => "Preferred call date",
            Self::PreferredTime => "Preferred call time",
            Self::ReferralSource => "How did you hear about us?",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Name | Self::Email | Self::Company => FieldKind::Text,
            Self::Description => FieldKind::MultilineText,
            Self::ProjectType
            | Self::Budget
            | Self::Timeline
            | Self::ContactMethod
            | Self::ReferralSource => FieldKind::Choice,
            Self::PreferredDate => FieldKind::Date,
            Self::PreferredTime => FieldKind::Time,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind(), FieldKind::Text | FieldKind::MultilineText)
    }
}

/// A closed set of options for a select field
pub trait Choice: Copy + PartialEq + Sized + 'static {
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;
}

/// Step a select value through `None` and every option, wrapping at both ends
pub fn cycle_choice<T: Choice>(current: Option<T>, forward: bool) -> Option<T> {
    let options = T::ALL;
    let position = current.and_then(|c| options.iter().position(|o| *o == c));
    match (position, forward) {
        (None, true) => options.first().copied(),
        (None, false) => options.last().copied(),
        (Some(i), true) => options.get(i + 1).copied(),
        (Some(0), false) => None,
        (Some(i), false) => options.get(i - 1).copied(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Website,
    WebApp,
    MobileApp,
    Ecommerce,
    Branding,
    Consulting,
    Other,
}

impl Choice for ProjectType {
    const ALL: &'static [Self] = &[
        Self::Website,
        Self::WebApp,
        Self::MobileApp,
        Self::Ecommerce,
        Self::Branding,
        Self::Consulting,
        Self::Other,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::Website => "Website",
            Self::WebApp => "Web application",
            Self::MobileApp => "Mobile app",
            Self::Ecommerce => "E-commerce",
            Self::Branding => "Branding & design",
            Self::Consulting => "Consulting",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetBand {
    #[serde(rename = "under_5k")]
    Under5k,
    #[serde(rename = "5k_10k")]
    From5kTo10k,
    #[serde(rename = "10k_25k")]
    From10kTo25k,
    #[serde(rename = "25k_50k")]
    From25kTo50k,
    #[serde(rename = "over_50k")]
    Over50k,
    #[serde(rename = "not_sure")]
    NotSure,
}

impl Choice for BudgetBand {
    const ALL: &'static [Self] = &[
        Self::Under5k,
        Self::From5kTo10k,
        Self::From10kTo25k,
        Self::From25kTo50k,
        Self::Over50k,
        Self::NotSure,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::Under5k => "Under $5k",
            Self::From5kTo10k => "$5k - $10k",
            Self::From10kTo25k => "$10k - $25k",
            Self::From25kTo50k => "$25k - $50k",
            Self::Over50k => "$50k+",
            Self::NotSure => "Not sure yet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeline {
    #[serde(rename = "asap")]
    Asap,
    #[serde(rename = "1_3_months")]
    OneToThreeMonths,
    #[serde(rename = "3_6_months")]
    ThreeToSixMonths,
    #[serde(rename = "flexible")]
    Flexible,
}

impl Choice for Timeline {
    const ALL: &'static [Self] = &[
        Self::Asap,
        Self::OneToThreeMonths,
        Self::ThreeToSixMonths,
        Self::Flexible,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::Asap => "As soon as possible",
            Self::OneToThreeMonths => "1-3 months",
            Self::ThreeToSixMonths => "3-6 months",
            Self::Flexible => "Flexible",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    Email,
    Phone,
    VideoCall,
}

impl Choice for ContactMethod {
    const ALL: &'static [Self] = &[Self::Email, Self::Phone, Self::VideoCall];

    fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Phone => "Phone call",
            Self::VideoCall => "Video call",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralSource {
    Search,
    SocialMedia,
    Referral,
    Portfolio,
    Other,
}

impl Choice for ReferralSource {
    const ALL: &'static [Self] = &[
        Self::Search,
        Self::SocialMedia,
        Self::Referral,
        Self::Portfolio,
        Self::Other,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::Search => "Search engine",
            Self::SocialMedia => "Social media",
            Self::Referral => "Friend or colleague",
            Self::Portfolio => "Saw my portfolio",
            Self::Other => "Other",
        }
    }
}
