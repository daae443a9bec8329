//! Wizard step definitions

use super::field::FieldName;

/// The four wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Step {
    #[default]
    AboutYou = 1,
    ProjectDetails = 2,
    ContactAndFiles = 3,
    Review = 4,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::AboutYou,
        Step::ProjectDetails,
        Step::ContactAndFiles,
        Step::Review,
    ];

    /// Steps whose fields are re-checked before submission
    pub const INPUT_STEPS: [Step; 3] = [Step::AboutYou, Step::ProjectDetails, Step::ContactAndFiles];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.number() == n)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::AboutYou => "About You",
            Self::ProjectDetails => "Project Details",
            Self::ContactAndFiles => "Contact & Files",
            Self::Review => "Review & Submit",
        }
    }

    /// Fields shown on this step, in display order
    pub fn fields(&self) -> &'static [FieldName] {
        match self {
            Self::AboutYou => &[FieldName::Name, FieldName::Email, FieldName::Company],
            Self::ProjectDetails => &[FieldName::ProjectType, FieldName::Budget, FieldName::Timeline],
            Self::ContactAndFiles => &[
                FieldName::Description,
                FieldName::ContactMethod,
                FieldName::PreferredDate,
                FieldName::PreferredTime,
                FieldName::ReferralSource,
            ],
            Self::Review => &[],
        }
    }

    /// Fields that must be non-blank before leaving this step
    pub fn required_fields(&self) -> &'static [FieldName] {
        match self {
            Self::AboutYou => &[FieldName::Name, FieldName::Email],
            Self::ProjectDetails => &[FieldName::ProjectType, FieldName::Budget, FieldName::Timeline],
            Self::ContactAndFiles => &[FieldName::Description, FieldName::ContactMethod],
            Self::Review => &[],
        }
    }

    pub fn is_required(&self, field: FieldName) -> bool {
        self.required_fields().contains(&field)
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }
}
