//! Intake form values and their mapping onto the remote schema

use super::field::{
    cycle_choice, BudgetBand, Choice, ContactMethod, FieldName, ProjectType, ReferralSource,
    Timeline,
};
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;

/// First bookable call slot
const FIRST_SLOT: (u32, u32) = (9, 0);
/// Last bookable call slot
const LAST_SLOT: (u32, u32) = (17, 30);
const SLOT_MINUTES: usize = 30;

/// Everything the visitor has entered so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub company: String,
    pub project_type: Option<ProjectType>,
    pub budget: Option<BudgetBand>,
    pub timeline: Option<Timeline>,
    pub description: String,
    pub contact_method: Option<ContactMethod>,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<NaiveTime>,
    pub referral_source: Option<ReferralSource>,
}

impl FormState {
    /// True when the field trims to nothing or no option is selected
    pub fn is_blank(&self, field: FieldName) -> bool {
        match field {
            FieldName::Name => self.name.trim().is_empty(),
            FieldName::Email => self.email.trim().is_empty(),
            FieldName::Company => self.company.trim().is_empty(),
            FieldName::Description => self.description.trim().is_empty(),
            FieldName::ProjectType => self.project_type.is_none(),
            FieldName::Budget => self.budget.is_none(),
            FieldName::Timeline => self.timeline.is_none(),
            FieldName::ContactMethod => self.contact_method.is_none(),
            FieldName::PreferredDate => self.preferred_date.is_none(),
            FieldName::PreferredTime => self.preferred_time.is_none(),
            FieldName::ReferralSource => self.referral_source.is_none(),
        }
    }

    /// Display value for rendering; empty when unset
    pub fn display_value(&self, field: FieldName) -> String {
        fn label<T: Choice>(value: Option<T>) -> String {
            value.map(|v| v.label().to_string()).unwrap_or_default()
        }

        match field {
            FieldName::Name => self.name.clone(),
            FieldName::Email => self.email.clone(),
            FieldName::Company => self.company.clone(),
            FieldName::Description => self.description.clone(),
            FieldName::ProjectType => label(self.project_type),
            FieldName::Budget => label(self.budget),
            FieldName::Timeline => label(self.timeline),
            FieldName::ContactMethod => label(self.contact_method),
            FieldName::ReferralSource => label(self.referral_source),
            FieldName::PreferredDate => self
                .preferred_date
                .map(|d| d.format("%a %d %b %Y").to_string())
                .unwrap_or_default(),
            FieldName::PreferredTime => self
                .preferred_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
        }
    }

    fn text_mut(&mut self, field: FieldName) -> Option<&mut String> {
        match field {
            FieldName::Name => Some(&mut self.name),
            FieldName::Email => Some(&mut self.email),
            FieldName::Company => Some(&mut self.company),
            FieldName::Description => Some(&mut self.description),
            _ => None,
        }
    }

    /// Replace a text field's value; ignored for non-text fields
    pub fn set_text(&mut self, field: FieldName, value: impl Into<String>) {
        if let Some(text) = self.text_mut(field) {
            *text = value.into();
        }
    }

    pub fn push_char(&mut self, field: FieldName, c: char) {
        if let Some(text) = self.text_mut(field) {
            text.push(c);
        }
    }

    pub fn pop_char(&mut self, field: FieldName) {
        if let Some(text) = self.text_mut(field) {
            text.pop();
        }
    }

    pub fn clear_field(&mut self, field: FieldName) {
        match field {
            FieldName::Name => self.name.clear(),
            FieldName::Email => self.email.clear(),
            FieldName::Company => self.company.clear(),
            FieldName::Description => self.description.clear(),
            FieldName::ProjectType => self.project_type = None,
            FieldName::Budget => self.budget = None,
            FieldName::Timeline => self.timeline = None,
            FieldName::ContactMethod => self.contact_method = None,
            FieldName::PreferredDate => self.preferred_date = None,
            FieldName::PreferredTime => self.preferred_time = None,
            FieldName::ReferralSource => self.referral_source = None,
        }
    }

    /// Step a select, date or time field. Text fields are left alone.
    ///
    /// Dates start at the day after `today` and never go earlier; times walk
    /// the half-hour slots of the working day.
    pub fn cycle(&mut self, field: FieldName, forward: bool, today: NaiveDate) {
        match field {
            FieldName::ProjectType => {
                self.project_type = cycle_choice(self.project_type, forward)
            }
            FieldName::Budget => self.budget = cycle_choice(self.budget, forward),
            FieldName::Timeline => self.timeline = cycle_choice(self.timeline, forward),
            FieldName::ContactMethod => {
                self.contact_method = cycle_choice(self.contact_method, forward)
            }
            FieldName::ReferralSource => {
                self.referral_source = cycle_choice(self.referral_source, forward)
            }
            FieldName::PreferredDate => {
                self.preferred_date = step_date(self.preferred_date, forward, today)
            }
            FieldName::PreferredTime => {
                self.preferred_time = step_time(self.preferred_time, forward)
            }
            FieldName::Name | FieldName::Email | FieldName::Company | FieldName::Description => {}
        }
    }

    /// Fields for record creation. Blank optional values are sent as null.
    pub fn to_remote_fields(&self) -> serde_json::Value {
        fn optional(text: &str) -> Option<&str> {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        }

        let row = NewHireRequest {
            name: self.name.trim(),
            email: self.email.trim(),
            company: optional(&self.company),
            project_type: self.project_type,
            budget: self.budget,
            timeline: self.timeline,
            description: self.description.trim(),
            contact_method: self.contact_method,
            preferred_date: self.preferred_date,
            preferred_time: self.preferred_time.map(|t| t.format("%H:%M").to_string()),
            referral_source: self.referral_source,
            status: "new",
            attachments: Vec::new(),
        };
        // Plain struct of strings and unit enums, cannot fail
        serde_json::to_value(row).unwrap_or_default()
    }
}

/// Row shape of the remote hire request table
#[derive(Debug, Serialize)]
struct NewHireRequest<'a> {
    name: &'a str,
    email: &'a str,
    company: Option<&'a str>,
    project_type: Option<ProjectType>,
    budget: Option<BudgetBand>,
    timeline: Option<Timeline>,
    description: &'a str,
    contact_method: Option<ContactMethod>,
    preferred_date: Option<NaiveDate>,
    preferred_time: Option<String>,
    referral_source: Option<ReferralSource>,
    status: &'static str,
    attachments: Vec<String>,
}

fn step_date(current: Option<NaiveDate>, forward: bool, today: NaiveDate) -> Option<NaiveDate> {
    let earliest = today + Duration::days(1);
    match (current, forward) {
        (None, true) => Some(earliest),
        (None, false) => None,
        (Some(d), true) => Some(d + Duration::days(1)),
        (Some(d), false) if d <= earliest => None,
        (Some(d), false) => Some(d - Duration::days(1)),
    }
}

/// All bookable half-hour slots
pub fn time_slots() -> Vec<NaiveTime> {
    let first = FIRST_SLOT.0 * 60 + FIRST_SLOT.1;
    let last = LAST_SLOT.0 * 60 + LAST_SLOT.1;
    (first..=last)
        .step_by(SLOT_MINUTES)
        .filter_map(|minutes| NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0))
        .collect()
}

fn step_time(current: Option<NaiveTime>, forward: bool) -> Option<NaiveTime> {
    let slots = time_slots();
    let position = current.and_then(|t| slots.iter().position(|s| *s == t));
    match (position, forward) {
        (None, true) => slots.first().copied(),
        (None, false) => slots.last().copied(),
        (Some(i), true) => slots.get(i + 1).copied(),
        (Some(0), false) => None,
        (Some(i), false) => slots.get(i - 1).copied(),
    }
}
