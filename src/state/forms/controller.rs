//! Intake wizard controller
//!
//! Owns the form values and the current step. All edits go through here so
//! the step rules can be exercised without a terminal.

use super::field::FieldName;
use super::form_state::FormState;
use super::steps::Step;
use chrono::{Local, NaiveDate};
use thiserror::Error;

/// Required fields left blank
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please complete: {}", self.labels().join(", "))]
pub struct ValidationError {
    pub missing: Vec<FieldName>,
}

impl ValidationError {
    pub fn labels(&self) -> Vec<&'static str> {
        self.missing.iter().map(|f| f.label()).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntakeController {
    form: FormState,
    current_step: Step,
    validation_error: Option<ValidationError>,
}

impl IntakeController {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn current_step(&self) -> Step {
        self.current_step
    }

    /// Error from the last failed `advance`, if still pending
    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.validation_error.as_ref()
    }

    /// Required fields of `step` that are still blank
    pub fn missing_fields(&self, step: Step) -> Vec<FieldName> {
        missing_fields(&self.form, step)
    }

    pub fn can_advance(&self, step: Step) -> bool {
        self.missing_fields(step).is_empty()
    }

    /// Move to the next step if the current one is complete.
    ///
    /// On failure the step does not change and the error stays pending until
    /// the next successful `advance` or any `retreat`.
    pub fn advance(&mut self) -> Result<Step, ValidationError> {
        let missing = self.missing_fields(self.current_step);
        if !missing.is_empty() {
            let error = ValidationError { missing };
            tracing::debug!(step = self.current_step.number(), "{error}");
            self.validation_error = Some(error.clone());
            return Err(error);
        }

        self.validation_error = None;
        if let Some(next) = self.current_step.next() {
            tracing::info!(from = self.current_step.number(), to = next.number(), "Advanced");
            self.current_step = next;
        }
        Ok(self.current_step)
    }

    pub fn retreat(&mut self) -> Step {
        self.validation_error = None;
        if let Some(prev) = self.current_step.prev() {
            self.current_step = prev;
        }
        self.current_step
    }

    pub fn set_text(&mut self, field: FieldName, value: impl Into<String>) {
        self.form.set_text(field, value);
    }

    pub fn push_char(&mut self, field: FieldName, c: char) {
        self.form.push_char(field, c);
    }

    pub fn pop_char(&mut self, field: FieldName) {
        self.form.pop_char(field);
    }

    pub fn clear_field(&mut self, field: FieldName) {
        self.form.clear_field(field);
    }

    /// Step a select/date/time field, dates counted from the local calendar
    pub fn cycle_choice(&mut self, field: FieldName, forward: bool) {
        self.cycle_choice_from(field, forward, Local::now().date_naive());
    }

    pub fn cycle_choice_from(&mut self, field: FieldName, forward: bool, today: NaiveDate) {
        self.form.cycle(field, forward, today);
    }

    /// Back to an empty form on step 1
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub fn missing_fields(form: &FormState, step: Step) -> Vec<FieldName> {
    step.required_fields()
        .iter()
        .copied()
        .filter(|f| form.is_blank(*f))
        .collect()
}

pub fn validate_all(form: &FormState) -> Result<(), ValidationError> {
    let missing: Vec<FieldName> = Step::INPUT_STEPS
        .iter()
        .flat_map(|s| missing_fields(form, *s))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { missing })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::state::forms::field::{BudgetBand, ContactMethod, ProjectType, Timeline};
    use pretty_assertions::assert_eq;

    /// Controller with steps 1-3 filled in
    pub(crate) fn filled_controller() -> IntakeController {
        let mut controller = IntakeController::new();
        controller.set_text(FieldName::Name, "Grace Hopper");
        controller.set_text(FieldName::Email, "grace@example.com");
        let form = &mut controller.form;
        form.project_type = Some(ProjectType::Website);
        form.budget = Some(BudgetBand::From5kTo10k);
        form.timeline = Some(Timeline::Asap);
        form.contact_method = Some(ContactMethod::Email);
        controller.set_text(FieldName::Description, "Rebuild our compiler docs site");
        controller
    }

    #[test]
    fn test_can_advance_false_iff_required_field_blank() {
        for step in Step::INPUT_STEPS {
            for field in step.required_fields() {
                let mut controller = filled_controller();
                assert!(controller.can_advance(step));
                controller.clear_field(*field);
                assert!(!controller.can_advance(step), "{field:?} on {step:?}");
            }
        }
    }

    #[test]
    fn test_whitespace_only_blocks_advance() {
        let mut controller = filled_controller();
        controller.set_text(FieldName::Email, "  \n ");
        assert!(!controller.can_advance(Step::AboutYou));
    }

    #[test]
    fn test_optional_fields_do_not_block() {
        let controller = filled_controller();
        assert!(controller.form().company.is_empty());
        assert!(controller.can_advance(Step::AboutYou));
        assert!(controller.can_advance(Step::ContactAndFiles));
    }

    #[test]
    fn test_advance_blocked_keeps_step_and_data() {
        let mut controller = IntakeController::new();
        controller.set_text(FieldName::Name, "Grace");

        let err = controller.advance().unwrap_err();
        assert_eq!(err.missing, vec![FieldName::Email]);
        assert_eq!(err.to_string(), "Please complete: Email");
        assert_eq!(controller.current_step(), Step::AboutYou);
        assert_eq!(controller.form().name, "Grace");
        assert_eq!(controller.validation_error(), Some(&err));
    }

    #[test]
    fn test_advance_through_all_steps() {
        let mut controller = filled_controller();
        assert_eq!(controller.advance(), Ok(Step::ProjectDetails));
        assert_eq!(controller.advance(), Ok(Step::ContactAndFiles));
        assert_eq!(controller.advance(), Ok(Step::Review));
        // No step past review
        assert_eq!(controller.advance(), Ok(Step::Review));
    }

    #[test]
    fn test_successful_advance_clears_pending_error() {
        let mut controller = IntakeController::new();
        assert!(controller.advance().is_err());
        controller.set_text(FieldName::Name, "Grace");
        controller.set_text(FieldName::Email, "grace@example.com");
        assert!(controller.advance().is_ok());
        assert!(controller.validation_error().is_none());
    }

    #[test]
    fn test_retreat_clears_error_and_stops_at_first_step() {
        let mut controller = filled_controller();
        controller.advance().unwrap();
        controller.clear_field(FieldName::Budget);
        assert!(controller.advance().is_err());

        assert_eq!(controller.retreat(), Step::AboutYou);
        assert!(controller.validation_error().is_none());
        assert_eq!(controller.retreat(), Step::AboutYou);
    }

    #[test]
    fn test_validate_all_lists_missing_across_steps() {
        let mut controller = filled_controller();
        controller.clear_field(FieldName::Email);
        controller.clear_field(FieldName::Timeline);
        controller.clear_field(FieldName::ContactMethod);

        let err = validate_all(controller.form()).unwrap_err();
        assert_eq!(
            err.missing,
            vec![FieldName::Email, FieldName::Timeline, FieldName::ContactMethod]
        );
    }

    #[test]
    fn test_cycle_choice_from() {
        let mut controller = IntakeController::new();
        let today = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        controller.cycle_choice_from(FieldName::PreferredDate, true, today);
        assert_eq!(
            controller.form().preferred_date,
            NaiveDate::from_ymd_opt(2026, 2, 1)
        );
        controller.cycle_choice_from(FieldName::Budget, true, today);
        assert_eq!(controller.form().budget, Some(BudgetBand::Under5k));
    }

    #[test]
    fn test_reset() {
        let mut controller = filled_controller();
        controller.advance().unwrap();
        controller.reset();
        assert_eq!(controller.current_step(), Step::AboutYou);
        assert_eq!(controller.form(), &FormState::default());
    }
}
