//! Application state definitions

use super::attachments::{format_size, AttachmentStager, PendingFile};
use super::forms::{FieldName, IntakeController, Step, ValidationError};
use crate::submission::SubmissionReceipt;
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Wizard,
    Success,
}

/// Something on the current step that can take keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Field(FieldName),
    /// Path input for adding a file
    AttachPath,
    /// List of staged files
    AttachmentList,
}

#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,

    // Wizard
    pub intake: IntakeController,
    pub attachments: AttachmentStager,
    pub focus_index: usize,
    pub attach_path: String,
    pub selected_attachment: usize,
    /// Cross-step check that failed when submitting from review
    pub submit_error: Option<ValidationError>,

    // Submission result
    pub receipt: Option<SubmissionReceipt>,
    /// (storage path, url) fetched for the success screen
    pub signed_links: Vec<(String, String)>,

    // UI state
    pub backend_configured: bool,
    pub status_message: Option<String>,
    pub error_queue: VecDeque<String>,
}

impl AppState {
    pub fn current_step(&self) -> Step {
        self.intake.current_step()
    }

    /// Focusable targets of the current step, in tab order
    pub fn focus_targets(&self) -> Vec<FocusTarget> {
        let step = self.current_step();
        let mut targets: Vec<FocusTarget> =
            step.fields().iter().copied().map(FocusTarget::Field).collect();
        if step == Step::ContactAndFiles {
            targets.push(FocusTarget::AttachPath);
            targets.push(FocusTarget::AttachmentList);
        }
        targets
    }

    pub fn focused(&self) -> Option<FocusTarget> {
        self.focus_targets().get(self.focus_index).copied()
    }

    pub fn next_focus(&mut self) {
        let count = self.focus_targets().len();
        if count > 0 {
            self.focus_index = (self.focus_index + 1) % count;
        }
    }

    pub fn prev_focus(&mut self) {
        let count = self.focus_targets().len();
        if count == 0 {
            return;
        }
        if self.focus_index == 0 {
            self.focus_index = count - 1;
        } else {
            self.focus_index -= 1;
        }
    }

    /// Type a character into the focused text input
    pub fn input_char(&mut self, c: char) {
        match self.focused() {
            Some(FocusTarget::Field(field)) if field.is_text() => self.intake.push_char(field, c),
            Some(FocusTarget::AttachPath) => self.attach_path.push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focused() {
            Some(FocusTarget::Field(field)) => self.intake.pop_char(field),
            Some(FocusTarget::AttachPath) => {
                self.attach_path.pop();
            }
            _ => {}
        }
    }

    /// Left/Right on a select, date or time field
    pub fn cycle_focused(&mut self, forward: bool) {
        if let Some(FocusTarget::Field(field)) = self.focused() {
            if !field.is_text() {
                self.intake.cycle_choice(field, forward);
            }
        }
    }

    /// Delete: clear a field or drop the selected attachment
    pub fn delete_focused(&mut self) {
        match self.focused() {
            Some(FocusTarget::Field(field)) => self.intake.clear_field(field),
            Some(FocusTarget::AttachPath) => self.attach_path.clear(),
            Some(FocusTarget::AttachmentList) => self.unstage_selected(),
            None => {}
        }
    }

    pub fn advance(&mut self) {
        let before = self.current_step();
        if self.intake.advance().is_ok() && self.current_step() != before {
            self.focus_index = 0;
            self.submit_error = None;
        }
    }

    pub fn retreat(&mut self) {
        self.intake.retreat();
        self.focus_index = 0;
        self.submit_error = None;
    }

    pub fn stage_file(&mut self, file: PendingFile) {
        let name = file.name.clone();
        let size = file.size();
        match self.attachments.stage(file) {
            Ok(()) => {
                self.attach_path.clear();
                self.selected_attachment = self.attachments.len() - 1;
                self.status_message = Some(format!("Attached {name} ({})", format_size(size)));
            }
            Err(rejection) => self.status_message = Some(rejection.to_string()),
        }
    }

    pub fn unstage_selected(&mut self) {
        if let Some(removed) = self.attachments.unstage(self.selected_attachment) {
            self.status_message = Some(format!("Removed {}", removed.name));
            let len = self.attachments.len();
            if self.selected_attachment >= len && len > 0 {
                self.selected_attachment = len - 1;
            }
        }
    }

    pub fn select_next_attachment(&mut self) {
        let len = self.attachments.len();
        if len > 0 && self.selected_attachment < len - 1 {
            self.selected_attachment += 1;
        }
    }

    pub fn select_prev_attachment(&mut self) {
        self.selected_attachment = self.selected_attachment.saturating_sub(1);
    }

    /// Switch to the success screen for a saved request
    pub fn show_receipt(&mut self, receipt: SubmissionReceipt) {
        self.receipt = Some(receipt);
        self.signed_links.clear();
        self.current_view = View::Success;
        self.focus_index = 0;
        self.selected_attachment = 0;
        self.attach_path.clear();
        self.submit_error = None;
        self.status_message = None;
    }

    /// Signed URL fetched for an uploaded file, by storage path
    pub fn signed_link(&self, storage_path: &str) -> Option<&str> {
        self.signed_links
            .iter()
            .find(|(path, _)| path == storage_path)
            .map(|(_, url)| url.as_str())
    }

    /// Leave the success screen for a fresh form
    pub fn start_new_request(&mut self) {
        self.receipt = None;
        self.signed_links.clear();
        self.current_view = View::Wizard;
        self.status_message = None;
    }

    pub fn push_error(&mut self, message: String) {
        tracing::warn!("{message}");
        self.error_queue.push_back(message);
    }

    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Record;
    use crate::state::filled_controller;

    fn state_on(step: Step) -> AppState {
        let mut state = AppState {
            intake: filled_controller(),
            ..Default::default()
        };
        while state.current_step() != step {
            state.advance();
        }
        state
    }

    #[test]
    fn test_focus_wraps() {
        let mut state = AppState::default();
        assert_eq!(state.focused(), Some(FocusTarget::Field(FieldName::Name)));
        state.prev_focus();
        assert_eq!(state.focused(), Some(FocusTarget::Field(FieldName::Company)));
        state.next_focus();
        assert_eq!(state.focused(), Some(FocusTarget::Field(FieldName::Name)));
    }

    #[test]
    fn test_contact_step_has_attachment_targets() {
        let state = state_on(Step::ContactAndFiles);
        let targets = state.focus_targets();
        assert_eq!(targets.len(), 7);
        assert_eq!(targets[5], FocusTarget::AttachPath);
        assert_eq!(targets[6], FocusTarget::AttachmentList);
    }

    #[test]
    fn test_review_has_no_focus_targets() {
        let mut state = state_on(Step::Review);
        assert!(state.focused().is_none());
        state.next_focus();
        state.input_char('x');
        assert_eq!(state.focus_index, 0);
    }

    #[test]
    fn test_typing_goes_to_focused_text_field() {
        let mut state = AppState::default();
        state.input_char('A');
        state.input_char('l');
        state.backspace();
        state.next_focus();
        state.input_char('a');
        assert_eq!(state.intake.form().name, "A");
        assert_eq!(state.intake.form().email, "a");
    }

    #[test]
    fn test_typing_ignored_on_choice_field() {
        let mut state = state_on(Step::ProjectDetails);
        let before = state.intake.form().clone();
        state.input_char('z');
        assert_eq!(state.intake.form(), &before);
    }

    #[test]
    fn test_cycle_focused_choice() {
        let mut state = state_on(Step::ProjectDetails);
        state.delete_focused();
        assert!(state.intake.form().project_type.is_none());
        state.cycle_focused(true);
        assert!(state.intake.form().project_type.is_some());
    }

    #[test]
    fn test_advance_resets_focus_only_on_step_change() {
        let mut state = AppState::default();
        state.next_focus();
        state.advance();
        assert_eq!(state.current_step(), Step::AboutYou);
        assert_eq!(state.focus_index, 1);
        assert!(state.intake.validation_error().is_some());

        let mut state = state_on(Step::AboutYou);
        state.next_focus();
        state.advance();
        assert_eq!(state.current_step(), Step::ProjectDetails);
        assert_eq!(state.focus_index, 0);
    }

    #[test]
    fn test_stage_and_unstage_updates_status() {
        let mut state = state_on(Step::ContactAndFiles);
        state.attach_path = "/tmp/a.pdf".to_string();
        state.stage_file(PendingFile::new("a.pdf", "application/pdf", vec![0; 2048]));
        assert!(state.attach_path.is_empty());
        assert_eq!(state.status_message.as_deref(), Some("Attached a.pdf (2.0 KB)"));

        state.stage_file(PendingFile::new("b.exe", "application/x-msdownload", vec![0]));
        assert_eq!(state.attachments.len(), 1);
        assert!(state.status_message.as_deref().unwrap().contains("b.exe"));

        state.unstage_selected();
        assert!(state.attachments.is_empty());
        assert_eq!(state.status_message.as_deref(), Some("Removed a.pdf"));
    }

    #[test]
    fn test_attachment_selection_bounds() {
        let mut state = AppState::default();
        state.select_next_attachment();
        assert_eq!(state.selected_attachment, 0);
        for name in ["a.txt", "b.txt"] {
            state.stage_file(PendingFile::new(name, "text/plain", vec![1]));
        }
        state.select_prev_attachment();
        state.select_prev_attachment();
        assert_eq!(state.selected_attachment, 0);
        state.select_next_attachment();
        state.select_next_attachment();
        assert_eq!(state.selected_attachment, 1);
        state.unstage_selected();
        assert_eq!(state.selected_attachment, 0);
    }

    #[test]
    fn test_error_queue_is_fifo() {
        let mut state = AppState::default();
        state.push_error("first".to_string());
        state.push_error("second".to_string());
        assert_eq!(state.current_error(), Some("first"));
        state.dismiss_error();
        assert_eq!(state.current_error(), Some("second"));
        state.dismiss_error();
        assert_eq!(state.current_error(), None);
    }

    #[test]
    fn test_signed_links_keyed_by_storage_path() {
        let mut state = AppState::default();
        state.signed_links = vec![
            ("r/1-cv.pdf".to_string(), "https://f/1".to_string()),
            ("r/2-cv.pdf".to_string(), "https://f/2".to_string()),
        ];
        assert_eq!(state.signed_link("r/2-cv.pdf"), Some("https://f/2"));
        assert_eq!(state.signed_link("r/1-cv.pdf"), Some("https://f/1"));
        assert_eq!(state.signed_link("r/3-cv.pdf"), None);
    }

    #[test]
    fn test_receipt_round_trip_through_views() {
        let mut state = AppState::default();
        state.show_receipt(SubmissionReceipt {
            record: Record::new("1"),
            uploaded: Vec::new(),
            warning: None,
        });
        assert_eq!(state.current_view, View::Success);
        state.start_new_request();
        assert_eq!(state.current_view, View::Wizard);
        assert!(state.receipt.is_none());
    }
}
