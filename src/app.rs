//! Application state and core logic

use crate::backend::{BackendClient, BackendClientTrait};
use crate::config::IntakeConfig;
use crate::state::{AppState, FieldName, FocusTarget, PendingFile, Step, View};
use crate::submission::{submit_and_reset, SubmissionCoordinator, SubmissionError};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Client for the hosted backend
    backend: Box<dyn BackendClientTrait>,
    config: IntakeConfig,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance
    pub fn new(config: IntakeConfig) -> Result<Self> {
        let backend = BackendClient::new(&config)?;
        let configured = backend.is_configured();
        Ok(Self::with_backend(config, Box::new(backend), configured))
    }

    pub fn with_backend(
        config: IntakeConfig,
        backend: Box<dyn BackendClientTrait>,
        backend_configured: bool,
    ) -> Self {
        let state = AppState {
            backend_configured,
            ..Default::default()
        };
        Self {
            state,
            backend,
            config,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Handle a key press
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return Ok(());
        }

        // Error dialog swallows other input until dismissed
        if self.state.current_error().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        match self.state.current_view {
            View::Wizard => self.handle_wizard_key(key).await,
            View::Success => self.handle_success_key(key).await,
        }
        Ok(())
    }

    async fn handle_wizard_key(&mut self, key: KeyEvent) {
        let step = self.state.current_step();
        let focused = self.state.focused();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Tab => self.state.next_focus(),
            KeyCode::BackTab => self.state.prev_focus(),
            KeyCode::Char('s') if ctrl && step == Step::Review => self.submit().await,
            KeyCode::Char('n') if ctrl => self.state.advance(),
            KeyCode::Esc => {
                if step == Step::AboutYou {
                    self.quit = true;
                } else {
                    self.state.retreat();
                }
            }
            KeyCode::Enter => match focused {
                // Enter in the description adds a newline
                Some(FocusTarget::Field(FieldName::Description)) => {
                    self.state.input_char('\n');
                }
                Some(FocusTarget::AttachPath) => self.stage_from_path().await,
                _ if step == Step::Review => self.submit().await,
                _ => self.state.advance(),
            },
            KeyCode::Left => self.state.cycle_focused(false),
            KeyCode::Right => self.state.cycle_focused(true),
            KeyCode::Up if focused == Some(FocusTarget::AttachmentList) => {
                self.state.select_prev_attachment()
            }
            KeyCode::Down if focused == Some(FocusTarget::AttachmentList) => {
                self.state.select_next_attachment()
            }
            KeyCode::Delete => self.state.delete_focused(),
            KeyCode::Backspace => self.state.backspace(),
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.state.input_char(c)
            }
            _ => {}
        }
    }

    async fn handle_success_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.state.start_new_request(),
            KeyCode::Char('c') => self.copy_reference(),
            KeyCode::Char('l') => self.fetch_signed_links().await,
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            _ => {}
        }
    }

    /// Load the file named in the path input and stage it
    async fn stage_from_path(&mut self) {
        let raw = self.state.attach_path.trim();
        if raw.is_empty() {
            return;
        }
        let path = expand_home(raw);
        match PendingFile::from_path(&path).await {
            Ok(file) => self.state.stage_file(file),
            Err(e) => self.state.status_message = Some(format!("{e:#}")),
        }
    }

    async fn submit(&mut self) {
        let coordinator = SubmissionCoordinator::new(
            self.backend.as_ref(),
            &self.config.table,
            &self.config.bucket,
        );

        let result = submit_and_reset(
            &coordinator,
            &mut self.state.intake,
            &mut self.state.attachments,
        )
        .await;

        match result {
            Ok(receipt) => self.state.show_receipt(receipt),
            Err(SubmissionError::Validation(e)) => self.state.submit_error = Some(e),
            Err(e @ SubmissionError::Remote(_)) => self.state.push_error(e.to_string()),
        }
    }

    fn copy_reference(&mut self) {
        let Some(receipt) = &self.state.receipt else {
            return;
        };
        let reference = receipt.record.id.clone();
        let result = arboard::Clipboard::new().and_then(|mut c| c.set_text(reference));
        self.state.status_message = Some(match result {
            Ok(()) => "Copied request reference".to_string(),
            Err(e) => format!("Clipboard unavailable: {e}"),
        });
    }

    /// Fetch time-limited links for every uploaded file
    async fn fetch_signed_links(&mut self) {
        let Some(receipt) = &self.state.receipt else {
            return;
        };
        let uploaded = receipt.uploaded.clone();
        let mut links = Vec::new();
        for (name, path) in uploaded {
            let result = self
                .backend
                .get_signed_url(&self.config.bucket, &path, self.config.signed_url_ttl_secs)
                .await;
            match result {
                Ok(url) => links.push((path, url)),
                Err(e) => self.state.push_error(format!("Could not link {name}: {e}")),
            }
        }
        self.state.signed_links = links;
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(dirs) = directories::BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(raw)
}
