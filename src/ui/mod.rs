//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod review;
mod success;
mod wizard;

use crate::app::App;
use crate::state::{Step, View};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);

    match app.state.current_view {
        View::Wizard if app.state.current_step() == Step::Review => {
            review::draw(frame, main_area, app)
        }
        View::Wizard => wizard::draw(frame, main_area, app),
        View::Success => success::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);

    // Error dialog overlays everything
    if let Some(message) = app.state.current_error() {
        components::render_error_dialog(frame, message);
    }
}
