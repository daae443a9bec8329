//! Application state module

mod app_state;
mod attachments;
mod forms;

pub use app_state::*;
pub use attachments::*;
pub use forms::*;

pub(crate) use forms::validate_all;

#[cfg(test)]
pub(crate) use forms::filled_controller;
