//! Intake form domain layer
//!
//! Type-safe field values, the step table, and the wizard controller.

mod controller;
mod field;
mod form_state;
mod steps;

pub use controller::{IntakeController, ValidationError};
pub use field::{FieldKind, FieldName};
#[cfg(test)]
pub use field::ContactMethod;
pub use form_state::FormState;
pub use steps::Step;

pub(crate) use controller::validate_all;

#[cfg(test)]
pub(crate) use controller::tests::filled_controller;
