pub mod models;
pub mod services;
pub mod validation;

pub use models::*;
pub use services::*;
pub use validation::{validate_arrival_window, validate_guest_fields, FieldIssue};
