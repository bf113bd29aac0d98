pub mod calculations;
pub mod form;
pub mod format;
pub mod models;

pub use calculations::{TaxCalculator, compute};
pub use form::{FieldError, ValidationErrors, parse_form};
pub use models::*;
