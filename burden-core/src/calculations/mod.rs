//! Tax burden calculation modules.
//!
//! [`burden`] holds the calculator itself; [`common`] the rounding and
//! guarded-division helpers it shares with the formatter.

pub mod burden;
pub mod common;

pub use burden::{TaxCalculator, compute};
