//! Domain services module

pub mod validation;

pub use validation::{ensure_valid, validate, ValidationError};
