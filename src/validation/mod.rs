//! Program validation module.

mod validate;

pub use validate::{validate_commands, ValidationResult};
