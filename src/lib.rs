//! apt-post-rs - Core library for CLDATA parsing and G-code generation.
//!
//! This library postprocesses APT-style CLDATA motion programs (linear and
//! circular moves, feed rates, rapid-traverse markers) into numbered
//! G-code blocks for a 5-axis machine with two rotary axes.
//!
//! # Example
//!
//! ```no_run
//! use apt_post_rs::{post_cldata_file, PostConfig};
//! use std::path::Path;
//!
//! let config = PostConfig::default();
//! let gcode = post_cldata_file(Path::new("part.apt"), &config).unwrap();
//! println!("{}", gcode);
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod transform;
pub mod validation;

// Re-exports for convenience
pub use config::{FeedMode, PostConfig, RotaryConvention, Units};
pub use error::{PostError, Result};
pub use generator::{generate_program, post_program, translate, MachineState};
pub use model::{ArcDirection, Axis, Block, Command, Vec3, Word};
pub use parser::{parse_cldata_file, parse_program, parse_record};
pub use transform::resolve_orientation;
pub use validation::{validate_commands, ValidationResult};

/// Postprocess a CLDATA file into G-code.
///
/// This is the main high-level function that performs the full pipeline:
/// 1. Parse the CLDATA file
/// 2. Validate the command stream (warnings are logged, not fatal)
/// 3. Generate the numbered G-code program
///
/// # Arguments
///
/// * `input_path` - Path to the input CLDATA file
/// * `config` - Postprocessor configuration for the run
///
/// # Returns
///
/// The generated G-code program as a string.
pub fn post_cldata_file(input_path: &std::path::Path, config: &PostConfig) -> Result<String> {
    let commands = parse_cldata_file(input_path)?;

    let validation = validate_commands(&commands);
    for warning in &validation.warnings {
        tracing::warn!("{}", warning);
    }
    for error in &validation.errors {
        tracing::error!("{}", error);
    }

    generate_program(&commands, config)
}
