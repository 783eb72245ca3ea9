//! Pre-generation validation of a parsed CLDATA program.
//!
//! These are soft checks over the whole command stream; hard per-record
//! failures (malformed numbers, degenerate vectors, tilted arc planes)
//! surface from the parser and translation engine instead.

use crate::config::VEC_EPS;
use crate::model::Command;

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }
}

/// Validate a parsed program before generation.
pub fn validate_commands(commands: &[(usize, Command)]) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if !commands.iter().any(|(_, c)| c.is_motion()) {
        result.add_error("program contains no motion records");
    }

    let mut feed_seen = false;
    let mut feedless_motion_reported = false;
    let mut rapid_pending = false;

    for (line, command) in commands {
        match command {
            Command::FeedRate { mm_per_min } => {
                if *mm_per_min <= 0.0 {
                    result.add_warning(format!(
                        "record {line}: non-positive feed value {mm_per_min}"
                    ));
                }
                feed_seen = true;
            }
            Command::Rapid => rapid_pending = true,
            Command::Goto { orientation, .. } => {
                let is_feed_move = !rapid_pending;
                rapid_pending = false;

                if is_feed_move && !feed_seen && !feedless_motion_reported {
                    feedless_motion_reported = true;
                    result.add_warning(format!(
                        "record {line}: feed move before any FEDRAT/MMPM record; \
                         the controller default feed applies"
                    ));
                }

                if let Some(vector) = orientation {
                    let magnitude = vector.magnitude();
                    if magnitude > VEC_EPS && (magnitude - 1.0).abs() > 0.001 {
                        result.add_warning(format!(
                            "record {line}: tool-axis vector is not unit length \
                             (magnitude {magnitude:.6}); it will be normalized"
                        ));
                    }
                }
            }
            Command::Circle { .. } => {
                if !feed_seen && !feedless_motion_reported {
                    feedless_motion_reported = true;
                    result.add_warning(format!(
                        "record {line}: feed move before any FEDRAT/MMPM record; \
                         the controller default feed applies"
                    ));
                }
            }
            Command::Ignored => {}
        }
    }

    if rapid_pending {
        result.add_warning("trailing RAPID is never consumed by a GOTO");
    }

    result
}
