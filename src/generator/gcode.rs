//! G-code block formatting and numbered program writing.

use std::fmt::Write;

use crate::model::{Block, Word};

/// Format a position or angle value for output (4 decimal places).
pub fn format_coord(value: f64) -> String {
    // -0.0 must not reach the output
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.4}", value)
}

/// Format a feed value for output (1 decimal place).
pub fn format_feed(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.1}", value)
}

/// Render a structured block to its final text line (no trailing newline).
///
/// Word order and suppression decisions were already made upstream; this
/// is a pure rendering step.
pub fn format_block(block: &Block) -> String {
    let mut line = format!("N{}", block.number);
    for word in &block.words {
        match word {
            Word::Motion(code) => write!(line, " {}", code).unwrap(),
            Word::Axis(axis, value) => {
                write!(line, " {}{}", axis.letter(), format_coord(*value)).unwrap()
            }
            Word::Feed(value) => write!(line, " F{}", format_feed(*value)).unwrap(),
        }
    }
    line
}

/// Buffered G-code writer.
///
/// Blocks arrive fully numbered; the writer only renders and accumulates
/// them.
#[derive(Debug, Default)]
pub struct GcodeWriter {
    buffer: String,
}

impl GcodeWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a structured block as one output line.
    pub fn write_block(&mut self, block: &Block) {
        writeln!(self.buffer, "{}", format_block(block)).unwrap();
    }

    /// Write a numbered line of preformatted text (header/trailer blocks).
    pub fn write_numbered(&mut self, number: u64, content: &str) {
        writeln!(self.buffer, "N{} {}", number, content).unwrap();
    }

    /// Get the generated G-code.
    pub fn output(&self) -> &str {
        &self.buffer
    }

    /// Take the generated G-code.
    pub fn take_output(self) -> String {
        self.buffer
    }
}
