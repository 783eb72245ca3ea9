//! Configuration and numeric constants for the postprocessor.

use serde::{Deserialize, Serialize};

/// Floating-point comparison epsilon for coordinate-scale values.
pub const EPS: f64 = 0.0001;

/// Magnitude below which a tool-axis vector is considered degenerate.
pub const VEC_EPS: f64 = 1e-9;

/// Conversion factor: mm to inch.
pub const CONV_MM_INCH: f64 = 25.4;

/// Decimal places for position and angle words.
pub const COORD_DECIMALS: u32 = 4;

/// Decimal places for feed words.
pub const FEED_DECIMALS: u32 = 1;

/// Default starting block number.
pub const DEFAULT_BLOCK_START: u64 = 0;

/// Default block number increment.
pub const DEFAULT_BLOCK_INCREMENT: u64 = 5;

/// Unit of measurement for program coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Units {
    #[default]
    Millimeters,
    Inches,
}

impl Units {
    /// Parse a unit name as given on the command line.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "millimeters" => Some(Units::Millimeters),
            "inch" | "in" | "inches" => Some(Units::Inches),
            _ => None,
        }
    }

    /// Get the conversion factor to convert from this unit to millimeters.
    pub fn to_mm_factor(&self) -> f64 {
        match self {
            Units::Millimeters => 1.0,
            Units::Inches => CONV_MM_INCH,
        }
    }

    /// Get the scale factor that converts values in this unit to `other`.
    pub fn factor_to(&self, other: Units) -> f64 {
        self.to_mm_factor() / other.to_mm_factor()
    }

    /// Get the unit-declaration G-code for this unit system.
    pub fn gcode(&self) -> &'static str {
        match self {
            Units::Millimeters => "G71",
            Units::Inches => "G70",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Units::Millimeters => write!(f, "mm"),
            Units::Inches => write!(f, "inch"),
        }
    }
}

/// Mapping from a tool-axis direction vector to the C rotary angle.
///
/// The B angle is `acos(z)` under both conventions; they differ in which
/// machine axis the C rotation is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotaryConvention {
    /// C measured from the +Y axis: `c = atan2(x, y)`.
    #[default]
    AzimuthFromY,
    /// C measured from the +X axis: `c = atan2(y, x)`.
    AzimuthFromX,
}

impl RotaryConvention {
    /// Parse a convention name as given on the command line.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "from-y" | "y" => Some(RotaryConvention::AzimuthFromY),
            "from-x" | "x" => Some(RotaryConvention::AzimuthFromX),
            _ => None,
        }
    }
}

/// How `FEDRAT/MMPM` records reach the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeedMode {
    /// Buffer the feed and attach it as a trailing F word to the next
    /// feed-mode motion block.
    #[default]
    Inline,
    /// Emit each feed change as its own numbered block.
    Standalone,
}

impl FeedMode {
    /// Parse a feed mode name as given on the command line.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "inline" => Some(FeedMode::Inline),
            "standalone" => Some(FeedMode::Standalone),
            _ => None,
        }
    }
}

/// Postprocessor configuration, fixed for the duration of a run.
#[derive(Debug, Clone)]
pub struct PostConfig {
    /// Scale applied to every coordinate and feed value on output.
    pub unit_scale: f64,
    /// Active tool-axis to rotary-angle mapping.
    pub rotary_convention: RotaryConvention,
    /// Block number the ladder starts from; the first emitted block is
    /// `start_block + block_increment`.
    pub start_block: u64,
    /// Block number increment per emitted block.
    pub block_increment: u64,
    /// Feed emission behavior.
    pub feed_mode: FeedMode,
    /// Startup blocks emitted (numbered) before the first translated block.
    pub header_blocks: Vec<String>,
    /// Shutdown blocks emitted (numbered) after the last translated block.
    pub trailer_blocks: Vec<String>,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            unit_scale: 1.0,
            rotary_convention: RotaryConvention::default(),
            start_block: DEFAULT_BLOCK_START,
            block_increment: DEFAULT_BLOCK_INCREMENT,
            feed_mode: FeedMode::default(),
            header_blocks: Vec::new(),
            trailer_blocks: Vec::new(),
        }
    }
}

impl PostConfig {
    /// Configuration for a program written in `program_units` that must be
    /// emitted in `output_units`.
    pub fn for_units(program_units: Units, output_units: Units) -> Self {
        Self {
            unit_scale: program_units.factor_to(output_units),
            ..Default::default()
        }
    }

    /// The standard startup sequence: absolute positioning, unit
    /// declaration, spindle on, coolant on.
    pub fn standard_header(output_units: Units) -> Vec<String> {
        vec![
            "G90".to_string(),
            output_units.gcode().to_string(),
            "M03".to_string(),
            "M08".to_string(),
        ]
    }

    /// The standard shutdown sequence: coolant off, spindle off, program end.
    pub fn standard_trailer() -> Vec<String> {
        vec!["M09".to_string(), "M05".to_string(), "M30".to_string()]
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Check if a float is approximately zero.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() < EPS
    }
}

/// Utility functions for fixed-decimal rounding.
pub mod round {
    use super::{COORD_DECIMALS, FEED_DECIMALS};

    /// Round to a fixed number of decimal places, half away from zero.
    ///
    /// Negative zero is canonicalized so it never reaches the output.
    #[inline]
    pub fn to_decimals(value: f64, places: u32) -> f64 {
        let scale = 10f64.powi(places as i32);
        let rounded = (value * scale).round() / scale;
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }

    /// Round a position or angle value to its output precision.
    #[inline]
    pub fn coord(value: f64) -> f64 {
        to_decimals(value, COORD_DECIMALS)
    }

    /// Round a feed value to its output precision.
    #[inline]
    pub fn feed(value: f64) -> f64 {
        to_decimals(value, FEED_DECIMALS)
    }
}
