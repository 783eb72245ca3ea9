//! Tool-axis orientation resolution for the rotary axes.
//!
//! This is the single place the vector-to-angle math lives. Both observed
//! machine conventions are selectable through [`RotaryConvention`]; which
//! one matches a physical machine is a commissioning decision, not
//! something this module guesses at.

use crate::config::{round, RotaryConvention};
use crate::error::{PostError, Result};
use crate::model::Vec3;

/// Resolve a tool-axis direction vector into (B, C) rotary angles in
/// degrees, rounded to output precision.
///
/// The vector is normalized defensively; a magnitude too small to define a
/// direction fails with the source line in the error. The B tilt is
/// `acos(z)` under both conventions. For the vertical tool axis `(0,0,1)`
/// both angles are 0, because `atan2(0, 0)` is defined as 0.
pub fn resolve_orientation(
    line: usize,
    vector: Vec3,
    convention: RotaryConvention,
) -> Result<(f64, f64)> {
    let unit = vector.normalized().ok_or(PostError::DegenerateVector {
        line,
        i: vector.x,
        j: vector.y,
        k: vector.z,
    })?;

    let theta_b = unit.z.clamp(-1.0, 1.0).acos();
    let theta_c = match convention {
        RotaryConvention::AzimuthFromY => unit.x.atan2(unit.y),
        RotaryConvention::AzimuthFromX => unit.y.atan2(unit.x),
    };

    Ok((
        round::coord(theta_b.to_degrees()),
        round::coord(theta_c.to_degrees()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_vertical_tool_axis_is_pole() {
        let v = Vec3::new(0.0, 0.0, 1.0);
        for convention in [
            RotaryConvention::AzimuthFromY,
            RotaryConvention::AzimuthFromX,
        ] {
            assert_eq!(resolve_orientation(1, v, convention).unwrap(), (0.0, 0.0));
        }
    }

    #[test]
    fn test_inverted_tool_axis() {
        let v = Vec3::new(0.0, 0.0, -1.0);
        let (b, c) = resolve_orientation(1, v, RotaryConvention::AzimuthFromY).unwrap();
        assert_eq!(b, 180.0);
        assert_eq!(c, 0.0);
    }

    #[test]
    fn test_conventions_differ_off_axis() {
        let v = Vec3::new(0.6, 0.0, 0.8);
        let (b, c) = resolve_orientation(1, v, RotaryConvention::AzimuthFromY).unwrap();
        assert_eq!(b, 36.8699);
        assert_eq!(c, 90.0);

        let (b, c) = resolve_orientation(1, v, RotaryConvention::AzimuthFromX).unwrap();
        assert_eq!(b, 36.8699);
        assert_eq!(c, 0.0);
    }

    #[test]
    fn test_non_unit_input_is_normalized() {
        let unit = resolve_orientation(1, Vec3::new(0.0, 0.0, 1.0), RotaryConvention::AzimuthFromY)
            .unwrap();
        let scaled =
            resolve_orientation(1, Vec3::new(0.0, 0.0, 7.5), RotaryConvention::AzimuthFromY)
                .unwrap();
        assert_eq!(unit, scaled);
    }

    #[test]
    fn test_degenerate_vector() {
        let err = resolve_orientation(12, Vec3::new(0.0, 0.0, 0.0), RotaryConvention::AzimuthFromY)
            .unwrap_err();
        match err {
            PostError::DegenerateVector { line, .. } => assert_eq!(line, 12),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
