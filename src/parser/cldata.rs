//! CLDATA record parser.
//!
//! One source record maps to exactly one [`Command`]. Keywords outside the
//! acted-on set (tool changes, comments, PARTNO headers and the like) map
//! to [`Command::Ignored`] rather than failing; malformed records for a
//! recognized keyword fail loudly with the source line.

use std::path::Path;

use crate::error::{PostError, Result};
use crate::model::{Command, Vec3};

/// Parse one raw record into a command.
///
/// `line` is the 1-based source line, used only for error context; parsing
/// itself is pure.
pub fn parse_record(line: usize, raw: &str) -> Result<Command> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Command::Ignored);
    }

    let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    let (keyword, first_value) = match fields[0].split_once('/') {
        Some((kw, rest)) => (kw.trim(), Some(rest.trim())),
        None => (fields[0], None),
    };

    match (keyword, first_value) {
        ("GOTO", first) => parse_goto(line, trimmed, first, &fields[1..]),
        ("CIRCLE", first) => parse_circle(line, trimmed, first, &fields[1..]),
        ("FEDRAT", Some("MMPM")) => parse_fedrat(line, trimmed, &fields[1..]),
        ("RAPID", _) => Ok(Command::Rapid),
        _ => Ok(Command::Ignored),
    }
}

/// Collect the numeric value fields of a record: the remainder of field 0
/// after the keyword slash, followed by the remaining comma-separated
/// fields.
fn value_fields<'a>(first: Option<&'a str>, rest: &[&'a str]) -> Vec<&'a str> {
    let mut values = Vec::with_capacity(rest.len() + 1);
    if let Some(first) = first {
        values.push(first);
    }
    values.extend_from_slice(rest);
    values
}

/// Parse one numeric field. `field` is the 1-based value position.
fn parse_number(line: usize, field: usize, value: &str) -> Result<f64> {
    value.parse().map_err(|_| PostError::InvalidNumber {
        line,
        field,
        value: value.to_string(),
    })
}

/// Parse every value field of a record in order.
fn parse_numbers(line: usize, values: &[&str]) -> Result<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| parse_number(line, i + 1, v))
        .collect()
}

/// `GOTO/x,y,z` or `GOTO/x,y,z,i,j,k`.
fn parse_goto(line: usize, record: &str, first: Option<&str>, rest: &[&str]) -> Result<Command> {
    let values = value_fields(first, rest);
    match values.len() {
        3 => {
            let v = parse_numbers(line, &values)?;
            Ok(Command::Goto {
                position: Vec3::new(v[0], v[1], v[2]),
                orientation: None,
            })
        }
        6 => {
            let v = parse_numbers(line, &values)?;
            Ok(Command::Goto {
                position: Vec3::new(v[0], v[1], v[2]),
                orientation: Some(Vec3::new(v[3], v[4], v[5])),
            })
        }
        found => Err(PostError::ArityMismatch {
            line,
            keyword: "GOTO".to_string(),
            expected: "3 or 6",
            found,
            record: record.to_string(),
        }),
    }
}

/// `CIRCLE/` with the fixed 11-field layout: end point (1-3), arc-plane
/// normal (4-6), center offsets I,J,K (7-9), two trailing fields (10-11)
/// that must still be numeric.
fn parse_circle(line: usize, record: &str, first: Option<&str>, rest: &[&str]) -> Result<Command> {
    let values = value_fields(first, rest);
    if values.len() != 11 {
        return Err(PostError::ArityMismatch {
            line,
            keyword: "CIRCLE".to_string(),
            expected: "11",
            found: values.len(),
            record: record.to_string(),
        });
    }
    let v = parse_numbers(line, &values)?;
    Ok(Command::Circle {
        end: Vec3::new(v[0], v[1], v[2]),
        normal: Vec3::new(v[3], v[4], v[5]),
        center_offset: Vec3::new(v[6], v[7], v[8]),
    })
}

/// `FEDRAT/MMPM,value`.
fn parse_fedrat(line: usize, record: &str, rest: &[&str]) -> Result<Command> {
    if rest.len() != 1 {
        return Err(PostError::ArityMismatch {
            line,
            keyword: "FEDRAT/MMPM".to_string(),
            expected: "1",
            found: rest.len(),
            record: record.to_string(),
        });
    }
    let value = parse_number(line, 1, rest[0])?;
    Ok(Command::FeedRate { mm_per_min: value })
}

/// Parse a full program, keeping the 1-based line number of every record.
///
/// Ignored records are kept so validation can see the whole stream; the
/// translation engine skips them without touching state.
pub fn parse_program(source: &str) -> Result<Vec<(usize, Command)>> {
    source
        .lines()
        .enumerate()
        .map(|(i, raw)| Ok((i + 1, parse_record(i + 1, raw)?)))
        .collect()
}

/// Parse a CLDATA file from a path.
pub fn parse_cldata_file(path: &Path) -> Result<Vec<(usize, Command)>> {
    if !path.exists() {
        return Err(PostError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(PostError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    parse_program(&content)
}
