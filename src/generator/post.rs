//! Translation engine: CLDATA commands to numbered G-code blocks.
//!
//! One pass, one record at a time. All modal decisions (rapid consumption,
//! feed buffering, redundant-axis-word suppression, block numbering) are
//! made here against a single exclusively-owned [`MachineState`]; the
//! formatter downstream only renders what this module decided.

use std::collections::BTreeMap;

use crate::config::{float_cmp, round, FeedMode, PostConfig};
use crate::error::{PostError, Result};
use crate::model::{ArcDirection, Axis, Block, Command, Word};
use crate::parser::parse_program;
use crate::transform::resolve_orientation;

use super::gcode::GcodeWriter;

/// Modal machine state threaded through one translation run.
///
/// Created once at translation start, mutated only by [`translate`], and
/// discarded after the last record.
#[derive(Debug)]
pub struct MachineState {
    config: PostConfig,
    /// Number of the last emitted block; the next block is this plus the
    /// configured increment.
    last_block_number: u64,
    /// Set by RAPID, consumed by the next GOTO.
    pending_rapid: bool,
    /// Feed buffered for the next feed-mode motion block (inline mode).
    pending_feed: Option<f64>,
    /// Last value emitted per axis word, for suppression.
    last_axis_values: BTreeMap<Axis, f64>,
}

impl MachineState {
    /// Create the state for a run with the given configuration.
    pub fn new(config: PostConfig) -> Self {
        Self {
            last_block_number: config.start_block,
            pending_rapid: false,
            pending_feed: None,
            last_axis_values: BTreeMap::new(),
            config,
        }
    }

    /// Advance the block-number ladder and return the new number.
    fn next_block_number(&mut self) -> u64 {
        self.last_block_number += self.config.block_increment;
        self.last_block_number
    }

    /// Suppression check for one axis word.
    ///
    /// Always records the new value; returns a word only when the value is
    /// absent from the state or differs from the last emitted one. Values
    /// must already be rounded to output precision so the comparison is a
    /// plain equality on the emitted grid.
    fn axis_word(&mut self, axis: Axis, value: f64) -> Option<Word> {
        let unchanged = self
            .last_axis_values
            .get(&axis)
            .is_some_and(|prev| *prev == value);
        self.last_axis_values.insert(axis, value);
        if unchanged {
            None
        } else {
            Some(Word::Axis(axis, value))
        }
    }
}

/// Translate one command, producing zero or one output block.
///
/// `line` is the record's 1-based source line, carried into any error.
pub fn translate(state: &mut MachineState, line: usize, command: &Command) -> Result<Vec<Block>> {
    match command {
        Command::Ignored => Ok(Vec::new()),

        Command::Rapid => {
            state.pending_rapid = true;
            Ok(Vec::new())
        }

        Command::FeedRate { mm_per_min } => {
            let feed = round::feed(mm_per_min * state.config.unit_scale);
            match state.config.feed_mode {
                FeedMode::Inline => {
                    state.pending_feed = Some(feed);
                    Ok(Vec::new())
                }
                FeedMode::Standalone => {
                    let mut block = Block::new(state.next_block_number());
                    block.push(Word::Feed(feed));
                    Ok(vec![block])
                }
            }
        }

        Command::Goto {
            position,
            orientation,
        } => {
            // the rapid flag is consumed whether or not the rest succeeds
            let rapid = std::mem::take(&mut state.pending_rapid);

            let scaled = position.scaled(state.config.unit_scale);
            let mut axes = vec![
                (Axis::X, scaled.x),
                (Axis::Y, scaled.y),
                (Axis::Z, scaled.z),
            ];
            if let Some(vector) = orientation {
                let (b, c) = resolve_orientation(line, *vector, state.config.rotary_convention)?;
                axes.push((Axis::B, b));
                axes.push((Axis::C, c));
            }

            let mut block = Block::new(state.next_block_number());
            block.push(Word::Motion(if rapid { "G00" } else { "G01" }));
            for (axis, value) in axes {
                if let Some(word) = state.axis_word(axis, round::coord(value)) {
                    block.push(word);
                }
            }
            if !rapid {
                if let Some(feed) = state.pending_feed.take() {
                    block.push(Word::Feed(feed));
                }
            }
            Ok(vec![block])
        }

        Command::Circle {
            end,
            normal,
            center_offset,
        } => {
            // XY plane only; a tilted normal would need G18/G19 handling
            if !float_cmp::approx_zero(normal.x) || !float_cmp::approx_zero(normal.y) {
                return Err(PostError::UnsupportedPlane {
                    line,
                    i: normal.x,
                    j: normal.y,
                    k: normal.z,
                });
            }
            let direction = ArcDirection::from_sign(normal.z);

            let end = end.scaled(state.config.unit_scale);
            let center = center_offset.scaled(state.config.unit_scale);

            let mut block = Block::new(state.next_block_number());
            block.push(Word::Motion(direction.motion_word()));
            for (axis, value) in [
                (Axis::X, end.x),
                (Axis::Y, end.y),
                (Axis::Z, end.z),
                (Axis::I, center.x),
                (Axis::J, center.y),
                (Axis::K, center.z),
            ] {
                if let Some(word) = state.axis_word(axis, round::coord(value)) {
                    block.push(word);
                }
            }
            if let Some(feed) = state.pending_feed.take() {
                block.push(Word::Feed(feed));
            }
            Ok(vec![block])
        }
    }
}

/// Generate a complete numbered program from parsed commands.
///
/// Header and trailer blocks from the configuration consume block numbers
/// through the same ladder as translated blocks.
pub fn generate_program(commands: &[(usize, Command)], config: &PostConfig) -> Result<String> {
    let mut state = MachineState::new(config.clone());
    let mut writer = GcodeWriter::new();

    for content in &config.header_blocks {
        let number = state.next_block_number();
        writer.write_numbered(number, content);
    }

    for (line, command) in commands {
        for block in translate(&mut state, *line, command)? {
            writer.write_block(&block);
        }
    }

    for content in &config.trailer_blocks {
        let number = state.next_block_number();
        writer.write_numbered(number, content);
    }

    Ok(writer.take_output())
}

/// Parse and translate a CLDATA program in one step.
pub fn post_program(source: &str, config: &PostConfig) -> Result<String> {
    let commands = parse_program(source)?;
    generate_program(&commands, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vec3;
    use pretty_assertions::assert_eq;

    fn goto(x: f64, y: f64, z: f64) -> Command {
        Command::Goto {
            position: Vec3::new(x, y, z),
            orientation: None,
        }
    }

    fn words(state: &mut MachineState, line: usize, cmd: &Command) -> Vec<Word> {
        let blocks = translate(state, line, cmd).unwrap();
        assert_eq!(blocks.len(), 1);
        blocks.into_iter().next().unwrap().words
    }

    #[test]
    fn test_first_motion_emits_all_axes() {
        let mut state = MachineState::new(PostConfig::default());
        let w = words(&mut state, 1, &goto(1.0, 2.0, 3.0));
        assert_eq!(
            w,
            vec![
                Word::Motion("G01"),
                Word::Axis(Axis::X, 1.0),
                Word::Axis(Axis::Y, 2.0),
                Word::Axis(Axis::Z, 3.0),
            ]
        );
    }

    #[test]
    fn test_redundant_axis_words_suppressed() {
        let mut state = MachineState::new(PostConfig::default());
        words(&mut state, 1, &goto(1.0, 2.0, 3.0));
        let w = words(&mut state, 2, &goto(1.0, 2.5, 3.0));
        assert_eq!(w, vec![Word::Motion("G01"), Word::Axis(Axis::Y, 2.5)]);
    }

    #[test]
    fn test_identical_goto_still_emits_block() {
        let mut state = MachineState::new(PostConfig::default());
        words(&mut state, 1, &goto(1.0, 2.0, 3.0));
        let blocks = translate(&mut state, 2, &goto(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].words, vec![Word::Motion("G01")]);
        assert_eq!(blocks[0].number, 10);
    }

    #[test]
    fn test_rapid_consumed_by_next_goto() {
        let mut state = MachineState::new(PostConfig::default());
        assert!(translate(&mut state, 1, &Command::Rapid).unwrap().is_empty());
        let w = words(&mut state, 2, &goto(0.0, 0.0, 50.0));
        assert_eq!(w[0], Word::Motion("G00"));
        // the flag does not persist past one GOTO
        let w = words(&mut state, 3, &goto(1.0, 0.0, 50.0));
        assert_eq!(w[0], Word::Motion("G01"));
    }

    #[test]
    fn test_orientation_words() {
        let mut state = MachineState::new(PostConfig::default());
        let cmd = Command::Goto {
            position: Vec3::new(0.0, 0.0, 0.0),
            orientation: Some(Vec3::new(0.6, 0.0, 0.8)),
        };
        let w = words(&mut state, 1, &cmd);
        assert!(w.contains(&Word::Axis(Axis::B, 36.8699)));
        assert!(w.contains(&Word::Axis(Axis::C, 90.0)));
        // no orientation on the next record carries B/C forward silently
        let w = words(&mut state, 2, &goto(1.0, 0.0, 0.0));
        assert_eq!(w, vec![Word::Motion("G01"), Word::Axis(Axis::X, 1.0)]);
    }

    #[test]
    fn test_inline_feed_attaches_to_next_feed_move() {
        let mut state = MachineState::new(PostConfig::default());
        let cmd = Command::FeedRate { mm_per_min: 1200.0 };
        assert!(translate(&mut state, 1, &cmd).unwrap().is_empty());
        let w = words(&mut state, 2, &goto(1.0, 0.0, 0.0));
        assert_eq!(w.last(), Some(&Word::Feed(1200.0)));
        // attached once, not repeated
        let w = words(&mut state, 3, &goto(2.0, 0.0, 0.0));
        assert!(!w.iter().any(|w| matches!(w, Word::Feed(_))));
    }

    #[test]
    fn test_inline_feed_survives_intervening_rapid() {
        let mut state = MachineState::new(PostConfig::default());
        translate(&mut state, 1, &Command::FeedRate { mm_per_min: 800.0 }).unwrap();
        translate(&mut state, 2, &Command::Rapid).unwrap();
        let w = words(&mut state, 3, &goto(0.0, 0.0, 10.0));
        assert_eq!(w[0], Word::Motion("G00"));
        assert!(!w.iter().any(|w| matches!(w, Word::Feed(_))));
        let w = words(&mut state, 4, &goto(0.0, 0.0, -1.0));
        assert_eq!(w.last(), Some(&Word::Feed(800.0)));
    }

    #[test]
    fn test_standalone_feed_block() {
        let config = PostConfig {
            feed_mode: FeedMode::Standalone,
            ..Default::default()
        };
        let mut state = MachineState::new(config);
        let blocks = translate(&mut state, 1, &Command::FeedRate { mm_per_min: 950.0 }).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].number, 5);
        assert_eq!(blocks[0].words, vec![Word::Feed(950.0)]);
    }

    #[test]
    fn test_circle_direction_and_words() {
        let mut state = MachineState::new(PostConfig::default());
        let cw = Command::Circle {
            end: Vec3::new(10.0, 5.0, 0.0),
            normal: Vec3::new(0.0, 0.0, 1.0),
            center_offset: Vec3::new(-2.0, 0.0, 0.0),
        };
        let w = words(&mut state, 1, &cw);
        assert_eq!(
            w,
            vec![
                Word::Motion("G02"),
                Word::Axis(Axis::X, 10.0),
                Word::Axis(Axis::Y, 5.0),
                Word::Axis(Axis::Z, 0.0),
                Word::Axis(Axis::I, -2.0),
                Word::Axis(Axis::J, 0.0),
                Word::Axis(Axis::K, 0.0),
            ]
        );

        let ccw = Command::Circle {
            end: Vec3::new(12.0, 5.0, 0.0),
            normal: Vec3::new(0.0, 0.0, -1.0),
            center_offset: Vec3::new(1.0, 0.0, 0.0),
        };
        let w = words(&mut state, 2, &ccw);
        assert_eq!(w[0], Word::Motion("G03"));
        // Y, Z, J, K unchanged from the previous arc and suppressed
        assert_eq!(
            w[1..],
            [Word::Axis(Axis::X, 12.0), Word::Axis(Axis::I, 1.0)]
        );
    }

    #[test]
    fn test_circle_off_plane_rejected() {
        let mut state = MachineState::new(PostConfig::default());
        let tilted = Command::Circle {
            end: Vec3::new(10.0, 5.0, 0.0),
            normal: Vec3::new(0.3, 0.0, 0.95),
            center_offset: Vec3::new(-2.0, 0.0, 0.0),
        };
        let err = translate(&mut state, 9, &tilted).unwrap_err();
        match err {
            PostError::UnsupportedPlane { line, .. } => assert_eq!(line, 9),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_circle_does_not_consume_rapid() {
        let mut state = MachineState::new(PostConfig::default());
        translate(&mut state, 1, &Command::Rapid).unwrap();
        let arc = Command::Circle {
            end: Vec3::new(10.0, 5.0, 0.0),
            normal: Vec3::new(0.0, 0.0, 1.0),
            center_offset: Vec3::new(-2.0, 0.0, 0.0),
        };
        let w = words(&mut state, 2, &arc);
        assert_eq!(w[0], Word::Motion("G02"));
        let w = words(&mut state, 3, &goto(0.0, 0.0, 0.0));
        assert_eq!(w[0], Word::Motion("G00"));
    }

    #[test]
    fn test_ignored_leaves_state_untouched() {
        let mut state = MachineState::new(PostConfig::default());
        words(&mut state, 1, &goto(1.0, 2.0, 3.0));
        assert!(translate(&mut state, 2, &Command::Ignored)
            .unwrap()
            .is_empty());
        // suppression state unaffected
        let w = words(&mut state, 3, &goto(1.0, 2.0, 4.0));
        assert_eq!(w, vec![Word::Motion("G01"), Word::Axis(Axis::Z, 4.0)]);
    }

    #[test]
    fn test_unit_scaling() {
        let config = PostConfig {
            unit_scale: 1.0 / 25.4,
            ..Default::default()
        };
        let mut state = MachineState::new(config);
        let w = words(&mut state, 1, &goto(25.4, 50.8, 0.0));
        assert_eq!(
            w[1..],
            [
                Word::Axis(Axis::X, 1.0),
                Word::Axis(Axis::Y, 2.0),
                Word::Axis(Axis::Z, 0.0),
            ]
        );
    }

    #[test]
    fn test_block_numbering() {
        let config = PostConfig {
            start_block: 100,
            block_increment: 10,
            ..Default::default()
        };
        let mut state = MachineState::new(config);
        let b1 = translate(&mut state, 1, &goto(1.0, 0.0, 0.0)).unwrap();
        let b2 = translate(&mut state, 2, &goto(2.0, 0.0, 0.0)).unwrap();
        assert_eq!(b1[0].number, 110);
        assert_eq!(b2[0].number, 120);
    }
}
