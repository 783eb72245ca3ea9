//! G-code generator module.

mod gcode;
mod post;

pub use gcode::{format_block, format_coord, format_feed, GcodeWriter};
pub use post::{generate_program, post_program, translate, MachineState};
