//! CLDATA parser module.

mod cldata;

pub use cldata::{parse_cldata_file, parse_program, parse_record};
