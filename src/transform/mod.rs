//! Geometric transformations from motion intent to machine axes.

mod orientation;

pub use orientation::resolve_orientation;
