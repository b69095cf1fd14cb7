//! Stage-keyed scene layout and the constants that animate it.

pub mod palette;
pub mod selector;
pub mod stage;
pub mod tuning;
