//! Per-frame animators. Each one is advanced explicitly with an elapsed-time delta.

pub mod ambient;
pub mod lerp;
pub mod line;
pub mod node;
pub mod path;
