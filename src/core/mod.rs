//! Court geometry and the position-history engine.

/// Court bounds clamping.
pub mod bounds;
/// Bounded undo/redo history of court snapshots with drag coalescing.
pub mod history;
