//! Overlay pose and the content-blind placement heuristic.

/// Size/aspect based initial placement ("auto-position").
pub mod heuristic;
/// The normalized overlay pose.
pub mod state;
