//! Turning pointer and button input into placement mutations.

/// Placement state machine.
pub mod controller;
/// Input event shapes shared by mouse, touch and buttons.
pub mod pointer;
