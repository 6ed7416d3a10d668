use crate::foundation::core::{Point, Size};

/// Phase of a pointer gesture. Mouse and touch sources map onto the same three phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    /// Press / touch start on the overlay.
    Start,
    /// Pointer moved inside the container.
    Move,
    /// Release, touch end or pointer leaving the container.
    End,
}

/// A container-relative pointer sample.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerEvent {
    /// Position relative to the container's top-left corner, in on-screen pixels.
    pub position: Point,
    /// Gesture phase.
    pub phase: PointerPhase,
}

impl PointerEvent {
    /// A `Start` sample at `(x, y)`.
    pub fn start(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            phase: PointerPhase::Start,
        }
    }

    /// A `Move` sample at `(x, y)`.
    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            phase: PointerPhase::Move,
        }
    }

    /// An `End` sample at `(x, y)`.
    pub fn end(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            phase: PointerPhase::End,
        }
    }
}

/// Arrow direction for nudges. Up/down move along y, left/right along x.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Decrease `y`.
    Up,
    /// Increase `y`.
    Down,
    /// Decrease `x`.
    Left,
    /// Increase `x`.
    Right,
}

/// Discrete button/keyboard controls, applied with the configured step sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ControlAction {
    /// Move by one nudge step.
    Nudge {
        /// Direction to move.
        direction: Direction,
    },
    /// Grow by one scale step.
    ZoomIn,
    /// Shrink by one scale step.
    ZoomOut,
    /// Rotate clockwise by one rotation step.
    RotateClockwise,
    /// Rotate counter-clockwise by one rotation step.
    RotateCounterClockwise,
    /// Replace the pose with the placement source's proposal.
    AutoPosition,
}

/// One recorded interaction, as replayed by the CLI and integration tests.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionStep {
    /// Container resized.
    Viewport {
        /// New container size.
        size: Size,
    },
    /// Pointer sample.
    Pointer(PointerEvent),
    /// Button or key press.
    Control(ControlAction),
    /// Free-form scale change.
    Scale {
        /// Amount added to `scale`.
        delta: f64,
    },
    /// Free-form rotation change.
    Rotate {
        /// Radians added to `rotation`.
        delta: f64,
    },
}
