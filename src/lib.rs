//! Tryon is an overlay placement and compositing engine for photo try-on.
//!
//! A user loads a photo, an overlay graphic (e.g. a pair of glasses) is placed on it, the user
//! drags/scales/rotates the overlay on screen, and the engine exports one flattened image that
//! matches the on-screen preview at the photo's full resolution.
//!
//! # Pipeline overview
//!
//! 1. **Propose**: photo size -> initial [`PlacementState`] via a [`PlacementSource`]
//!    (by default the content-blind [`SizeAspectHeuristic`]; it is a guess, not face detection)
//! 2. **Interact**: pointer and button input -> state mutations in [`InteractionController`]
//! 3. **Map**: [`CoordinateTransform`] resolves the state into on-screen or natural-pixel geometry
//! 4. **Composite**: [`Compositor`] rasterizes photo + overlay and [`TryOnSession`] publishes the
//!    PNG as a [`SessionResult`]
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **One sizing rule**: preview and export both size the overlay through [`SizingRules`].
//! - **Deterministic**: the same photo, overlay and state always produce the same pixels.
//! - **Premultiplied RGBA8** internally; PNG output is straight alpha.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Rasterization: decode, canvas, compositor.
pub mod compose;
/// Engine configuration.
pub mod config;
/// Input handling and the placement state machine.
pub mod interaction;
/// Placement state and the placement heuristic.
pub mod placement;
/// Session wiring and export results.
pub mod session;
/// Coordinate transform between state, screen and source pixels.
pub mod transform;

pub use crate::compose::blend::{PremulRgba8, over};
pub use crate::compose::canvas::{Canvas, TransformScope};
pub use crate::compose::compositor::Compositor;
pub use crate::compose::raster::{
    ImageSlot, RasterImage, decode_image, decode_overlay, decode_svg,
};
pub use crate::config::{ControlSteps, EngineConfig};
pub use crate::foundation::core::{Affine, PixelSize, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{TryOnError, TryOnResult};
pub use crate::interaction::controller::{InteractionController, PlacementSnapshot};
pub use crate::interaction::pointer::{
    ControlAction, Direction, InteractionStep, PointerEvent, PointerPhase,
};
pub use crate::placement::heuristic::{PlacementSource, SizeAspectHeuristic, propose};
pub use crate::placement::state::{PlacementOrigin, PlacementState};
pub use crate::session::try_on::{ExportRequest, SessionResult, TryOnSession};
pub use crate::transform::geometry::{
    CoordinateTransform, OverlayPlacement, PhotoGeometry, SizingRules,
};
