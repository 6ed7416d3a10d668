use std::sync::Arc;

use crate::config::{ControlSteps, EngineConfig};
use crate::foundation::core::{PixelSize, Point, Size, Vec2, check_display_size};
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::foundation::math::{clamp_percent, ensure_finite};
use crate::interaction::pointer::{
    ControlAction, Direction, InteractionStep, PointerEvent, PointerPhase,
};
use crate::placement::heuristic::{PlacementSource, SizeAspectHeuristic};
use crate::placement::state::{PlacementOrigin, PlacementState};
use crate::transform::geometry::CoordinateTransform;

/// Plain view of the placement for UI collaborators.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacementSnapshot {
    /// Horizontal anchor percent.
    pub x: f64,
    /// Vertical anchor percent.
    pub y: f64,
    /// Overlay scale.
    pub scale: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// How the current pose was produced.
    pub origin: PlacementOrigin,
    /// A drag is in progress.
    pub dragging: bool,
    /// The last export no longer reflects this pose (or nothing was exported yet).
    pub stale: bool,
}

#[derive(Clone, Debug)]
struct LoadedPhoto {
    photo: PixelSize,
    state: PlacementState,
    origin: PlacementOrigin,
    drag_offset: Option<Vec2>,
}

/// Owns the [`PlacementState`] and applies every mutation to it.
///
/// All operations reject with [`TryOnError::Precondition`] until a photo is loaded. Each successful
/// mutation bumps [`revision`](Self::revision), which is how exported results are marked stale.
pub struct InteractionController {
    steps: ControlSteps,
    auto_position_on_load: bool,
    default_placement: PlacementState,
    source: Arc<dyn PlacementSource>,
    transform: CoordinateTransform,
    viewport: Size,
    loaded: Option<LoadedPhoto>,
    revision: u64,
    exported_revision: Option<u64>,
}

impl std::fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionController")
            .field("source", &self.source.name())
            .field("viewport", &self.viewport)
            .field("loaded", &self.loaded)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl InteractionController {
    /// Controller using the built-in size/aspect heuristic.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_source(config, Arc::new(SizeAspectHeuristic))
    }

    /// Controller with an injected placement source.
    pub fn with_source(config: &EngineConfig, source: Arc<dyn PlacementSource>) -> Self {
        Self {
            steps: config.controls,
            auto_position_on_load: config.auto_position_on_load,
            default_placement: config.default_placement,
            source,
            transform: CoordinateTransform::new(config.sizing),
            viewport: Size::ZERO,
            loaded: None,
            revision: 0,
            exported_revision: None,
        }
    }

    /// Start a fresh placement for a newly loaded photo, discarding any previous one.
    pub fn load_photo(&mut self, photo: PixelSize) -> TryOnResult<PlacementState> {
        photo.validate()?;
        let (state, origin) = if self.auto_position_on_load {
            (self.source.propose(photo)?, PlacementOrigin::Proposed)
        } else {
            (self.default_placement, PlacementOrigin::Default)
        };
        state.validate()?;

        tracing::info!(%photo, source = self.source.name(), ?origin, "photo loaded");
        self.loaded = Some(LoadedPhoto {
            photo,
            state,
            origin,
            drag_offset: None,
        });
        self.bump();
        Ok(state)
    }

    /// Drop the photo and its placement (session end or photo being replaced).
    pub fn unload(&mut self) {
        if self.loaded.take().is_some() {
            tracing::debug!("photo unloaded");
            self.bump();
        }
    }

    /// Record the container's current on-screen size.
    pub fn set_viewport(&mut self, size: Size) -> TryOnResult<()> {
        check_display_size(size, "viewport")?;
        self.viewport = size;
        Ok(())
    }

    /// Current container size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Whether a photo is loaded.
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Natural size of the loaded photo.
    pub fn photo(&self) -> TryOnResult<PixelSize> {
        Ok(self.require_loaded()?.photo)
    }

    /// Current pose.
    pub fn placement(&self) -> TryOnResult<PlacementState> {
        Ok(self.require_loaded()?.state)
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.loaded
            .as_ref()
            .is_some_and(|l| l.drag_offset.is_some())
    }

    /// Monotonic counter bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Note that an export reflecting `revision` was published.
    pub fn mark_exported(&mut self, revision: u64) {
        self.exported_revision = Some(revision);
    }

    /// True when no export matches the current revision.
    pub fn is_stale(&self) -> bool {
        self.exported_revision != Some(self.revision)
    }

    /// UI-facing view of the placement, or `None` before a photo is loaded.
    pub fn snapshot(&self) -> Option<PlacementSnapshot> {
        let l = self.loaded.as_ref()?;
        Some(PlacementSnapshot {
            x: l.state.x,
            y: l.state.y,
            scale: l.state.scale,
            rotation: l.state.rotation,
            origin: l.origin,
            dragging: l.drag_offset.is_some(),
            stale: self.is_stale(),
        })
    }

    /// Begin dragging from `pointer`. A drag already in progress is superseded.
    pub fn begin_drag(&mut self, pointer: Point) -> TryOnResult<()> {
        self.require_loaded()?;
        ensure_finite(pointer.x, "pointer x")?;
        ensure_finite(pointer.y, "pointer y")?;
        let viewport = self.viewport;
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Err(TryOnError::geometry(
                "cannot start a drag before the viewport has a size",
            ));
        }
        let transform = self.transform;
        let loaded = self.require_loaded_mut()?;
        if loaded.drag_offset.is_some() {
            tracing::debug!("drag superseded by a new begin");
        }
        loaded.drag_offset = Some(transform.drag_offset(viewport, &loaded.state, pointer));
        Ok(())
    }

    /// Move the overlay so it follows `pointer`. Rejects when no drag is in progress.
    pub fn continue_drag(&mut self, pointer: Point) -> TryOnResult<PlacementState> {
        let viewport = self.viewport;
        let transform = self.transform;
        let loaded = self.require_loaded()?;
        let offset = loaded
            .drag_offset
            .ok_or_else(|| TryOnError::precondition("continue_drag called without begin_drag"))?;
        let (x, y) = transform.pointer_to_anchor(viewport, pointer, offset)?;
        let next = PlacementState { x, y, ..loaded.state };
        self.commit(next)
    }

    /// Finish the current drag. Returns whether one was in progress; calling it again is harmless.
    pub fn end_drag(&mut self) -> TryOnResult<bool> {
        let loaded = self.require_loaded_mut()?;
        Ok(loaded.drag_offset.take().is_some())
    }

    /// Route a pointer sample. Moves without an active drag (hover) are ignored.
    /// Returns whether the placement changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> TryOnResult<bool> {
        match event.phase {
            PointerPhase::Start => {
                self.begin_drag(event.position)?;
                Ok(false)
            }
            PointerPhase::Move => {
                self.require_loaded()?;
                if !self.is_dragging() {
                    return Ok(false);
                }
                self.continue_drag(event.position)?;
                Ok(true)
            }
            PointerPhase::End => {
                self.end_drag()?;
                Ok(false)
            }
        }
    }

    /// Move one nudge step in `direction`, clamped to `[0, 100]`.
    pub fn nudge(&mut self, direction: Direction) -> TryOnResult<PlacementState> {
        let step = self.steps.nudge_step_pct;
        let mut next = self.require_loaded()?.state;
        match direction {
            Direction::Up => next.y = clamp_percent(next.y - step),
            Direction::Down => next.y = clamp_percent(next.y + step),
            Direction::Left => next.x = clamp_percent(next.x - step),
            Direction::Right => next.x = clamp_percent(next.x + step),
        }
        self.commit(next)
    }

    /// `scale = max(min_scale, scale + delta)`.
    pub fn adjust_scale(&mut self, delta: f64) -> TryOnResult<PlacementState> {
        let mut next = self.require_loaded()?.state;
        ensure_finite(delta, "scale delta")?;
        next.scale = (next.scale + delta).max(self.steps.min_scale);
        self.commit(next)
    }

    /// `rotation += delta` (radians, unbounded).
    pub fn adjust_rotation(&mut self, delta: f64) -> TryOnResult<PlacementState> {
        let mut next = self.require_loaded()?.state;
        ensure_finite(delta, "rotation delta")?;
        next.rotation = ensure_finite(next.rotation + delta, "rotation")?;
        self.commit(next)
    }

    /// Replace the pose with the placement source's proposal for the loaded photo.
    pub fn auto_position(&mut self) -> TryOnResult<PlacementState> {
        let photo = self.require_loaded()?.photo;
        let next = self.source.propose(photo)?;
        next.validate()?;
        let state = self.commit(next)?;
        if let Some(l) = self.loaded.as_mut() {
            l.origin = PlacementOrigin::Proposed;
        }
        tracing::debug!(?state, "auto-positioned");
        Ok(state)
    }

    /// Replace the pose wholesale (e.g. restoring a saved pose). Anchor is clamped, scale floored.
    pub fn set_placement(&mut self, state: PlacementState) -> TryOnResult<PlacementState> {
        self.require_loaded()?;
        let next = PlacementState::new(
            state.x,
            state.y,
            state.scale.max(self.steps.min_scale),
            state.rotation,
        )?;
        self.commit(next)
    }

    /// Apply a button/keyboard control with the configured step sizes.
    pub fn apply(&mut self, action: ControlAction) -> TryOnResult<PlacementState> {
        match action {
            ControlAction::Nudge { direction } => self.nudge(direction),
            ControlAction::ZoomIn => self.adjust_scale(self.steps.scale_step),
            ControlAction::ZoomOut => self.adjust_scale(-self.steps.scale_step),
            ControlAction::RotateClockwise => self.adjust_rotation(self.steps.rotation_step_rad),
            ControlAction::RotateCounterClockwise => {
                self.adjust_rotation(-self.steps.rotation_step_rad)
            }
            ControlAction::AutoPosition => self.auto_position(),
        }
    }

    /// Apply one recorded step. Returns whether the placement changed.
    pub fn replay(&mut self, step: InteractionStep) -> TryOnResult<bool> {
        match step {
            InteractionStep::Viewport { size } => {
                self.set_viewport(size)?;
                Ok(false)
            }
            InteractionStep::Pointer(event) => self.handle_pointer(event),
            InteractionStep::Control(action) => self.apply(action).map(|_| true),
            InteractionStep::Scale { delta } => self.adjust_scale(delta).map(|_| true),
            InteractionStep::Rotate { delta } => self.adjust_rotation(delta).map(|_| true),
        }
    }

    fn commit(&mut self, next: PlacementState) -> TryOnResult<PlacementState> {
        next.validate()?;
        let loaded = self.require_loaded_mut()?;
        loaded.state = next;
        loaded.origin = PlacementOrigin::Adjusted;
        self.bump();
        Ok(next)
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn require_loaded(&self) -> TryOnResult<&LoadedPhoto> {
        self.loaded
            .as_ref()
            .ok_or_else(|| TryOnError::precondition("no photo loaded"))
    }

    fn require_loaded_mut(&mut self) -> TryOnResult<&mut LoadedPhoto> {
        self.loaded
            .as_mut()
            .ok_or_else(|| TryOnError::precondition("no photo loaded"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/controller.rs"]
mod tests;
