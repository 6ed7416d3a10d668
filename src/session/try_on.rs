use std::sync::Arc;

use crate::compose::compositor::Compositor;
use crate::compose::raster::{ImageSlot, RasterImage, decode_image, decode_overlay};
use crate::config::EngineConfig;
use crate::foundation::core::Size;
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::interaction::controller::{InteractionController, PlacementSnapshot};
use crate::placement::heuristic::PlacementSource;
use crate::placement::state::PlacementState;

/// A flattened export. Immutable; a later export replaces it.
#[derive(Clone, Debug)]
pub struct SessionResult {
    ticket: u64,
    revision: u64,
    state: PlacementState,
    image: RasterImage,
    png: Arc<Vec<u8>>,
}

impl SessionResult {
    /// Export ticket this result was produced for.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Controller revision the result reflects.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Placement that was baked in.
    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    /// Composited pixels (premultiplied).
    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    /// Encoded PNG bytes, ready for the share/download collaborator.
    pub fn png(&self) -> &[u8] {
        self.png.as_slice()
    }
}

/// Everything an export needs, captured so it can run off the interaction thread.
#[derive(Clone, Debug)]
pub struct ExportRequest {
    ticket: u64,
    revision: u64,
    state: PlacementState,
    displayed_photo: Size,
    photo: RasterImage,
    overlay: RasterImage,
}

impl ExportRequest {
    /// Ticket identifying this request; only the latest one is published.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Render and encode.
    pub fn run(&self, compositor: &Compositor) -> TryOnResult<SessionResult> {
        let image = compositor.composite_decoded(
            &self.photo,
            &self.overlay,
            &self.state,
            self.displayed_photo,
        )?;
        let png = image.encode_png()?;
        Ok(SessionResult {
            ticket: self.ticket,
            revision: self.revision,
            state: self.state,
            image,
            png: Arc::new(png),
        })
    }
}

/// Wires the controller, decode slots and compositor for one user session.
#[derive(Debug)]
pub struct TryOnSession {
    controller: InteractionController,
    compositor: Compositor,
    photo: ImageSlot,
    overlay: ImageSlot,
    result: Option<SessionResult>,
    next_ticket: u64,
    latest_ticket: Option<u64>,
}

impl TryOnSession {
    /// Session using the built-in placement heuristic.
    pub fn new(config: &EngineConfig) -> TryOnResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(
            InteractionController::new(config),
            Compositor::from_config(config)?,
        ))
    }

    /// Session with an injected placement source.
    pub fn with_source(
        config: &EngineConfig,
        source: Arc<dyn PlacementSource>,
    ) -> TryOnResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(
            InteractionController::with_source(config, source),
            Compositor::from_config(config)?,
        ))
    }

    fn from_parts(controller: InteractionController, compositor: Compositor) -> Self {
        Self {
            controller,
            compositor,
            photo: ImageSlot::Pending,
            overlay: ImageSlot::Pending,
            result: None,
            next_ticket: 1,
            latest_ticket: None,
        }
    }

    /// Interaction controller (read-only).
    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Interaction controller, for input handling.
    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    /// Compositor used by [`Self::export`].
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// A new photo is being loaded: drop the current one, its placement and any pending export.
    pub fn begin_photo_load(&mut self) {
        self.photo.reset();
        self.controller.unload();
        if let Some(ticket) = self.latest_ticket.take() {
            tracing::debug!(ticket, "pending export dropped by photo change");
        }
    }

    /// The photo finished decoding. Starts a fresh placement for it.
    pub fn complete_photo(&mut self, photo: RasterImage) -> TryOnResult<PlacementState> {
        let state = self.controller.load_photo(photo.size())?;
        self.photo.complete(photo);
        Ok(state)
    }

    /// Decode photo bytes and load them. On decode failure the current photo and placement stay.
    pub fn load_photo_bytes(&mut self, bytes: &[u8]) -> TryOnResult<PlacementState> {
        let photo = decode_image(bytes)?;
        self.begin_photo_load();
        self.complete_photo(photo)
    }

    /// The overlay graphic finished decoding.
    pub fn complete_overlay(&mut self, overlay: RasterImage) {
        tracing::debug!(size = %overlay.size(), "overlay graphic ready");
        self.overlay.complete(overlay);
    }

    /// Decode overlay bytes (raster or SVG).
    pub fn load_overlay_bytes(&mut self, bytes: &[u8]) -> TryOnResult<()> {
        let overlay = decode_overlay(bytes)?;
        self.complete_overlay(overlay);
        Ok(())
    }

    /// The photo container was laid out or resized.
    pub fn set_viewport(&mut self, size: Size) -> TryOnResult<()> {
        self.controller.set_viewport(size)
    }

    /// Whether both images are decoded and a placement exists.
    pub fn is_ready(&self) -> bool {
        self.photo.is_decoded() && self.overlay.is_decoded() && self.controller.is_loaded()
    }

    /// UI-facing placement view.
    pub fn snapshot(&self) -> Option<PlacementSnapshot> {
        self.controller.snapshot()
    }

    /// Latest published export, if any (possibly stale).
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// True when there is no result or it no longer matches the placement.
    pub fn is_result_stale(&self) -> bool {
        self.result.is_none() || self.controller.is_stale()
    }

    /// Capture an export. Rejects until both images are decoded. Supersedes earlier requests.
    pub fn request_export(&mut self) -> TryOnResult<ExportRequest> {
        let photo = self.photo.decoded("photo")?.clone();
        let overlay = self.overlay.decoded("overlay graphic")?.clone();
        let state = self.controller.placement()?;

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        if let Some(prev) = self.latest_ticket.replace(ticket) {
            tracing::debug!(prev, ticket, "export request superseded");
        }
        Ok(ExportRequest {
            ticket,
            revision: self.controller.revision(),
            state,
            displayed_photo: self.controller.viewport(),
            photo,
            overlay,
        })
    }

    /// Publish a finished export. Results for superseded tickets are dropped; returns whether it
    /// was accepted.
    pub fn publish(&mut self, result: SessionResult) -> bool {
        if self.latest_ticket != Some(result.ticket) {
            tracing::debug!(ticket = result.ticket, "dropping superseded export result");
            return false;
        }
        self.controller.mark_exported(result.revision);
        tracing::info!(
            ticket = result.ticket,
            bytes = result.png.len(),
            stale = self.controller.is_stale(),
            "export published"
        );
        self.result = Some(result);
        true
    }

    /// Request, run and publish an export in one go. On failure any prior result is kept.
    #[tracing::instrument(skip(self))]
    pub fn export(&mut self) -> TryOnResult<&SessionResult> {
        let request = self.request_export()?;
        let result = match request.run(&self.compositor) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "export failed; keeping previous result");
                return Err(e);
            }
        };
        self.publish(result);
        self.result
            .as_ref()
            .ok_or_else(|| TryOnError::precondition("export result was not published"))
    }

    /// End the session, dropping images, placement and result.
    pub fn end(&mut self) {
        self.begin_photo_load();
        self.overlay.reset();
        self.result = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/try_on.rs"]
mod tests;
