//! Rasterization of photo + overlay into a single flattened image.

/// Premultiplied pixel blending and sampling.
pub mod blend;
/// Drawing surface with scoped transforms.
pub mod canvas;
/// Photo + overlay compositing.
pub mod compositor;
/// Decoded images, decode/encode helpers and one-shot decode slots.
pub mod raster;
