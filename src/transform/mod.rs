//! Mapping between placement state, on-screen geometry and source-pixel geometry.

/// Sizing rules and the display/source coordinate transform.
pub mod geometry;
