//! One try-on session: photo, overlay, placement and the exported result.

/// Session object, export requests and results.
pub mod try_on;
