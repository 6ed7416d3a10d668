/// Convenience result type used across the engine.
pub type TryOnResult<T> = Result<T, TryOnError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum TryOnError {
    /// An operation was invoked out of order (caller bug, not a runtime condition).
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Zero, negative or non-finite dimensions, scales or deltas.
    #[error("degenerate geometry: {0}")]
    Geometry(String),

    /// Source image bytes could not be turned into pixels.
    #[error("decode error: {0}")]
    Decode(String),

    /// The flattened composite could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// Invalid engine configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TryOnError {
    /// Build a [`TryOnError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`TryOnError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`TryOnError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`TryOnError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`TryOnError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for caller-order bugs such as acting before a photo is loaded.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }

    /// True for rejected dimensions or non-finite inputs.
    pub fn is_geometry(&self) -> bool {
        matches!(self, Self::Geometry(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
