use std::path::PathBuf;

/// Convenience result type used across the crate.
pub type ChaosResult<T> = Result<T, ChaosError>;

/// Top-level error taxonomy used by the renderer APIs.
#[derive(thiserror::Error, Debug)]
pub enum ChaosError {
    /// Invalid user-provided configuration, rejected before any work starts.
    #[error("validation error: {0}")]
    Validation(String),

    /// A pixel write landed outside the canvas.
    ///
    /// This is a geometry defect (polygon radius vs. canvas size) and is never clamped.
    #[error("bounds error: pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    Bounds {
        /// Offending x coordinate.
        x: i64,
        /// Offending y coordinate.
        y: i64,
        /// Canvas width in pixels.
        width: u32,
        /// Canvas height in pixels.
        height: u32,
    },

    /// PNG or video encoding failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Filesystem failure on a specific path.
    #[error("io error on '{}': {source}", path.display())]
    Io {
        /// Path being created or written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChaosError {
    /// Build a [`ChaosError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ChaosError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ChaosError::Io`] value for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
