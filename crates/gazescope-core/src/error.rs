//! Error types for gazescope-rs.

use thiserror::Error;

/// The main error type for gazescope-rs operations.
#[derive(Error, Debug)]
pub enum GazescopeError {
    /// No focal length is available or recoverable for a camera.
    #[error("no intrinsics available for frame {0}")]
    MissingIntrinsics(u32),

    /// Parallel data sequences disagree in length.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A computation would produce non-finite geometry.
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    /// A point on the camera plane has no finite image projection.
    #[error("point on the camera plane cannot be projected")]
    ProjectionOnCameraPlane,

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for gazescope-rs operations.
pub type Result<T> = std::result::Result<T, GazescopeError>;
