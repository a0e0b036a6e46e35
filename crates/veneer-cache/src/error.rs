//! Binding cache error types.

use std::path::PathBuf;

/// Errors that can occur in the surface cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Filesystem-level cache failure.
    #[error("cache error at {path}: {detail}")]
    Store { path: PathBuf, detail: String },

    /// A cached artifact could not be decoded.
    #[error("corrupt cache entry: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Surface generation failed while filling a cache miss.
    #[error(transparent)]
    Generate(#[from] veneer_surface::SurfaceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
