//! Error types for canopy

use thiserror::Error;

/// canopy errors
///
/// Every failure here resolves locally into a status the transport reports to
/// its peer; none is fatal to the node.
#[derive(Error, Debug)]
pub enum CanopyError {
    /// The peer requested a response format other than the supported one
    #[error("unsupported response format: {0}")]
    UnsupportedFormat(String),

    /// The writable window cannot fit even the first token of a fresh document
    #[error("chunk capacity {capacity} too small for next token of {needed} bytes")]
    ChunkTooSmall { needed: usize, capacity: usize },

    /// Failure reported by the transport collaborator
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for canopy operations
pub type CanopyResult<T> = Result<T, CanopyError>;
