//! Error types for compression operations

use thiserror::Error;

/// Errors that can occur while compressing a response
///
/// These never reach the client: the middleware degrades to serving the
/// uncompressed response whenever one of them occurs.
#[derive(Error, Debug)]
pub enum CompressionError {
    /// Compression operation failed
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    /// IO error from an encoder
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
