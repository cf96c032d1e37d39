//! HTTP Response Compression Middleware for Keyrank
//!
//! This crate compresses qualifying HTTP responses with gzip or brotli and
//! keeps an adaptive cache of compressed payloads so hot responses are
//! encoded once.
//!
//! # How a response is processed
//!
//! 1. Responses without a `Content-Length` pass through untouched.
//! 2. Policy admits a response by size, content type, and request path.
//! 3. The encoding is negotiated from `Accept-Encoding`; brotli is always
//!    preferred over gzip when both are accepted.
//! 4. The compressed payload comes from the cache when possible, otherwise
//!    the encoder runs on the blocking pool.
//! 5. A response is only rewritten when compression actually shrank it;
//!    headers are updated (`Content-Encoding`, `Content-Length`, `Vary`)
//!    and any `Content-Range` is dropped.
//!
//! Every failure along the way degrades to serving the original response;
//! clients never see a compression error.
//!
//! # Example
//!
//! ```rust,no_run
//! use keyrank_compression::{CompressionConfig, CompressionMiddleware};
//!
//! // Default settings: gzip + brotli, 1 KiB threshold, caching enabled
//! let middleware = CompressionMiddleware::new();
//!
//! // Or with specific configuration
//! let config = CompressionConfig::builder()
//!     .min_size(2048)
//!     .brotli_quality(6)
//!     .cache_capacity(256)
//!     .build();
//! let middleware = CompressionMiddleware::with_config(config);
//! ```

mod cache;
mod codec;
mod config;
mod endpoint;
mod error;
mod metrics;
mod middleware;
pub mod policy;

pub use cache::{CacheKey, CompressionCache};
pub use codec::Encoding;
pub use config::{CompressionConfig, CompressionConfigBuilder};
pub use endpoint::{
    cache_clear_handler, create_cache_clear_handler, create_stats_handler, stats_handler,
};
pub use error::CompressionError;
pub use metrics::{CompressionMetrics, MetricsSnapshot};
pub use middleware::CompressionMiddleware;

/// Result type for compression operations
pub type Result<T> = std::result::Result<T, CompressionError>;
