//! Compression middleware implementation

use crate::{
    CompressionCache, CompressionConfig, CompressionError, CompressionMetrics, Encoding, policy,
};
use async_trait::async_trait;
use bytes::Bytes;
use keyrank_core::{Error, HttpRequest, HttpResponse, Middleware, Next};
use std::sync::Arc;
use std::time::Instant;

/// HTTP response compression middleware
///
/// Intercepts outgoing responses and, when policy admits them, replaces the
/// body with a gzip- or brotli-compressed payload negotiated from the
/// client's `Accept-Encoding` header. Compressed payloads are cached so
/// repeated responses skip the encoder entirely.
///
/// The cache and metrics are plain service objects owned by the middleware
/// and shared via `Arc`; construct them up front with [`with_services`] to
/// wire the observability and administrative endpoints to the same
/// instances.
///
/// [`with_services`]: CompressionMiddleware::with_services
///
/// # Example
///
/// ```rust,no_run
/// use keyrank_compression::{CompressionConfig, CompressionMiddleware};
///
/// let config = CompressionConfig::builder()
///     .min_size(1024)
///     .gzip_level(6)
///     .build();
/// let middleware = CompressionMiddleware::with_config(config);
/// ```
pub struct CompressionMiddleware {
    config: CompressionConfig,
    cache: Arc<CompressionCache>,
    metrics: Arc<CompressionMetrics>,
}

impl CompressionMiddleware {
    /// Create a new compression middleware with default settings
    pub fn new() -> Self {
        Self::with_config(CompressionConfig::default())
    }

    /// Create a compression middleware with custom configuration
    pub fn with_config(config: CompressionConfig) -> Self {
        let cache = Arc::new(CompressionCache::new(config.cache_capacity));
        let metrics = Arc::new(CompressionMetrics::new());
        Self {
            config,
            cache,
            metrics,
        }
    }

    /// Create a compression middleware around existing service objects
    pub fn with_services(
        config: CompressionConfig,
        cache: Arc<CompressionCache>,
        metrics: Arc<CompressionMetrics>,
    ) -> Self {
        Self {
            config,
            cache,
            metrics,
        }
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// The compressed-payload cache shared with administrative handlers
    pub fn cache(&self) -> Arc<CompressionCache> {
        self.cache.clone()
    }

    /// The metrics instance shared with the observability endpoint
    pub fn metrics(&self) -> Arc<CompressionMetrics> {
        self.metrics.clone()
    }

    /// Compress the response body and rewrite its headers
    ///
    /// Any failure degrades to returning the response untouched.
    async fn compress_response(
        &self,
        mut response: HttpResponse,
        encoding: Encoding,
    ) -> HttpResponse {
        let started = Instant::now();
        let original_len = response.body.len();
        let content_type = response.header("Content-Type").cloned().unwrap_or_default();

        let compressed = match self
            .compressed_payload(&response.body, &content_type, encoding)
            .await
        {
            Ok(compressed) => compressed,
            Err(e) => {
                tracing::error!(
                    encoding = %encoding,
                    error = %e,
                    "compression failed, serving response uncompressed"
                );
                return response;
            }
        };

        // Compression must never grow the payload
        if compressed.len() >= original_len {
            tracing::debug!(
                original = original_len,
                compressed = compressed.len(),
                "compressed output not smaller, serving original"
            );
            return response;
        }

        response.body = compressed.to_vec();
        response.remove_header("Content-Encoding");
        response.headers.insert(
            "Content-Encoding".to_string(),
            encoding.encoding_name().to_string(),
        );
        response.remove_header("Content-Length");
        response.headers.insert(
            "Content-Length".to_string(),
            response.body.len().to_string(),
        );

        // Byte ranges no longer line up with the compressed body
        response.remove_header("Content-Range");

        // Response now varies by Accept-Encoding
        let vary = response.headers.entry("Vary".to_string()).or_default();
        if !vary.contains("Accept-Encoding") {
            if !vary.is_empty() {
                vary.push_str(", ");
            }
            vary.push_str("Accept-Encoding");
        }

        self.metrics
            .record_compression(original_len, response.body.len(), started.elapsed());

        response
    }

    /// Fetch the compressed payload from the cache or run the encoder
    ///
    /// The encoder is CPU-bound, so it runs on the blocking pool rather than
    /// the request task.
    async fn compressed_payload(
        &self,
        body: &[u8],
        content_type: &str,
        encoding: Encoding,
    ) -> crate::Result<Bytes> {
        if self.config.cache_compressed
            && let Some(hit) = self.cache.get(body, content_type, encoding)
        {
            tracing::trace!(encoding = %encoding, "compressed payload cache hit");
            return Ok(hit);
        }

        let quality = match encoding {
            Encoding::Gzip => self.config.effective_gzip_level(),
            Encoding::Brotli => self.config.effective_brotli_quality(),
        };

        let input = Bytes::copy_from_slice(body);
        let compressed = tokio::task::spawn_blocking(move || encoding.compress(&input, quality))
            .await
            .map_err(|e| CompressionError::CompressionFailed(e.to_string()))??;
        let compressed = Bytes::from(compressed);

        if self.config.cache_compressed && compressed.len() < body.len() {
            self.cache
                .put(body, content_type, encoding, compressed.clone());
        }

        Ok(compressed)
    }
}

impl Default for CompressionMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Middleware for CompressionMiddleware {
    async fn handle(&self, req: HttpRequest, next: Next) -> Result<HttpResponse, Error> {
        // Capture negotiation inputs before handing the request on
        let accept_encoding = req.header("Accept-Encoding").cloned();
        let path = req.path.clone();

        let response = next(req).await?;
        self.metrics.record_request();

        // Without a declared length the response cannot be safely rewritten
        // (chunked responses land here); expected case, no log
        let Some(content_length) = response
            .header("Content-Length")
            .and_then(|v| v.parse::<usize>().ok())
        else {
            return Ok(response);
        };

        let content_type = response.header("Content-Type").cloned().unwrap_or_default();
        if !policy::should_compress(&content_type, content_length, &path, &self.config) {
            return Ok(response);
        }

        let Some(encoding) = policy::select_encoding(accept_encoding.as_deref(), &self.config)
        else {
            return Ok(response);
        };

        if response.body.len() > self.config.max_buffer_size {
            tracing::debug!(
                size = response.body.len(),
                cap = self.config.max_buffer_size,
                "response exceeds compression buffer cap, passing through"
            );
            return Ok(response);
        }

        Ok(self.compress_response(response, encoding).await)
    }
}
