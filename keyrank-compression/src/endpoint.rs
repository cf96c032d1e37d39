//! Observability and administrative handlers
//!
//! Small handler factories for wiring the compression services into a
//! router: a stats endpoint reporting the derived metrics, and an
//! administrative cache flush.

use crate::{CompressionCache, CompressionMetrics};
use keyrank_core::{Error, HandlerFn, HttpRequest, HttpResponse};
use std::sync::Arc;

/// Handle a compression stats request
///
/// Returns the current [`MetricsSnapshot`](crate::MetricsSnapshot) as JSON;
/// all values are zero until the first response has been compressed.
pub async fn stats_handler(
    metrics: &CompressionMetrics,
    _req: HttpRequest,
) -> Result<HttpResponse, Error> {
    HttpResponse::ok().with_json(&metrics.snapshot())
}

/// Create a stats handler bound to a metrics instance
///
/// # Examples
///
/// ```rust,no_run
/// use keyrank_compression::{CompressionMiddleware, create_stats_handler};
///
/// let middleware = CompressionMiddleware::new();
/// let handler = create_stats_handler(middleware.metrics());
/// // register `handler` under e.g. GET /compression/stats
/// ```
pub fn create_stats_handler(metrics: Arc<CompressionMetrics>) -> HandlerFn {
    Arc::new(move |req| {
        let metrics = metrics.clone();
        Box::pin(async move { stats_handler(&metrics, req).await })
    })
}

/// Handle an administrative cache flush
///
/// Idempotent; always responds 204.
pub async fn cache_clear_handler(
    cache: &CompressionCache,
    _req: HttpRequest,
) -> Result<HttpResponse, Error> {
    cache.clear();
    tracing::info!("compression cache cleared");
    Ok(HttpResponse::no_content())
}

/// Create a cache-flush handler bound to a cache instance
pub fn create_cache_clear_handler(cache: Arc<CompressionCache>) -> HandlerFn {
    Arc::new(move |req| {
        let cache = cache.clone();
        Box::pin(async move { cache_clear_handler(&cache, req).await })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Encoding;
    use bytes::Bytes;
    use std::time::Duration;

    #[tokio::test]
    async fn test_stats_handler_reports_zeros() {
        let metrics = CompressionMetrics::new();
        let req = HttpRequest::new("GET".to_string(), "/compression/stats".to_string());

        let response = stats_handler(&metrics, req).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(
            response.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );

        let json: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(json["total_requests"], 0);
        assert_eq!(json["compression_ratio"], 0.0);
        assert_eq!(json["bytes_saved"], 0);
    }

    #[tokio::test]
    async fn test_stats_handler_reports_accumulated_values() {
        let metrics = Arc::new(CompressionMetrics::new());
        metrics.record_request();
        metrics.record_compression(2000, 500, Duration::from_millis(2));

        let handler = create_stats_handler(metrics);
        let req = HttpRequest::new("GET".to_string(), "/compression/stats".to_string());
        let response = handler(req).await.unwrap();

        let json: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(json["total_requests"], 1);
        assert_eq!(json["compressed_requests"], 1);
        assert_eq!(json["compression_ratio"], 75.0);
        assert_eq!(json["bytes_saved"], 1500);
    }

    #[tokio::test]
    async fn test_cache_clear_handler_is_idempotent() {
        let cache = Arc::new(CompressionCache::new(4));
        cache.put(b"body", "text/html", Encoding::Gzip, Bytes::from_static(b"x"));
        assert_eq!(cache.len(), 1);

        let handler = create_cache_clear_handler(cache.clone());

        let req = HttpRequest::new("POST".to_string(), "/admin/compression/cache/clear".to_string());
        let response = handler(req).await.unwrap();
        assert_eq!(response.status, 204);
        assert!(cache.is_empty());

        let req = HttpRequest::new("POST".to_string(), "/admin/compression/cache/clear".to_string());
        let response = handler(req).await.unwrap();
        assert_eq!(response.status, 204);
        assert!(cache.is_empty());
    }
}
