//! Admission and negotiation decisions
//!
//! Stateless checks: whether a response qualifies for compression at all,
//! and which encoding to use for a given client.

use crate::{CompressionConfig, Encoding};

/// Decide whether a response body qualifies for compression
///
/// A response is admitted when it is at least `min_size` bytes, its content
/// type matches one of the configured substrings, and the request path does
/// not match any excluded substring.
pub fn should_compress(
    content_type: &str,
    content_length: usize,
    path: &str,
    config: &CompressionConfig,
) -> bool {
    if content_length < config.min_size {
        return false;
    }

    let ct_lower = content_type.to_lowercase();
    if !config
        .content_types
        .iter()
        .any(|pattern| ct_lower.contains(pattern.as_str()))
    {
        return false;
    }

    if config
        .exclude_paths
        .iter()
        .any(|pattern| path.contains(pattern.as_str()))
    {
        return false;
    }

    true
}

/// Select the encoding to use for a client's Accept-Encoding header
///
/// Brotli strictly outranks gzip when both are accepted and enabled; clients
/// rely on that ordering being deterministic. Returns `None` when the client
/// accepts no supported encoding.
pub fn select_encoding(
    accept_encoding: Option<&str>,
    config: &CompressionConfig,
) -> Option<Encoding> {
    let header = accept_encoding?;
    let tokens: Vec<String> = header
        .split(',')
        .map(|s| {
            s.split(';')
                .next()
                .unwrap_or("")
                .trim()
                .to_ascii_lowercase()
        })
        .collect();

    if config.enable_brotli && tokens.iter().any(|t| t == "br") {
        return Some(Encoding::Brotli);
    }

    if config.enable_gzip && tokens.iter().any(|t| t == "gzip") {
        return Some(Encoding::Gzip);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CompressionConfig {
        CompressionConfig::default()
    }

    #[test]
    fn test_small_responses_rejected() {
        let cfg = config();
        assert!(!should_compress("application/json", 500, "/api/keywords", &cfg));
        assert!(!should_compress("application/json", 1023, "/api/keywords", &cfg));
        assert!(should_compress("application/json", 1024, "/api/keywords", &cfg));
    }

    #[test]
    fn test_content_type_allow_list() {
        let cfg = config();
        assert!(should_compress("text/html", 2000, "/api/keywords", &cfg));
        assert!(should_compress(
            "application/json; charset=utf-8",
            2000,
            "/api/keywords",
            &cfg
        ));
        assert!(should_compress("image/svg+xml", 2000, "/api/keywords", &cfg));

        assert!(!should_compress("image/png", 2000, "/api/keywords", &cfg));
        assert!(!should_compress("application/octet-stream", 2000, "/api/keywords", &cfg));
        assert!(!should_compress("", 2000, "/api/keywords", &cfg));
    }

    #[test]
    fn test_excluded_paths_rejected() {
        let cfg = config();
        assert!(!should_compress("application/json", 2000, "/health", &cfg));
        assert!(!should_compress("application/json", 2000, "/api/health/live", &cfg));
        assert!(!should_compress("application/json", 2000, "/metrics", &cfg));
        assert!(should_compress("application/json", 2000, "/api/surveys", &cfg));
    }

    #[test]
    fn test_brotli_outranks_gzip() {
        let cfg = config();
        assert_eq!(
            select_encoding(Some("gzip, br"), &cfg),
            Some(Encoding::Brotli)
        );
        assert_eq!(
            select_encoding(Some("br, gzip"), &cfg),
            Some(Encoding::Brotli)
        );
        assert_eq!(select_encoding(Some("gzip"), &cfg), Some(Encoding::Gzip));
    }

    #[test]
    fn test_negotiation_case_insensitive() {
        let cfg = config();
        assert_eq!(select_encoding(Some("BR"), &cfg), Some(Encoding::Brotli));
        assert_eq!(select_encoding(Some("GZip"), &cfg), Some(Encoding::Gzip));
    }

    #[test]
    fn test_quality_values_ignored() {
        let cfg = config();
        assert_eq!(
            select_encoding(Some("gzip;q=0.8, br;q=0.9"), &cfg),
            Some(Encoding::Brotli)
        );
    }

    #[test]
    fn test_negotiation_miss() {
        let cfg = config();
        assert_eq!(select_encoding(Some("deflate, identity"), &cfg), None);
        assert_eq!(select_encoding(Some(""), &cfg), None);
        assert_eq!(select_encoding(None, &cfg), None);
    }

    #[test]
    fn test_disabled_codecs_skipped() {
        let cfg = CompressionConfig::builder().enable_brotli(false).build();
        assert_eq!(
            select_encoding(Some("br, gzip"), &cfg),
            Some(Encoding::Gzip)
        );

        let cfg = CompressionConfig::builder()
            .enable_brotli(false)
            .enable_gzip(false)
            .build();
        assert_eq!(select_encoding(Some("br, gzip"), &cfg), None);
    }
}
