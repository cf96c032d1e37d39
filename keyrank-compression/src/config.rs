//! Configuration for the compression middleware

use crate::Encoding;

/// Configuration for the compression middleware
///
/// Created once at process start and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct CompressionConfig {
    /// Minimum response size in bytes to compress
    pub min_size: usize,

    /// Gzip compression level (1-9)
    pub gzip_level: u32,

    /// Brotli quality (0-11)
    pub brotli_quality: u32,

    /// Content-type substrings that qualify for compression
    pub content_types: Vec<String>,

    /// Request-path substrings that are never compressed
    pub exclude_paths: Vec<String>,

    /// Whether gzip may be negotiated
    pub enable_gzip: bool,

    /// Whether brotli may be negotiated
    pub enable_brotli: bool,

    /// Whether compressed payloads are cached
    pub cache_compressed: bool,

    /// Maximum number of cached payloads
    pub cache_capacity: usize,

    /// Largest body that will be buffered for compression; bigger responses
    /// pass through untouched
    pub max_buffer_size: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            min_size: 1024,
            gzip_level: 6,
            brotli_quality: 4,
            content_types: default_content_types(),
            exclude_paths: default_exclude_paths(),
            enable_gzip: true,
            enable_brotli: true,
            cache_compressed: true,
            cache_capacity: 128,
            max_buffer_size: 8 * 1024 * 1024,
        }
    }
}

impl CompressionConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for configuration
    pub fn builder() -> CompressionConfigBuilder {
        CompressionConfigBuilder::new()
    }

    /// Gzip level clamped to the encoder's supported range
    pub fn effective_gzip_level(&self) -> u32 {
        self.gzip_level
            .clamp(Encoding::Gzip.min_quality(), Encoding::Gzip.max_quality())
    }

    /// Brotli quality clamped to the encoder's supported range
    pub fn effective_brotli_quality(&self) -> u32 {
        self.brotli_quality.clamp(
            Encoding::Brotli.min_quality(),
            Encoding::Brotli.max_quality(),
        )
    }
}

/// Builder for CompressionConfig
#[derive(Debug, Clone, Default)]
pub struct CompressionConfigBuilder {
    config: CompressionConfig,
}

impl CompressionConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: CompressionConfig::default(),
        }
    }

    /// Set the minimum response size to compress
    pub fn min_size(mut self, min_size: usize) -> Self {
        self.config.min_size = min_size;
        self
    }

    /// Set the gzip compression level
    pub fn gzip_level(mut self, level: u32) -> Self {
        self.config.gzip_level = level;
        self
    }

    /// Set the brotli quality
    pub fn brotli_quality(mut self, quality: u32) -> Self {
        self.config.brotli_quality = quality;
        self
    }

    /// Set the compressible content-type substrings
    pub fn content_types(mut self, types: Vec<String>) -> Self {
        self.config.content_types = types;
        self
    }

    /// Add a compressible content-type substring
    pub fn add_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.config.content_types.push(content_type.into());
        self
    }

    /// Set the excluded path substrings
    pub fn exclude_paths(mut self, paths: Vec<String>) -> Self {
        self.config.exclude_paths = paths;
        self
    }

    /// Add an excluded path substring
    pub fn add_exclude_path(mut self, path: impl Into<String>) -> Self {
        self.config.exclude_paths.push(path.into());
        self
    }

    /// Enable or disable gzip
    pub fn enable_gzip(mut self, enable: bool) -> Self {
        self.config.enable_gzip = enable;
        self
    }

    /// Enable or disable brotli
    pub fn enable_brotli(mut self, enable: bool) -> Self {
        self.config.enable_brotli = enable;
        self
    }

    /// Enable or disable the compressed-payload cache
    pub fn cache_compressed(mut self, enable: bool) -> Self {
        self.config.cache_compressed = enable;
        self
    }

    /// Set the cache capacity
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Set the largest body that will be buffered for compression
    pub fn max_buffer_size(mut self, size: usize) -> Self {
        self.config.max_buffer_size = size;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CompressionConfig {
        self.config
    }
}

/// Default content-type substrings that should be compressed
fn default_content_types() -> Vec<String> {
    vec![
        "text/".to_string(),
        "application/json".to_string(),
        "application/javascript".to_string(),
        "application/xml".to_string(),
        "image/svg".to_string(),
    ]
}

/// Default path substrings that are never compressed
fn default_exclude_paths() -> Vec<String> {
    vec!["/health".to_string(), "/metrics".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompressionConfig::default();
        assert_eq!(config.min_size, 1024);
        assert_eq!(config.gzip_level, 6);
        assert_eq!(config.brotli_quality, 4);
        assert!(config.enable_gzip);
        assert!(config.enable_brotli);
        assert!(config.cache_compressed);
        assert_eq!(config.cache_capacity, 128);
    }

    #[test]
    fn test_builder() {
        let config = CompressionConfig::builder()
            .min_size(2048)
            .gzip_level(9)
            .cache_capacity(16)
            .enable_brotli(false)
            .build();

        assert_eq!(config.min_size, 2048);
        assert_eq!(config.gzip_level, 9);
        assert_eq!(config.cache_capacity, 16);
        assert!(!config.enable_brotli);
    }

    #[test]
    fn test_effective_levels_clamped() {
        let config = CompressionConfig::builder()
            .gzip_level(100)
            .brotli_quality(100)
            .build();

        assert_eq!(config.effective_gzip_level(), 9);
        assert_eq!(config.effective_brotli_quality(), 11);

        let config = CompressionConfig::builder().gzip_level(0).build();
        assert_eq!(config.effective_gzip_level(), 1);
    }

    #[test]
    fn test_default_lists() {
        let config = CompressionConfig::default();
        assert!(config.content_types.iter().any(|t| t == "application/json"));
        assert!(config.exclude_paths.iter().any(|p| p == "/health"));
    }
}
