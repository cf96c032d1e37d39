//! Compression codec implementations

use crate::Result;
use std::io::Write;

/// Named content encodings the middleware can negotiate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Gzip compression (widely supported)
    Gzip,

    /// Brotli compression (best ratio for text)
    Brotli,
}

impl Encoding {
    /// Get the Content-Encoding header value for this encoding
    pub fn encoding_name(&self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Brotli => "br",
        }
    }

    /// Get the minimum quality level for this encoding
    pub fn min_quality(&self) -> u32 {
        match self {
            Self::Gzip => 1,
            Self::Brotli => 0,
        }
    }

    /// Get the maximum quality level for this encoding
    pub fn max_quality(&self) -> u32 {
        match self {
            Self::Gzip => 9,
            Self::Brotli => 11,
        }
    }

    /// Get the default quality level for this encoding
    pub fn default_quality(&self) -> u32 {
        match self {
            Self::Gzip => 6,
            Self::Brotli => 4,
        }
    }

    /// Compress data with this encoding
    ///
    /// Pure apart from the work itself: no shared state is touched. Callers
    /// decide what to do with a failure; the middleware treats any error as
    /// "serve the response uncompressed".
    pub fn compress(&self, data: &[u8], quality: u32) -> Result<Vec<u8>> {
        match self {
            Self::Gzip => compress_gzip(data, quality),
            Self::Brotli => compress_brotli(data, quality),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gzip => write!(f, "gzip"),
            Self::Brotli => write!(f, "brotli"),
        }
    }
}

// ========== Gzip Implementation ==========

fn compress_gzip(data: &[u8], quality: u32) -> Result<Vec<u8>> {
    use flate2::Compression;
    use flate2::write::GzEncoder;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(quality));
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

// ========== Brotli Implementation ==========

fn compress_brotli(data: &[u8], quality: u32) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let params = brotli::enc::BrotliEncoderParams {
        quality: quality as i32,
        ..Default::default()
    };

    let mut reader = std::io::Cursor::new(data);
    brotli::BrotliCompress(&mut reader, &mut output, &params)?;

    Ok(output)
}
