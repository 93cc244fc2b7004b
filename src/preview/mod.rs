/// Preview decoding
///
/// This module handles:
/// - The decoder interface the inspector cache loads through (PreviewDecoder)
/// - The default decoder that extracts embedded JPEGs from RAW files
///   (embedded.rs)
/// - Three-channel histograms of decoded previews (histogram.rs)

pub mod embedded;
pub mod histogram;

pub use embedded::EmbeddedPreviewDecoder;
pub use histogram::Histogram;

use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;

/// Requested decode size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeHint {
    /// Decode at whatever size the preview naturally has
    Natural,
    /// Downscale so the result fits within width x height
    Fit { width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("{0:?} has no usable extension")]
    NoExtension(PathBuf),
    #[error("no embedded preview found in {0:?}")]
    NoPreview(PathBuf),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {path:?}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// A decoded preview surface plus its channel histogram
#[derive(Debug, Clone)]
pub struct DecodedPreview {
    pub image: RgbaImage,
    pub histogram: Histogram,
}

/// Collaborator that turns an image file into a preview surface
///
/// Implementations must be callable from a decode-worker thread.
pub trait PreviewDecoder: Send + Sync {
    fn decode(&self, path: &Path, hint: SizeHint) -> Result<DecodedPreview, DecodeError>;
}
