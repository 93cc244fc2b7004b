/// Embedded-JPEG preview extraction
///
/// RAW files almost always carry one or more full JPEG renditions produced
/// in-camera. Scanning for JPEG markers and decoding the largest rendition
/// is orders of magnitude faster than demosaicing the sensor data, and is
/// all the inspector needs.
use std::fs;
use std::path::Path;

use image::{imageops::FilterType, DynamicImage, ImageFormat};

use super::{DecodeError, DecodedPreview, Histogram, PreviewDecoder, SizeHint};
use crate::paths;
use crate::scan;

/// Default preview decoder: embedded JPEG for RAW files, direct decode for
/// everything the image crate understands
pub struct EmbeddedPreviewDecoder {
    /// Compute the channel histogram of each decoded preview
    pub with_histogram: bool,
}

impl EmbeddedPreviewDecoder {
    pub fn new(with_histogram: bool) -> Self {
        EmbeddedPreviewDecoder { with_histogram }
    }
}

impl Default for EmbeddedPreviewDecoder {
    fn default() -> Self {
        EmbeddedPreviewDecoder::new(true)
    }
}

impl PreviewDecoder for EmbeddedPreviewDecoder {
    fn decode(&self, path: &Path, hint: SizeHint) -> Result<DecodedPreview, DecodeError> {
        if !path.exists() {
            return Err(DecodeError::NotFound(path.to_path_buf()));
        }
        let name = path.to_string_lossy();
        let ext = paths::extension(&name).to_lowercase();
        if ext.is_empty() {
            return Err(DecodeError::NoExtension(path.to_path_buf()));
        }

        let data = fs::read(path).map_err(|e| DecodeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let decoded = if scan::is_raw_extension(&ext) {
            extract_largest_jpeg(&data).ok_or_else(|| DecodeError::NoPreview(path.to_path_buf()))?
        } else {
            image::load_from_memory(&data).map_err(|e| DecodeError::Image {
                path: path.to_path_buf(),
                source: e,
            })?
        };

        let decoded = match hint {
            SizeHint::Natural => decoded,
            SizeHint::Fit { width, height } => {
                if decoded.width() > width || decoded.height() > height {
                    decoded.resize(width, height, FilterType::Lanczos3)
                } else {
                    decoded
                }
            }
        };

        let image = decoded.to_rgba8();
        let histogram = if self.with_histogram {
            Histogram::compute(&image)
        } else {
            Histogram::new()
        };

        Ok(DecodedPreview { image, histogram })
    }
}

/// Scan `data` for embedded JPEG streams and decode the largest one that
/// actually decodes
fn extract_largest_jpeg(data: &[u8]) -> Option<DynamicImage> {
    let jpeg_start = [0xFF, 0xD8];
    let jpeg_end = [0xFF, 0xD9];

    // Find all JPEG boundaries
    let mut candidates = Vec::new();
    for (i, window) in data.windows(2).enumerate() {
        if window == jpeg_start {
            if let Some(end_offset) = data[i..].windows(2).position(|w| w == jpeg_end) {
                let end = i + end_offset + 1;
                candidates.push((end - i + 1, i, end));
            }
        }
    }

    // Try candidates from largest to smallest; a false SOI marker inside
    // other data simply fails to decode and the next one is tried
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    for (_, start, end) in candidates {
        if let Ok(img) = image::load_from_memory_with_format(&data[start..=end], ImageFormat::Jpeg)
        {
            return Some(img);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::io::Cursor;

    /// A small valid JPEG stream for embedding in fake RAW files
    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut img = RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb([128, 64, 32]);
        }
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_plain_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.jpg");
        fs::write(&path, jpeg_bytes(8, 4)).unwrap();

        let decoder = EmbeddedPreviewDecoder::default();
        let preview = decoder.decode(&path, SizeHint::Natural).unwrap();
        assert_eq!(preview.image.dimensions(), (8, 4));
        assert_eq!(preview.histogram.data[0].iter().sum::<u32>(), 32);
    }

    #[test]
    fn test_decode_embedded_jpeg_in_raw() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.cr2");

        // Surround the JPEG stream with opaque sensor-ish bytes
        let mut data = vec![0u8; 512];
        data.extend_from_slice(&jpeg_bytes(8, 4));
        data.extend_from_slice(&[0u8; 512]);
        fs::write(&path, data).unwrap();

        let decoder = EmbeddedPreviewDecoder::default();
        let preview = decoder.decode(&path, SizeHint::Natural).unwrap();
        assert_eq!(preview.image.dimensions(), (8, 4));
    }

    #[test]
    fn test_fit_hint_downscales() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.jpg");
        fs::write(&path, jpeg_bytes(16, 8)).unwrap();

        let decoder = EmbeddedPreviewDecoder::default();
        let hint = SizeHint::Fit {
            width: 8,
            height: 8,
        };
        let preview = decoder.decode(&path, hint).unwrap();
        // Aspect ratio is preserved while fitting the box
        assert_eq!(preview.image.dimensions(), (8, 4));

        // Smaller images are left alone
        let hint = SizeHint::Fit {
            width: 100,
            height: 100,
        };
        let preview = decoder.decode(&path, hint).unwrap();
        assert_eq!(preview.image.dimensions(), (16, 8));
    }

    #[test]
    fn test_failures() {
        let dir = tempfile::tempdir().unwrap();
        let decoder = EmbeddedPreviewDecoder::default();

        let missing = dir.path().join("nope.cr2");
        assert!(matches!(
            decoder.decode(&missing, SizeHint::Natural),
            Err(DecodeError::NotFound(_))
        ));

        let bare = dir.path().join("noext");
        fs::write(&bare, b"data").unwrap();
        assert!(matches!(
            decoder.decode(&bare, SizeHint::Natural),
            Err(DecodeError::NoExtension(_))
        ));

        let junk = dir.path().join("junk.nef");
        fs::write(&junk, vec![0u8; 64]).unwrap();
        assert!(matches!(
            decoder.decode(&junk, SizeHint::Natural),
            Err(DecodeError::NoPreview(_))
        ));
    }

    #[test]
    fn test_histogram_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.jpg");
        fs::write(&path, jpeg_bytes(4, 4)).unwrap();

        let decoder = EmbeddedPreviewDecoder::new(false);
        let preview = decoder.decode(&path, SizeHint::Natural).unwrap();
        assert_eq!(preview.histogram.max_count(), 0);
    }
}
