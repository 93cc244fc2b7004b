/// One decoded inspector image
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::preview::{Histogram, PreviewDecoder, SizeHint};

/// A decoded preview surface, its histogram, and the path it came from
///
/// Buffers are handed out behind `Arc` so a caller can keep rendering one
/// while the cache has already evicted it.
pub struct InspectorBuffer {
    pub path: PathBuf,
    pub image: RgbaImage,
    pub histogram: Histogram,
}

impl InspectorBuffer {
    /// Decode `path` through the collaborator.
    ///
    /// Any decode failure (missing file, no extension, no embedded preview,
    /// corrupt data) yields None; nothing broken is ever constructed.
    pub fn load(
        path: &Path,
        hint: SizeHint,
        decoder: &dyn PreviewDecoder,
    ) -> Option<InspectorBuffer> {
        match decoder.decode(path, hint) {
            Ok(preview) => Some(InspectorBuffer {
                path: path.to_path_buf(),
                image: preview.image,
                histogram: preview.histogram,
            }),
            Err(_) => None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
