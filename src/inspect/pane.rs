/// Inspector pane state
///
/// The widget-independent part of the image inspector: which image is
/// showing, how big previews should be decoded, and which neighbors to warm
/// in the cache so stepping through a shoot feels instant.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::buffer::InspectorBuffer;
use super::cache::BufferCache;
use crate::preview::{EmbeddedPreviewDecoder, PreviewDecoder, SizeHint};
use crate::settings::InspectorOptions;

pub struct Inspector {
    cache: BufferCache,
    current_path: Option<PathBuf>,
    current: Option<Arc<InspectorBuffer>>,
    zoom_fit: bool,
    viewport: Option<(u32, u32)>,
}

impl Inspector {
    pub fn new(options: &InspectorOptions, decoder: Arc<dyn PreviewDecoder>) -> Self {
        Inspector {
            cache: BufferCache::new(options.effective_capacity(), decoder),
            current_path: None,
            current: None,
            zoom_fit: options.zoom_fit,
            viewport: None,
        }
    }

    /// Inspector backed by the built-in embedded-JPEG decoder
    pub fn with_default_decoder(options: &InspectorOptions) -> Self {
        let decoder = EmbeddedPreviewDecoder::new(options.show_histogram);
        Inspector::new(options, Arc::new(decoder))
    }

    /// The decode size previews should be requested at right now
    fn size_hint(&self) -> SizeHint {
        match (self.zoom_fit, self.viewport) {
            (true, Some((width, height))) => SizeHint::Fit { width, height },
            _ => SizeHint::Natural,
        }
    }

    /// Tell the inspector how large its display area is
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        let viewport = Some((width, height));
        if self.viewport != viewport {
            self.viewport = viewport;
            if self.zoom_fit {
                // Fitted previews were decoded for the old size
                self.reload();
            }
        }
    }

    /// Toggle between fit-to-viewport and natural-size decoding
    pub fn set_zoom_fit(&mut self, zoom_fit: bool) {
        if self.zoom_fit != zoom_fit {
            self.zoom_fit = zoom_fit;
            self.reload();
        }
    }

    /// Show `path` (or nothing), loading through the cache
    pub fn switch_image(&mut self, path: Option<&Path>) -> Option<&Arc<InspectorBuffer>> {
        self.current_path = path.map(Path::to_path_buf);
        self.current = match path {
            Some(p) => self.cache.get(p, self.size_hint()),
            None => None,
        };
        self.current.as_ref()
    }

    /// The buffer currently on display
    pub fn current(&self) -> Option<&Arc<InspectorBuffer>> {
        self.current.as_ref()
    }

    /// Warm the cache for the images next to the current one.
    ///
    /// The next image is only worth a slot when the cache can hold more
    /// than the current image; the previous one needs a third slot.
    pub fn preload_neighbors(&self, previous: Option<&Path>, next: Option<&Path>) {
        if self.cache.capacity() > 1 {
            if let Some(next) = next {
                self.cache.preload(next, self.size_hint());
            }
        }
        if self.cache.capacity() > 2 {
            if let Some(previous) = previous {
                self.cache.preload(previous, self.size_hint());
            }
        }
    }

    /// Drop every cached buffer and the current one; used when a setting
    /// that changes decoded pixels is toggled
    pub fn flush(&mut self) {
        self.cache.invalidate_all();
        self.current = None;
    }

    /// Flush and re-decode the current image under the new settings
    fn reload(&mut self) {
        self.flush();
        if let Some(path) = self.current_path.clone() {
            self.current = self.cache.get(&path, self.size_hint());
        }
    }

    pub fn cache(&self) -> &BufferCache {
        &self.cache
    }
}
