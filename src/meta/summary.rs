/// Summary-backed metadata with lazy full fallback
///
/// Thumbnail caches already hold the handful of metadata fields shown in the
/// file browser. Renaming a thousand files must not re-parse a thousand
/// headers, so `FastMetadata` answers from the summary whenever its validity
/// flags allow, and performs the full read at most once, only when a field
/// (or a raw tag lookup) actually needs it.
use std::cell::RefCell;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::ImageMetadata;

/// Performs the full (slow) metadata read for a file
pub trait MetadataLoader {
    /// Read the complete metadata record, or None if the file has none
    fn read(&self, path: &Path) -> Option<Box<dyn ImageMetadata>>;
}

/// The summary fields a browser cache keeps per image
///
/// `date_time` doubles as the time-validity flag; `exif_valid` gates all the
/// shot fields below it.
#[derive(Debug, Clone, Default)]
pub struct MetadataSummary {
    pub date_time: Option<NaiveDateTime>,
    pub exif_valid: bool,
    pub iso_speed: u32,
    pub f_number: f64,
    pub focal_length: f64,
    pub focal_length_35mm: f64,
    pub shutter_speed: f64,
    pub exposure_compensation: f64,
    pub make: String,
    pub model: String,
    pub lens: String,
    pub orientation: String,
    pub rating: i32,
    pub color_label: i32,
    pub width: u32,
    pub height: u32,
}

/// Metadata view that prefers cached summary fields over a full read
pub struct FastMetadata<'a> {
    path: PathBuf,
    summary: Option<MetadataSummary>,
    loader: &'a dyn MetadataLoader,
    // Full record, loaded at most once; the outer Option tracks whether the
    // load has been attempted, the inner one whether it succeeded.
    full: RefCell<Option<Option<Box<dyn ImageMetadata>>>>,
}

impl<'a> FastMetadata<'a> {
    pub fn new(
        path: impl Into<PathBuf>,
        summary: Option<MetadataSummary>,
        loader: &'a dyn MetadataLoader,
    ) -> Self {
        FastMetadata {
            path: path.into(),
            summary,
            loader,
            full: RefCell::new(None),
        }
    }

    /// Run `f` against the fully loaded record, loading it on first use.
    /// Returns `fallback` if the full read fails.
    fn with_full<T>(&self, f: impl FnOnce(&dyn ImageMetadata) -> T, fallback: T) -> T {
        let mut slot = self.full.borrow_mut();
        if slot.is_none() {
            *slot = Some(self.loader.read(&self.path));
        }
        match slot.as_ref().and_then(|r| r.as_deref()) {
            Some(md) => f(md),
            None => fallback,
        }
    }

    /// True when the summary can answer shot-field queries
    fn summary_exif(&self) -> Option<&MetadataSummary> {
        self.summary.as_ref().filter(|s| s.exif_valid)
    }

    /// True once the full record has been loaded successfully
    fn full_loaded(&self) -> bool {
        matches!(self.full.borrow().as_ref(), Some(Some(_)))
    }
}

impl ImageMetadata for FastMetadata<'_> {
    fn file_name(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    fn date_time(&self) -> Option<NaiveDateTime> {
        // Once the full record is in memory it is authoritative
        if self.full_loaded() {
            return self.with_full(|m| m.date_time(), None);
        }
        if let Some(t) = self.summary.as_ref().and_then(|s| s.date_time) {
            return Some(t);
        }
        self.with_full(|m| m.date_time(), None)
    }

    fn iso_speed(&self) -> u32 {
        match self.summary_exif() {
            Some(s) => s.iso_speed,
            None => self.with_full(|m| m.iso_speed(), 0),
        }
    }

    fn f_number(&self) -> f64 {
        match self.summary_exif() {
            Some(s) => s.f_number,
            None => self.with_full(|m| m.f_number(), 0.0),
        }
    }

    fn focal_length(&self) -> f64 {
        match self.summary_exif() {
            Some(s) => s.focal_length,
            None => self.with_full(|m| m.focal_length(), 0.0),
        }
    }

    fn focal_length_35mm(&self) -> f64 {
        match self.summary_exif() {
            Some(s) => s.focal_length_35mm,
            None => self.with_full(|m| m.focal_length_35mm(), 0.0),
        }
    }

    fn shutter_speed(&self) -> f64 {
        match self.summary_exif() {
            Some(s) => s.shutter_speed,
            None => self.with_full(|m| m.shutter_speed(), 0.0),
        }
    }

    fn exposure_compensation(&self) -> f64 {
        match self.summary_exif() {
            Some(s) => s.exposure_compensation,
            None => self.with_full(|m| m.exposure_compensation(), 0.0),
        }
    }

    fn make(&self) -> String {
        match self.summary_exif() {
            Some(s) => s.make.clone(),
            None => self.with_full(|m| m.make(), String::new()),
        }
    }

    fn model(&self) -> String {
        match self.summary_exif() {
            Some(s) => s.model.clone(),
            None => self.with_full(|m| m.model(), String::new()),
        }
    }

    fn lens(&self) -> String {
        match self.summary_exif() {
            Some(s) => s.lens.clone(),
            None => self.with_full(|m| m.lens(), String::new()),
        }
    }

    fn orientation(&self) -> String {
        match self.summary_exif() {
            Some(s) => s.orientation.clone(),
            None => self.with_full(|m| m.orientation(), String::new()),
        }
    }

    fn rating(&self) -> i32 {
        match self.summary_exif() {
            Some(s) => s.rating,
            None => self.with_full(|m| m.rating(), 0),
        }
    }

    fn color_label(&self) -> i32 {
        match self.summary_exif() {
            Some(s) => s.color_label,
            None => self.with_full(|m| m.color_label(), 0),
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        match self.summary_exif() {
            Some(s) => (s.width, s.height),
            None => self.with_full(|m| m.dimensions(), (0, 0)),
        }
    }

    fn tag(&self, key: &str) -> Option<String> {
        // Raw tag lookups are never summarized
        self.with_full(|m| m.tag(key), None)
    }
}
