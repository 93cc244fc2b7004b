/// Image metadata access
///
/// This module defines the interface the rename engine and the inspector use
/// to read shot metadata. The actual metadata extraction (Exif/IPTC/XMP
/// parsing) is a collaborator supplied by the embedding application:
/// - `ImageMetadata` is one file's metadata record
/// - `MetadataLoader` produces records from paths (the full, slow read)
/// - `FastMetadata` (summary.rs) serves cached summary fields without a
///   full read, falling back to the loader only when needed

pub mod summary;

pub use summary::{FastMetadata, MetadataLoader, MetadataSummary};

use chrono::NaiveDateTime;

/// Metadata of a single image file
///
/// All accessors have neutral defaults so that partial providers (and test
/// stubs) only implement what they actually know.
pub trait ImageMetadata {
    /// Full path of the file this record describes
    fn file_name(&self) -> String {
        String::new()
    }

    /// Capture timestamp, if the file carries one
    fn date_time(&self) -> Option<NaiveDateTime> {
        None
    }

    /// ISO speed (0 when unknown)
    fn iso_speed(&self) -> u32 {
        0
    }

    /// Aperture f-number (0.0 when unknown)
    fn f_number(&self) -> f64 {
        0.0
    }

    /// Focal length in mm (0.0 when unknown)
    fn focal_length(&self) -> f64 {
        0.0
    }

    /// 35mm-equivalent focal length in mm (0.0 when unknown)
    fn focal_length_35mm(&self) -> f64 {
        0.0
    }

    /// Shutter speed in seconds (0.0 when unknown)
    fn shutter_speed(&self) -> f64 {
        0.0
    }

    /// Exposure compensation in EV
    fn exposure_compensation(&self) -> f64 {
        0.0
    }

    /// Camera make string
    fn make(&self) -> String {
        String::new()
    }

    /// Camera model string
    fn model(&self) -> String {
        String::new()
    }

    /// Lens description string
    fn lens(&self) -> String {
        String::new()
    }

    /// Orientation string as stored in the file (e.g. "Rotate 90 CW")
    fn orientation(&self) -> String {
        String::new()
    }

    /// Star rating (0-5)
    fn rating(&self) -> i32 {
        0
    }

    /// Color label index (0 = none)
    fn color_label(&self) -> i32 {
        0
    }

    /// Pixel dimensions, (0, 0) when unknown
    fn dimensions(&self) -> (u32, u32) {
        (0, 0)
    }

    /// Raw tag lookup by namespaced key ("Exif.*", "Iptc.*", "Xmp.*")
    fn tag(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Format an aperture value the way it is shown next to images ("4.0", "11.3")
pub fn aperture_to_string(aperture: f64) -> String {
    format!("{:.1}", aperture)
}

/// Format a shutter speed: fractional for fast exposures ("1/250"),
/// decimal seconds for long ones ("2.5")
pub fn shutter_to_string(speed: f64) -> String {
    if speed > 0.0 && speed <= 0.5 {
        format!("1/{:.0}", 1.0 / speed)
    } else {
        format!("{:.1}", speed)
    }
}

/// Format an exposure compensation value; `maybe_plus` adds an explicit
/// sign for positive values ("+0.67")
pub fn expcomp_to_string(expcomp: f64, maybe_plus: bool) -> String {
    if maybe_plus && expcomp > 0.0 {
        format!("+{:.2}", expcomp)
    } else {
        format!("{:.2}", expcomp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aperture_formatting() {
        assert_eq!(aperture_to_string(4.0), "4.0");
        assert_eq!(aperture_to_string(1.8), "1.8");
    }

    #[test]
    fn test_shutter_formatting() {
        assert_eq!(shutter_to_string(0.004), "1/250");
        assert_eq!(shutter_to_string(0.5), "1/2");
        assert_eq!(shutter_to_string(2.5), "2.5");
        assert_eq!(shutter_to_string(0.0), "0.0");
    }

    #[test]
    fn test_expcomp_formatting() {
        assert_eq!(expcomp_to_string(0.67, true), "+0.67");
        assert_eq!(expcomp_to_string(0.67, false), "0.67");
        assert_eq!(expcomp_to_string(-1.0, true), "-1.00");
        assert_eq!(expcomp_to_string(0.0, false), "0.00");
    }
}
