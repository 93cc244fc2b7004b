/// Persisted application settings
///
/// Rename and inspector options are stored as JSON in the user's config
/// directory, so a batch-rename setup survives restarts. All fields have
/// safe defaults; a missing or unreadable settings file simply yields
/// `Settings::default()`.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

/// Case normalization applied to a produced name or extension
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    #[default]
    Off,
    Uppercase,
    Lowercase,
}

/// What to do when the computed destination already exists
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictAction {
    /// Leave the file alone; the plan comes back empty
    #[default]
    Skip,
    /// Probe stem_1.ext, stem_2.ext, ... until an unused name is found
    Rename,
}

/// Batch-rename configuration as entered in the rename dialog
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RenameOptions {
    /// Destination directory; "" or "." means "next to the source"
    pub basedir: String,
    /// Naming pattern text (see rename::Pattern for the directive table)
    pub pattern: String,
    /// Semicolon-separated sidecar suffix list ("xmp;+thumb")
    pub sidecars: String,
    pub name_normalization: Normalization,
    pub extension_normalization: Normalization,
    /// Keep whitespace in produced names instead of replacing it with '_'
    pub allow_whitespace: bool,
    pub on_existing: ConflictAction,
    /// Starting value for the %n sequence counter
    pub sequence_start: i64,
}

impl Default for RenameOptions {
    fn default() -> Self {
        RenameOptions {
            basedir: String::new(),
            pattern: "%f".to_string(),
            sidecars: String::new(),
            name_normalization: Normalization::Off,
            extension_normalization: Normalization::Off,
            allow_whitespace: false,
            on_existing: ConflictAction::Skip,
            sequence_start: 1,
        }
    }
}

/// Inspector pane configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InspectorOptions {
    /// How many decoded preview buffers to keep in memory
    pub max_buffers: usize,
    /// Decode previews sized to the viewport instead of natural size
    pub zoom_fit: bool,
    /// Compute and keep the per-channel histogram of each preview
    pub show_histogram: bool,
}

impl Default for InspectorOptions {
    fn default() -> Self {
        InspectorOptions {
            max_buffers: 3,
            zoom_fit: false,
            show_histogram: true,
        }
    }
}

impl InspectorOptions {
    /// Configured capacity, clamped to the minimum the cache supports
    pub fn effective_capacity(&self) -> usize {
        self.max_buffers.max(1)
    }
}

/// Everything this crate persists
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub renaming: RenameOptions,
    pub inspector: InspectorOptions,
    /// Extension of the processing-parameter sidecar, appended after the
    /// full file name ("IMG_0042.CR2.arp")
    pub param_file_extension: Option<String>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Default extension of the parameter-file sidecar
pub const PARAM_FILE_EXTENSION: &str = "arp";

impl Settings {
    /// Extension used for the parameter-file sidecar
    pub fn param_file_extension(&self) -> &str {
        self.param_file_extension.as_deref().unwrap_or(PARAM_FILE_EXTENSION)
    }

    /// Get the path where the settings file is stored
    ///
    /// - Linux: ~/.config/raw-organizer/settings.json
    /// - macOS: ~/Library/Application Support/raw-organizer/settings.json
    /// - Windows: %APPDATA%\raw-organizer\settings.json
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user config directory");

        path.push("raw-organizer");
        path.push("settings.json");
        path
    }

    /// Convert to JSON string for storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist yet
    pub fn load(path: &std::path::Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let json = fs::read_to_string(path)?;
        Ok(Settings::from_json(&json)?)
    }

    /// Save settings to `path`, creating parent directories as needed
    pub fn save(&self, path: &std::path::Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.renaming.pattern, "%f");
        assert_eq!(settings.renaming.sequence_start, 1);
        assert_eq!(settings.renaming.on_existing, ConflictAction::Skip);
        assert_eq!(settings.param_file_extension(), "arp");
    }

    #[test]
    fn test_serialization() {
        let mut settings = Settings::default();
        settings.renaming.pattern = "%Y%m%d_%n4".to_string();
        settings.renaming.on_existing = ConflictAction::Rename;
        settings.inspector.max_buffers = 8;

        // Serialize to JSON
        let json = settings.to_json().unwrap();

        // Deserialize back
        let restored = Settings::from_json(&json).unwrap();

        assert_eq!(settings, restored);
    }

    #[test]
    fn test_capacity_clamp() {
        let mut options = InspectorOptions::default();
        options.max_buffers = 0;
        assert_eq!(options.effective_capacity(), 1);
        options.max_buffers = 12;
        assert_eq!(options.effective_capacity(), 12);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings, Settings::default());

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}
