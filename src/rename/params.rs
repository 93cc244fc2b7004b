/// Validated batch-rename parameters
///
/// `RenameParams` is built once per batch from the persisted `RenameOptions`,
/// then used read-only while the batch runs. Building it validates the
/// pattern text and the sidecar list independently so the caller can show
/// both problems at once.
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::pattern::{Pattern, PatternError};
use crate::meta::ImageMetadata;
use crate::paths;
use crate::settings::{ConflictAction, Normalization, RenameOptions};

/// Problems in the sidecar suffix list
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SidecarError {
    #[error("sidecar suffix {0:?} must not contain a path separator")]
    SeparatorInSuffix(String),
    #[error("sidecar entry \"+\" is missing a suffix")]
    EmptySuffix,
}

/// Validation result of `RenameParams::from_options`: pattern and sidecar
/// errors are collected independently and reported together
#[derive(Debug)]
pub struct OptionsError {
    pub pattern: Option<PatternError>,
    pub sidecars: Option<SidecarError>,
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.pattern, &self.sidecars) {
            (Some(p), Some(s)) => write!(f, "{}; {}", p, s),
            (Some(p), None) => write!(f, "{}", p),
            (None, Some(s)) => write!(f, "{}", s),
            (None, None) => write!(f, "invalid rename options"),
        }
    }
}

impl std::error::Error for OptionsError {}

/// Split a ";"-separated sidecar list into trimmed, validated suffixes
pub fn parse_sidecars(text: &str) -> Result<Vec<String>, SidecarError> {
    let mut out = Vec::new();
    for entry in text.split(';') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        if entry == "+" {
            return Err(SidecarError::EmptySuffix);
        }
        if entry.chars().any(std::path::is_separator) {
            return Err(SidecarError::SeparatorInSuffix(entry.to_string()));
        }
        out.push(entry.to_string());
    }
    Ok(out)
}

/// Everything the planner needs for one batch
#[derive(Debug)]
pub struct RenameParams {
    /// Destination directory; empty or "." keeps files next to their source
    pub basedir: PathBuf,
    pub pattern: Pattern,
    /// Sidecar suffixes; a leading '+' means "append after the extension"
    pub sidecars: Vec<String>,
    pub name_normalization: Normalization,
    pub extension_normalization: Normalization,
    pub allow_whitespace: bool,
    pub on_existing: ConflictAction,
    /// Extension of the parameter-file sidecar that travels with each image
    pub param_file_extension: String,
}

impl RenameParams {
    /// Validate `options` into usable parameters, collecting pattern and
    /// sidecar problems side by side
    pub fn from_options(
        options: &RenameOptions,
        param_file_extension: &str,
    ) -> Result<RenameParams, OptionsError> {
        let pattern = Pattern::compile(&options.pattern);
        let sidecars = parse_sidecars(&options.sidecars);

        match (pattern, sidecars) {
            (Ok(pattern), Ok(sidecars)) => {
                pattern.set_sequence_start(options.sequence_start);
                Ok(RenameParams {
                    basedir: PathBuf::from(&options.basedir),
                    pattern,
                    sidecars,
                    name_normalization: options.name_normalization,
                    extension_normalization: options.extension_normalization,
                    allow_whitespace: options.allow_whitespace,
                    on_existing: options.on_existing,
                    param_file_extension: param_file_extension.to_string(),
                })
            }
            (pattern, sidecars) => Err(OptionsError {
                pattern: pattern.err(),
                sidecars: sidecars.err(),
            }),
        }
    }

    /// Produce the new name for one file: evaluate the pattern, then apply
    /// the whitespace and case policies to stem and extension separately,
    /// then prefix the base directory
    pub fn new_name(&self, md: &dyn ImageMetadata) -> String {
        let name = self.pattern.evaluate(md);

        let ext = paths::extension(&name).to_string();
        let stem = if ext.is_empty() {
            name.clone()
        } else {
            paths::remove_extension(&name).to_string()
        };

        let mut ret = String::new();
        for c in stem.chars() {
            push_normalized(&mut ret, c, self.name_normalization, self.allow_whitespace);
        }
        if !ext.is_empty() {
            for c in format!(".{}", ext).chars() {
                push_normalized(
                    &mut ret,
                    c,
                    self.extension_normalization,
                    self.allow_whitespace,
                );
            }
        }

        if self.basedir.as_os_str().is_empty() || self.basedir == Path::new(".") {
            ret
        } else {
            self.basedir.join(ret).to_string_lossy().into_owned()
        }
    }
}

fn push_normalized(out: &mut String, c: char, norm: Normalization, allow_whitespace: bool) {
    let c = if !allow_whitespace && c.is_whitespace() {
        '_'
    } else {
        c
    };
    match norm {
        Normalization::Off => out.push(c),
        Normalization::Uppercase => out.extend(c.to_uppercase()),
        Normalization::Lowercase => out.extend(c.to_lowercase()),
    }
}
