/// Rename target planning
///
/// Turns one source file plus the batch parameters into the ordered list of
/// (source, destination) moves: the image itself first, then its sidecars.
/// The destination conflict is resolved for the primary file BEFORE any
/// sidecar path is derived, so sidecars always follow the name that was
/// actually accepted.
///
/// Planning only computes paths and checks existence; it never moves,
/// copies or deletes anything.
use std::path::{Path, PathBuf};

use super::params::RenameParams;
use crate::meta::ImageMetadata;
use crate::paths;
use crate::settings::ConflictAction;

/// Append `suffix` after the complete file name ("a.cr2" + "arp" -> "a.cr2.arp")
fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}.{}", path.to_string_lossy(), suffix))
}

/// Replace the extension with `suffix` ("a.cr2" + "xmp" -> "a.xmp")
fn replace_extension(path: &Path, suffix: &str) -> PathBuf {
    let s = path.to_string_lossy();
    PathBuf::from(format!("{}.{}", paths::remove_extension(&s), suffix))
}

/// Compute the moves for one file.
///
/// Returns the primary pair first, followed by the parameter-file sidecar
/// and any configured sidecars that exist on disk (each source appears at
/// most once). An empty list means "skip this file" — the destination
/// already exists and the conflict policy says to leave it alone.
pub fn plan_targets(
    params: &RenameParams,
    source: &Path,
    md: &dyn ImageMetadata,
) -> Vec<(PathBuf, PathBuf)> {
    let mut out = Vec::new();

    let dir = source.parent().unwrap_or_else(|| Path::new(""));
    let new_name = params.new_name(md);
    let mut new_path = if Path::new(&new_name).is_absolute() {
        PathBuf::from(&new_name)
    } else {
        dir.join(&new_name)
    };

    if new_path.exists() {
        match params.on_existing {
            ConflictAction::Skip => return out,
            ConflictAction::Rename => {
                let stem = paths::remove_extension(&new_name).to_string();
                let ext = paths::extension(&new_name);
                let ext = if ext.is_empty() {
                    String::new()
                } else {
                    format!(".{}", ext)
                };
                // Probe stem_1.ext, stem_2.ext, ... until a free slot shows up
                for i in 1.. {
                    let candidate_name = format!("{}_{}{}", stem, i, ext);
                    let candidate = if Path::new(&candidate_name).is_absolute() {
                        PathBuf::from(&candidate_name)
                    } else {
                        dir.join(&candidate_name)
                    };
                    if !candidate.exists() {
                        new_path = candidate;
                        break;
                    }
                }
            }
        }
    }

    out.push((source.to_path_buf(), new_path.clone()));

    // The processing-parameter sidecar always travels with its image
    let param_file = append_suffix(source, &params.param_file_extension);
    if param_file.exists() {
        out.push((
            param_file,
            append_suffix(&new_path, &params.param_file_extension),
        ));
    }

    // Configured sidecars: include each at most once, and only if present
    let already_planned =
        |out: &[(PathBuf, PathBuf)], p: &Path| out.iter().any(|(src, _)| src.as_path() == p);

    for suffix in &params.sidecars {
        let (orig, dest) = match suffix.strip_prefix('+') {
            Some(tail) => (append_suffix(source, tail), append_suffix(&new_path, tail)),
            None => (
                replace_extension(source, suffix),
                replace_extension(&new_path, suffix),
            ),
        };
        if orig.exists() && !already_planned(&out, &orig) {
            out.push((orig, dest));
        }
    }

    out
}
