/// RAW file discovery
///
/// Walks a folder tree and collects the files a batch operation should see.
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Supported RAW file extensions (common formats)
pub const RAW_EXTENSIONS: [&str; 16] = [
    "nef", "dng", "cr2", "cr3", "arw", "raf", "orf", "rw2",
    "pef", "srw", "erf", "kdc", "dcr", "mos", "raw", "rwl",
];

/// Is `ext` (without the dot, any case) a known RAW extension?
pub fn is_raw_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    RAW_EXTENSIONS.contains(&ext.as_str())
}

/// Is `path` a RAW file judging by its extension?
pub fn is_raw_file(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => is_raw_extension(&ext.to_string_lossy()),
        None => false,
    }
}

/// Recursively collect all RAW files under `folder`
pub fn collect_raw_files(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    println!("🔍 Scanning folder: {}", folder.display());

    for entry in WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && is_raw_file(path) {
            files.push(path.to_path_buf());
        }
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extension_matching() {
        assert!(is_raw_extension("nef"));
        assert!(is_raw_extension("CR2"));
        assert!(!is_raw_extension("jpg"));
        assert!(is_raw_file(Path::new("a/b/shot.ARW")));
        assert!(!is_raw_file(Path::new("a/b/shot")));
    }

    #[test]
    fn test_collect_recurses_and_filters() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        fs::create_dir_all(dir.join("sub")).unwrap();
        fs::write(dir.join("a.nef"), b"x").unwrap();
        fs::write(dir.join("b.jpg"), b"x").unwrap();
        fs::write(dir.join("sub/c.CR2"), b"x").unwrap();

        let mut found = collect_raw_files(dir);
        found.sort();
        assert_eq!(found, vec![dir.join("a.nef"), dir.join("sub/c.CR2")]);
    }
}
