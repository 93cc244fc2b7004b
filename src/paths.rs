/// Filename stem/extension splitting
///
/// The splitting rule is shared by the rename engine, the target planner and
/// the preview decoder, so it lives in one place. The extension starts after
/// the last dot of the final path segment, but only when no whitespace occurs
/// after that dot. "IMG_0042.CR2" has extension "CR2"; "scan v2.0 final" has
/// no extension because the dot is followed by a space.

/// Whitespace characters that veto an extension split
const WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0b', '\x0c'];

/// Return the final path segment of `filename`
pub fn basename(filename: &str) -> &str {
    let base_start = filename
        .rfind(std::path::is_separator)
        .map(|i| i + 1)
        .unwrap_or(0);
    &filename[base_start..]
}

/// Byte index of the extension dot in `filename`, if the name has one
fn extension_dot(filename: &str) -> Option<usize> {
    // Only the final path segment participates in the split
    let base = basename(filename);
    let base_start = filename.len() - base.len();

    let last_dot = base.rfind('.')?;

    // A dot followed by whitespace does not start an extension
    match base.rfind(WHITESPACE) {
        Some(ws) if last_dot < ws => None,
        _ => Some(base_start + last_dot),
    }
}

/// Return `filename` without its extension (directories are preserved)
pub fn remove_extension(filename: &str) -> &str {
    match extension_dot(filename) {
        Some(dot) => &filename[..dot],
        None => filename,
    }
}

/// Return the extension of `filename` without the dot, or "" if there is none
pub fn extension(filename: &str) -> &str {
    match extension_dot(filename) {
        Some(dot) => &filename[dot + 1..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_split() {
        assert_eq!(extension("IMG_0042.CR2"), "CR2");
        assert_eq!(remove_extension("IMG_0042.CR2"), "IMG_0042");
    }

    #[test]
    fn test_last_dot_wins() {
        assert_eq!(extension("archive.tar.gz"), "gz");
        assert_eq!(remove_extension("archive.tar.gz"), "archive.tar");
    }

    #[test]
    fn test_whitespace_after_dot_vetoes() {
        // The dot is followed by a space, so there is no extension
        assert_eq!(extension("scan v2.0 final"), "");
        assert_eq!(remove_extension("scan v2.0 final"), "scan v2.0 final");
    }

    #[test]
    fn test_whitespace_before_dot_is_fine() {
        assert_eq!(extension("my photo.jpg"), "jpg");
        assert_eq!(remove_extension("my photo.jpg"), "my photo");
    }

    #[test]
    fn test_directory_prefix_preserved() {
        assert_eq!(remove_extension("shoot/day1/IMG.NEF"), "shoot/day1/IMG");
        assert_eq!(extension("shoot/day1/IMG.NEF"), "NEF");
        // A dot in a directory name is not an extension
        assert_eq!(extension("shoot.d/readme"), "");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("shoot/day1/IMG.NEF"), "IMG.NEF");
        assert_eq!(basename("IMG.NEF"), "IMG.NEF");
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(extension("Makefile"), "");
        assert_eq!(remove_extension("Makefile"), "Makefile");
    }
}
