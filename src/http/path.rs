//! Request path translation
//!
//! Maps a request path onto the filesystem below the served root.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// A request path resolved against the root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedPath {
    /// Filesystem location, always `root` joined with zero or more plain segments
    pub fs_path: PathBuf,
    /// Whether the decoded request path ended with `/`
    pub trailing_slash: bool,
}

/// Translate a request path to a filesystem path under `root`
///
/// The query string and fragment are dropped, the remainder is
/// percent-decoded, and empty, `.` and `..` segments are discarded, so the
/// result can never climb above `root` lexically. Symlinks are checked later,
/// against the canonical root.
pub fn translate_path(root: &Path, request_path: &str) -> TranslatedPath {
    let path = request_path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let decoded = decode(path);
    let trailing_slash = decoded.trim_end().ends_with('/');

    let mut fs_path = root.to_path_buf();
    for segment in decoded.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        if cfg!(windows) && (segment.contains('\\') || segment.contains(':')) {
            continue;
        }
        fs_path.push(segment);
    }

    TranslatedPath {
        fs_path,
        trailing_slash,
    }
}

/// Percent-decode a path, replacing invalid UTF-8 sequences
fn decode(path: &str) -> Cow<'_, str> {
    match urlencoding::decode(path) {
        Ok(decoded) => decoded,
        Err(_) => {
            let bytes = urlencoding::decode_binary(path.as_bytes());
            Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(path: &str) -> TranslatedPath {
        translate_path(Path::new("/srv/dist"), path)
    }

    #[test]
    fn test_root_path() {
        let t = translate("/");
        assert_eq!(t.fs_path, Path::new("/srv/dist"));
        assert!(t.trailing_slash);
    }

    #[test]
    fn test_nested_file() {
        let t = translate("/assets/img/logo.png");
        assert_eq!(t.fs_path, Path::new("/srv/dist/assets/img/logo.png"));
        assert!(!t.trailing_slash);
    }

    #[test]
    fn test_query_and_fragment_are_dropped() {
        assert_eq!(
            translate("/app.js?v=3#top").fs_path,
            Path::new("/srv/dist/app.js")
        );
        assert!(translate("/assets/?sort=name").trailing_slash);
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(
            translate("/my%20file.txt").fs_path,
            Path::new("/srv/dist/my file.txt")
        );
    }

    #[test]
    fn test_traversal_segments_are_discarded() {
        assert_eq!(translate("/../../etc/passwd").fs_path, Path::new("/srv/dist/etc/passwd"));
        assert_eq!(
            translate("/a/./b/../c").fs_path,
            Path::new("/srv/dist/a/b/c")
        );
        assert_eq!(
            translate("/%2e%2e/%2E%2E/etc/passwd").fs_path,
            Path::new("/srv/dist/etc/passwd")
        );
        assert_eq!(
            translate("/..%2f..%2fetc/passwd").fs_path,
            Path::new("/srv/dist/etc/passwd")
        );
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let t = translate("/bad%ff.txt");
        assert!(t.fs_path.starts_with("/srv/dist"));
        assert_eq!(t.fs_path.components().count(), 4);
    }
}
