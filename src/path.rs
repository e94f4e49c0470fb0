//! # Path and URI helpers
//!
//! Every boundary of the crate enforces the same shape rules:
//!
//! - a location path is absolute, ends in `/` and never doubles separators
//! - a file path is absolute and never ends in `/`
//! - `file.path() == location.path() + file.name()`
//!
//! URIs take the form `scheme://volume/path`. Schemes without a volume render
//! an empty authority (`file:///tmp/a.txt`).

use crate::VfsError;

/// Path separator used by every backend.
pub const SEPARATOR: char = '/';

/// Lexically normalize a path.
///
/// Collapses repeated separators, resolves `.` and `..` (never above the
/// root) and keeps a trailing separator if the input had one.
///
/// ```rust
/// use anyfs_vfs::path::normalize;
///
/// assert_eq!(normalize("/a//b/./c/../d.txt"), "/a/b/d.txt");
/// assert_eq!(normalize("/a/b/"), "/a/b/");
/// assert_eq!(normalize("/../"), "/");
/// ```
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with(SEPARATOR);
    let directory = path.ends_with(SEPARATOR) || path.ends_with("/.") || path.ends_with("/..");

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            s => segments.push(s),
        }
    }

    let mut out = String::with_capacity(path.len());
    if absolute {
        out.push(SEPARATOR);
    }
    out.push_str(&segments.join("/"));
    if directory && !segments.is_empty() {
        out.push(SEPARATOR);
    }
    out
}

/// Ensure `path` ends with a separator.
pub fn ensure_trailing_slash(path: &str) -> String {
    if path.ends_with(SEPARATOR) {
        path.to_owned()
    } else {
        format!("{path}/")
    }
}

/// Ensure `path` starts with a separator.
pub fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with(SEPARATOR) {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

/// Join a relative segment onto a base directory and normalize the result.
pub fn join(base: &str, relative: &str) -> String {
    normalize(&format!("{}{}", ensure_trailing_slash(base), relative))
}

/// Validate and normalize an absolute file path.
///
/// # Errors
///
/// [`VfsError::InvalidPath`] if the path is empty, relative, or a directory.
pub fn validate_file_path(path: &str) -> Result<String, VfsError> {
    validate_absolute(path)?;
    if path.ends_with(SEPARATOR) {
        return Err(invalid(path, "file path must not end with a separator"));
    }
    let normalized = normalize(path);
    if normalized.ends_with(SEPARATOR) {
        return Err(invalid(path, "file path resolves to a directory"));
    }
    Ok(normalized)
}

/// Validate and normalize an absolute location (directory) path.
///
/// # Errors
///
/// [`VfsError::InvalidPath`] if the path is empty, relative, or lacks the
/// trailing separator.
pub fn validate_location_path(path: &str) -> Result<String, VfsError> {
    validate_absolute(path)?;
    if !path.ends_with(SEPARATOR) {
        return Err(invalid(path, "location path must end with a separator"));
    }
    Ok(normalize(path))
}

/// Validate a segment passed to a location's `new_file`/`new_location`.
///
/// # Errors
///
/// [`VfsError::InvalidPath`] if the segment is empty or absolute.
pub fn validate_relative(relative: &str) -> Result<(), VfsError> {
    if relative.is_empty() {
        return Err(invalid(relative, "relative path must not be empty"));
    }
    if relative.starts_with(SEPARATOR) {
        return Err(invalid(relative, "path must be relative to the location"));
    }
    Ok(())
}

/// Split a normalized file path into its directory (trailing slash) and base name.
pub fn split_file_path(path: &str) -> (&str, &str) {
    match path.rfind(SEPARATOR) {
        Some(idx) => (&path[..=idx], &path[idx + 1..]),
        None => ("/", path),
    }
}

/// Render `scheme://volume/path`.
pub fn uri(scheme: &str, volume: &str, path: &str) -> String {
    format!("{scheme}://{volume}{}", ensure_leading_slash(path))
}

/// A URI split into its three parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUri {
    /// Scheme before `://`.
    pub scheme: String,
    /// Authority segment, empty for volume-less schemes.
    pub volume: String,
    /// Absolute path, including a trailing separator for directories.
    pub path: String,
}

/// Parse `scheme://volume/path`.
///
/// # Errors
///
/// [`VfsError::InvalidUri`] if the scheme separator is missing, the scheme is
/// empty, or there is no path after the authority.
///
/// ```rust
/// use anyfs_vfs::path::parse_uri;
///
/// let parsed = parse_uri("s3://bucket/a/b.txt").unwrap();
/// assert_eq!(parsed.scheme, "s3");
/// assert_eq!(parsed.volume, "bucket");
/// assert_eq!(parsed.path, "/a/b.txt");
/// ```
pub fn parse_uri(uri: &str) -> Result<ParsedUri, VfsError> {
    let bad = |reason| VfsError::InvalidUri {
        uri: uri.to_owned(),
        reason,
    };
    let (scheme, rest) = uri.split_once("://").ok_or_else(|| bad("missing scheme separator"))?;
    if scheme.is_empty() {
        return Err(bad("scheme must not be empty"));
    }
    let slash = rest.find(SEPARATOR).ok_or_else(|| bad("missing path"))?;
    Ok(ParsedUri {
        scheme: scheme.to_owned(),
        volume: rest[..slash].to_owned(),
        path: rest[slash..].to_owned(),
    })
}

fn validate_absolute(path: &str) -> Result<(), VfsError> {
    if path.is_empty() {
        return Err(invalid(path, "path must not be empty"));
    }
    if !path.starts_with(SEPARATOR) {
        return Err(invalid(path, "path must be absolute"));
    }
    Ok(())
}

fn invalid(path: &str, reason: &'static str) -> VfsError {
    VfsError::InvalidPath {
        path: path.to_owned(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_separators() {
        assert_eq!(normalize("//a///b//"), "/a/b/");
        assert_eq!(normalize("/a/b.txt"), "/a/b.txt");
        assert_eq!(normalize("/"), "/");
    }

    #[test]
    fn normalize_resolves_dots() {
        assert_eq!(normalize("/a/./b/../c.txt"), "/a/c.txt");
        assert_eq!(normalize("/a/b/.."), "/a/");
        assert_eq!(normalize("/../../x"), "/x");
        assert_eq!(normalize("a/../../b"), "../b");
    }

    #[test]
    fn join_adds_missing_separator() {
        assert_eq!(join("/a", "b.txt"), "/a/b.txt");
        assert_eq!(join("/a/", "b/c/"), "/a/b/c/");
        assert_eq!(join("/a/b/", "../c.txt"), "/a/c.txt");
    }

    #[test]
    fn file_path_validation() {
        assert_eq!(validate_file_path("/a//b.txt").unwrap(), "/a/b.txt");
        assert!(validate_file_path("").unwrap_err().is_invalid_argument());
        assert!(validate_file_path("a/b.txt").unwrap_err().is_invalid_argument());
        assert!(validate_file_path("/a/").unwrap_err().is_invalid_argument());
        assert!(validate_file_path("/a/..").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn location_path_validation() {
        assert_eq!(validate_location_path("/a//b/").unwrap(), "/a/b/");
        assert_eq!(validate_location_path("/").unwrap(), "/");
        assert!(validate_location_path("/a/b").is_err());
        assert!(validate_location_path("a/").is_err());
        assert!(validate_location_path("").is_err());
    }

    #[test]
    fn relative_validation() {
        assert!(validate_relative("b.txt").is_ok());
        assert!(validate_relative("").is_err());
        assert!(validate_relative("/b.txt").is_err());
    }

    #[test]
    fn split_keeps_trailing_slash_on_dir() {
        assert_eq!(split_file_path("/a/b/c.txt"), ("/a/b/", "c.txt"));
        assert_eq!(split_file_path("/c.txt"), ("/", "c.txt"));
    }

    #[test]
    fn uri_rendering() {
        assert_eq!(uri("s3", "bucket", "/a/b.txt"), "s3://bucket/a/b.txt");
        assert_eq!(uri("file", "", "/tmp/x"), "file:///tmp/x");
        assert_eq!(uri("gs", "b", "k.txt"), "gs://b/k.txt");
    }

    #[test]
    fn parse_uri_splits_parts() {
        let parsed = parse_uri("file:///tmp/dir/").unwrap();
        assert_eq!(parsed.scheme, "file");
        assert_eq!(parsed.volume, "");
        assert_eq!(parsed.path, "/tmp/dir/");
    }

    #[test]
    fn parse_uri_rejects_malformed() {
        assert!(parse_uri("no-scheme/a").is_err());
        assert!(parse_uri("://bucket/a").is_err());
        assert!(parse_uri("s3://bucket").is_err());
    }
}
