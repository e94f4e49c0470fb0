//! Directory-like scopes within a file system.

use std::fmt;

use crate::{File, FileSystem, VfsError};

/// A directory-like prefix (volume + path) within one [`FileSystem`].
///
/// The path is absolute, normalized and always ends in a separator.
/// `volume + path` uniquely addresses a scope within its file system.
///
/// Object stores have no real directories; a location is only a key prefix
/// there and exists as long as anyone names it.
pub trait Location: Send + Sync + fmt::Debug {
    /// Volume (bucket name for object stores, empty for local disk).
    fn volume(&self) -> &str;

    /// Normalized absolute path, always ending in `/`.
    fn path(&self) -> &str;

    /// The file system that owns this location.
    fn file_system(&self) -> &dyn FileSystem;

    /// Create a file handle for `relative` under this location.
    ///
    /// # Errors
    ///
    /// - [`VfsError::InvalidPath`] if `relative` is empty, absolute, or a directory
    fn new_file(&self, relative: &str) -> Result<Box<dyn File>, VfsError>;

    /// Create a child (or sibling, via `..`) location.
    ///
    /// # Errors
    ///
    /// - [`VfsError::InvalidPath`] if `relative` is empty, absolute, or lacks a trailing separator
    fn new_location(&self, relative: &str) -> Result<Box<dyn Location>, VfsError>;

    /// Clone this location into a new box.
    fn boxed_clone(&self) -> Box<dyn Location>;

    /// Canonical URI, e.g. `s3://bucket/some/path/`.
    fn uri(&self) -> String {
        crate::path::uri(self.file_system().scheme(), self.volume(), self.path())
    }

    /// Check whether the file `relative` exists under this location.
    ///
    /// # Errors
    ///
    /// Construction errors for `relative`, or any non-"not found" backend failure.
    fn exists_file(&self, relative: &str) -> Result<bool, VfsError> {
        self.new_file(relative)?.exists()
    }

    /// Delete the file `relative` under this location.
    ///
    /// # Errors
    ///
    /// Construction errors for `relative`, [`VfsError::NotFound`] if the file
    /// is missing, or any backend failure.
    fn delete_file(&self, relative: &str) -> Result<(), VfsError> {
        self.new_file(relative)?.delete()
    }
}
