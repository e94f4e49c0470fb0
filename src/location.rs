//! Shared [`Location`] implementation.
//!
//! Every backend's location is the same triple (file system, volume, path);
//! only the owning file system differs. Validation of derived paths is
//! delegated back to that file system.

use std::fmt;

use crate::path;
use crate::{File, FileSystem, Location, VfsError};

/// A location owned by the file system `F`.
///
/// `F` is a cheap-to-clone handle (the backends keep their state behind an
/// `Arc`), so every location carries its own reference to the file system.
#[derive(Debug, Clone)]
pub struct VolumeLocation<F> {
    fs: F,
    volume: String,
    path: String,
}

impl<F> VolumeLocation<F> {
    /// Build a location from an already validated, normalized directory path.
    pub(crate) fn new(fs: F, volume: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            fs,
            volume: volume.into(),
            path: path.into(),
        }
    }

    /// The concrete owning file system.
    pub fn backend(&self) -> &F {
        &self.fs
    }
}

impl<F: FileSystem + Clone + 'static> Location for VolumeLocation<F> {
    fn volume(&self) -> &str {
        &self.volume
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn file_system(&self) -> &dyn FileSystem {
        &self.fs
    }

    fn new_file(&self, relative: &str) -> Result<Box<dyn File>, VfsError> {
        path::validate_relative(relative)?;
        self.fs.new_file(&self.volume, &path::join(&self.path, relative))
    }

    fn new_location(&self, relative: &str) -> Result<Box<dyn Location>, VfsError> {
        path::validate_relative(relative)?;
        self.fs.new_location(&self.volume, &path::join(&self.path, relative))
    }

    fn boxed_clone(&self) -> Box<dyn Location> {
        Box::new(self.clone())
    }
}

impl<F: FileSystem + Clone + 'static> fmt::Display for VolumeLocation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}
