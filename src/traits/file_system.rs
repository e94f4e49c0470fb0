//! The storage-medium factory.

use std::fmt;

use crate::{File, Location, VfsError};

/// One storage medium: local disk or an object-store family.
///
/// A `FileSystem` is the sole factory for the [`Location`]s and [`File`]s of
/// its backend. It performs no I/O when constructing them; argument
/// validation errors never reach the backend.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. They hold no per-call state beyond
/// their client handle, so one instance can serve any number of threads.
///
/// # Object Safety
///
/// This trait is object-safe and is normally used as `dyn FileSystem`.
pub trait FileSystem: Send + Sync + fmt::Debug {
    /// Scheme tag (`"file"`, `"s3"`, `"gs"`, `"mem"`).
    ///
    /// Copy and move compare scheme tags to decide on the native fast path.
    fn scheme(&self) -> &str;

    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Create a handle for the file at `path` on `volume`.
    ///
    /// # Errors
    ///
    /// - [`VfsError::InvalidPath`] if `path` is empty, relative, or ends in a separator
    /// - [`VfsError::InvalidVolume`] if the backend requires a volume and it is empty
    fn new_file(&self, volume: &str, path: &str) -> Result<Box<dyn File>, VfsError>;

    /// Create a location for the directory-style `path` on `volume`.
    ///
    /// # Errors
    ///
    /// - [`VfsError::InvalidPath`] if `path` is empty, relative, or lacks a trailing separator
    /// - [`VfsError::InvalidVolume`] if the backend requires a volume and it is empty
    fn new_location(&self, volume: &str, path: &str) -> Result<Box<dyn Location>, VfsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_system_is_object_safe() {
        fn _check(_: &dyn FileSystem) {}
    }

    #[test]
    fn file_system_requires_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        fn _check<T: FileSystem>() {
            _assert_send_sync::<T>();
        }
    }
}
