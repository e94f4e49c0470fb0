//! The addressable-object contract.

use std::fmt;
use std::io::{Read, Seek, Write};
use std::time::SystemTime;

use crate::{Location, VfsError};

/// One addressable object: a seekable, incrementally writable stream.
///
/// `Read`, `Write` and `Seek` open the underlying resource lazily on first
/// use. For object-store backends that resource is a local staging buffer:
/// the remote object is downloaded at most once, every I/O call works on the
/// buffer, and [`close`](File::close) uploads it if anything was written.
///
/// # Lifecycle
///
/// ```text
/// Unopened ──read/write/seek──▶ Open ──close──▶ Closed (≡ Unopened)
///                                 │
///                                 └──delete──▶ buffer dropped, object removed
/// ```
///
/// [`close`](File::close) is idempotent and succeeds on a handle that never
/// opened anything.
///
/// # Thread Safety
///
/// A single handle is not safe for concurrent use: I/O calls share one
/// offset. Handles are `Send` so they can move between threads; serialize
/// access externally if needed.
///
/// # Copy and Move
///
/// When source and target share a scheme and the backend offers a
/// server-side copy, that primitive is used. Otherwise bytes are streamed
/// through `Read`/`Write` (see [`stream_copy`](crate::stream_copy)). A move is
/// a copy followed by deleting the source; the delete is never attempted if
/// the copy failed.
pub trait File: Read + Write + Seek + Send + fmt::Debug {
    /// Base name, no directory component.
    fn name(&self) -> &str;

    /// Absolute path: `location().path() + name()`.
    fn path(&self) -> String {
        format!("{}{}", self.location().path(), self.name())
    }

    /// The location containing this file.
    fn location(&self) -> &dyn Location;

    /// Canonical `scheme://volume/path` URI.
    fn uri(&self) -> String {
        crate::path::uri(
            self.location().file_system().scheme(),
            self.location().volume(),
            &self.path(),
        )
    }

    /// Check whether the object exists.
    ///
    /// Returns `Ok(false)` if it does not; only other failures are errors.
    fn exists(&self) -> Result<bool, VfsError>;

    /// Size in bytes of the stored object.
    ///
    /// # Errors
    ///
    /// - [`VfsError::NotFound`] if the object does not exist
    /// - [`VfsError::Backend`] / [`VfsError::Io`] on probe failure
    fn size(&self) -> Result<u64, VfsError>;

    /// Modification time of the stored object.
    ///
    /// # Errors
    ///
    /// - [`VfsError::NotFound`] if the object does not exist
    /// - [`VfsError::Backend`] / [`VfsError::Io`] on probe failure
    fn last_modified(&self) -> Result<SystemTime, VfsError>;

    /// Resize the open content to `size` bytes, opening it first if needed.
    ///
    /// # Errors
    ///
    /// Any failure opening or resizing the underlying resource.
    fn truncate(&mut self, size: u64) -> Result<(), VfsError>;

    /// Release the handle, persisting pending writes.
    ///
    /// Local resources are released even when persisting fails.
    ///
    /// # Errors
    ///
    /// Upload or native close failure.
    fn close(&mut self) -> Result<(), VfsError>;

    /// Drop the open buffer or handle without persisting pending writes.
    ///
    /// The stored object keeps whatever content it had before this handle
    /// was opened. Afterwards the handle is unopened again.
    fn discard(&mut self);

    /// Remove the object and drop any open buffer or handle.
    ///
    /// # Errors
    ///
    /// - [`VfsError::NotFound`] if the object does not exist
    /// - [`VfsError::Backend`] / [`VfsError::Io`] on delete failure
    fn delete(&mut self) -> Result<(), VfsError>;

    /// Copy this file's content onto `target`, overwriting it.
    ///
    /// # Errors
    ///
    /// [`VfsError::NotFound`] if this file does not exist, or any read,
    /// write or backend failure.
    fn copy_to_file(&mut self, target: &mut dyn File) -> Result<(), VfsError>;

    /// Copy this file into `location` under the same name.
    ///
    /// # Errors
    ///
    /// Construction errors for the destination, or any copy failure.
    fn copy_to_location(&mut self, location: &dyn Location) -> Result<Box<dyn File>, VfsError>;

    /// Copy onto `target`, then delete this file.
    ///
    /// # Errors
    ///
    /// - the copy error, unchanged, if the copy failed (nothing is deleted)
    /// - [`VfsError::PartialMove`] if the copy succeeded but the delete failed
    fn move_to_file(&mut self, target: &mut dyn File) -> Result<(), VfsError>;

    /// Copy into `location`, then delete this file.
    ///
    /// Returns a handle for the destination. When `location` belongs to the
    /// same scheme this handle is also re-pointed at the destination.
    ///
    /// # Errors
    ///
    /// Same as [`move_to_file`](File::move_to_file).
    fn move_to_location(&mut self, location: &dyn Location) -> Result<Box<dyn File>, VfsError>;
}
