//! # Extension Traits
//!
//! Convenience methods for any [`File`].
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`read_contents`](FileExt::read_contents) | Read the whole content from the start |
//! | [`touch`](FileExt::touch) | Create an empty object if missing, then close |

use std::io::SeekFrom;

use crate::{File, VfsError};

/// Extension methods blanket-implemented for every [`File`].
///
/// # Example
///
/// ```rust
/// use anyfs_vfs::{File, FileExt, FileSystem, MemoryClient, ObjectFileSystem};
/// use std::sync::Arc;
///
/// let fs = ObjectFileSystem::memory(Arc::new(MemoryClient::new()));
/// let mut file = fs.new_file("bucket", "/empty.txt").unwrap();
/// file.touch().unwrap();
/// assert!(file.exists().unwrap());
/// assert!(file.read_contents().unwrap().is_empty());
/// ```
pub trait FileExt: File {
    /// Seek to the start and read everything.
    ///
    /// # Errors
    ///
    /// Any seek or read failure.
    fn read_contents(&mut self) -> Result<Vec<u8>, VfsError> {
        let uri = self.uri();
        let mut data = Vec::new();
        self.seek(SeekFrom::Start(0))
            .and_then(|_| self.read_to_end(&mut data))
            .map_err(|e| VfsError::from_io("read", uri.as_str(), e))?;
        Ok(data)
    }

    /// Materialize the object if it does not exist, then close the handle.
    ///
    /// Existing content is left untouched.
    ///
    /// # Errors
    ///
    /// Probe, write or close failure.
    fn touch(&mut self) -> Result<(), VfsError> {
        if !self.exists()? {
            let uri = self.uri();
            self.write(&[])
                .map_err(|e| VfsError::from_io("touch", uri.as_str(), e))?;
        }
        self.close()
    }
}

// Blanket implementation - every File gets FileExt for free
impl<F: File + ?Sized> FileExt for F {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileSystem, MemoryClient, ObjectFileSystem};
    use std::sync::Arc;

    #[test]
    fn read_contents_rewinds() {
        let fs = ObjectFileSystem::memory(Arc::new(MemoryClient::new()));
        let mut file = fs.new_file("bucket", "/a.txt").unwrap();
        file.write_all(b"abc").unwrap();
        assert_eq!(file.read_contents().unwrap(), b"abc");
        assert_eq!(file.read_contents().unwrap(), b"abc");
        file.close().unwrap();
    }

    #[test]
    fn touch_keeps_existing_content() {
        let fs = ObjectFileSystem::memory(Arc::new(MemoryClient::new()));
        let mut file = fs.new_file("bucket", "/a.txt").unwrap();
        file.write_all(b"keep").unwrap();
        file.close().unwrap();

        file.touch().unwrap();
        assert_eq!(file.size().unwrap(), 4);
    }
}
