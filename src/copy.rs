//! # Copy and move protocol
//!
//! Backends decide between their native fast path and the generic streaming
//! copy; everything after that decision is shared and lives here.
//!
//! ```text
//! copy_to_location ──▶ location.new_file(name) ──▶ source.copy_to_file(target)
//!                                                      │
//!                             same scheme + native copy? ──yes──▶ server-side copy
//!                                                      │no
//!                                                      ▼
//!                                                 stream_copy
//!
//! move_* ──▶ copy_* ──ok──▶ source.delete() ──err──▶ PartialMove
//!               │err
//!               └──▶ returned unchanged, nothing deleted
//! ```

use std::io::{self, Read, SeekFrom, Write};

use tracing::{debug, warn};

use crate::{File, Location, VfsError};

/// Copy everything from `reader` into `writer`, calling `write` at least once.
///
/// A plain `io::copy` of an empty reader never touches the writer, which for
/// buffered backends means the destination object is never created. This
/// issues one empty write in that case.
///
/// ```rust
/// let mut out = Vec::new();
/// let copied = anyfs_vfs::touch_copy(&mut out, &mut &b"abc"[..]).unwrap();
/// assert_eq!(copied, 3);
/// assert_eq!(out, b"abc");
/// ```
///
/// # Errors
///
/// Any read or write failure.
pub fn touch_copy<W, R>(writer: &mut W, reader: &mut R) -> io::Result<u64>
where
    W: Write + ?Sized,
    R: Read + ?Sized,
{
    let copied = io::copy(reader, writer)?;
    if copied == 0 {
        writer.write(&[])?;
    }
    Ok(copied)
}

/// Generic streaming copy of `source` onto `target`, for any pair of backends.
///
/// Pending writes on `source` are persisted first. The full content is then
/// streamed from the start of `source` over the start of `target`, `target`
/// is truncated to the copied length, and both handles are closed.
///
/// If anything fails once `target` has been opened, its pending content is
/// discarded, so a later `close` on it cannot persist a partial copy.
///
/// Returns the number of bytes copied.
///
/// # Errors
///
/// - [`VfsError::NotFound`] if `source` does not exist
/// - any read, write, truncate or close failure on either side
pub fn stream_copy(source: &mut dyn File, target: &mut dyn File) -> Result<u64, VfsError> {
    source.close()?;

    let source_uri = source.uri();
    if !source.exists()? {
        return Err(VfsError::NotFound { uri: source_uri });
    }
    let target_uri = target.uri();

    source
        .seek(SeekFrom::Start(0))
        .map_err(|e| VfsError::from_io("seek", source_uri.as_str(), e))?;
    let copied = match overwrite(target, source) {
        Ok(copied) => copied,
        Err(err) => {
            target.discard();
            warn!(source = %source_uri, target = %target_uri, error = %err, "copy failed, discarding target writes");
            return Err(err);
        }
    };
    source.close()?;

    debug!(source = %source_uri, target = %target_uri, bytes = copied, "streamed copy");
    Ok(copied)
}

/// Replace the content of `target` with the rest of `source`, then persist it.
fn overwrite(target: &mut dyn File, source: &mut dyn File) -> Result<u64, VfsError> {
    let target_uri = target.uri();
    target
        .seek(SeekFrom::Start(0))
        .map_err(|e| VfsError::from_io("seek", target_uri.as_str(), e))?;
    let copied = touch_copy(&mut *target, &mut *source)
        .map_err(|e| VfsError::from_io("copy", target_uri.as_str(), e))?;
    target.truncate(copied)?;
    target.close()?;
    Ok(copied)
}

/// Copy `source` into `location` under the same base name.
pub(crate) fn copy_to_location(
    source: &mut dyn File,
    location: &dyn Location,
) -> Result<Box<dyn File>, VfsError> {
    let name = source.name().to_owned();
    let mut target = location.new_file(&name)?;
    // On failure the new handle is dropped unclosed, so nothing is persisted through it.
    source.copy_to_file(target.as_mut())?;
    Ok(target)
}

/// Copy `source` onto `target`, then delete `source`.
pub(crate) fn move_to_file(source: &mut dyn File, target: &mut dyn File) -> Result<(), VfsError> {
    source.copy_to_file(target)?;
    delete_moved_source(source, target.uri())
}

/// Copy `source` into `location`, then delete `source`.
pub(crate) fn move_to_location(
    source: &mut dyn File,
    location: &dyn Location,
) -> Result<Box<dyn File>, VfsError> {
    let target = copy_to_location(source, location)?;
    delete_moved_source(source, target.uri())?;
    Ok(target)
}

fn delete_moved_source(source: &mut dyn File, target_uri: String) -> Result<(), VfsError> {
    let source_uri = source.uri();
    if source_uri == target_uri {
        // Deleting would remove the copy just written.
        return Ok(());
    }
    match source.delete() {
        Ok(()) => {
            debug!(source = %source_uri, target = %target_uri, "moved");
            Ok(())
        }
        Err(err) => {
            warn!(source = %source_uri, target = %target_uri, error = %err, "move copied but could not delete source");
            Err(VfsError::PartialMove {
                source_uri,
                target_uri,
                source: Box::new(err),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileSystem, MemoryClient, ObjectClient, ObjectFileSystem, ObjectKey};
    use std::io::Seek;
    use std::sync::Arc;
    use std::time::SystemTime;

    /// Yields one chunk, then fails every later read.
    #[derive(Debug)]
    struct BrokenSource {
        location: Box<dyn Location>,
        reads: usize,
    }

    impl Read for BrokenSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            if self.reads > 1 {
                return Err(io::Error::other("connection reset"));
            }
            let chunk = b"PARTIAL";
            let len = chunk.len().min(buf.len());
            buf[..len].copy_from_slice(&chunk[..len]);
            Ok(len)
        }
    }

    impl Write for BrokenSource {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Seek for BrokenSource {
        fn seek(&mut self, _: SeekFrom) -> io::Result<u64> {
            Ok(0)
        }
    }

    impl File for BrokenSource {
        fn name(&self) -> &str {
            "src.txt"
        }
        fn location(&self) -> &dyn Location {
            self.location.as_ref()
        }
        fn exists(&self) -> Result<bool, VfsError> {
            Ok(true)
        }
        fn size(&self) -> Result<u64, VfsError> {
            Ok(7)
        }
        fn last_modified(&self) -> Result<SystemTime, VfsError> {
            Ok(SystemTime::UNIX_EPOCH)
        }
        fn truncate(&mut self, _: u64) -> Result<(), VfsError> {
            Ok(())
        }
        fn close(&mut self) -> Result<(), VfsError> {
            Ok(())
        }
        fn discard(&mut self) {}
        fn delete(&mut self) -> Result<(), VfsError> {
            Ok(())
        }
        fn copy_to_file(&mut self, target: &mut dyn File) -> Result<(), VfsError> {
            stream_copy(self, target).map(|_| ())
        }
        fn copy_to_location(&mut self, location: &dyn Location) -> Result<Box<dyn File>, VfsError> {
            copy_to_location(self, location)
        }
        fn move_to_file(&mut self, target: &mut dyn File) -> Result<(), VfsError> {
            move_to_file(self, target)
        }
        fn move_to_location(&mut self, location: &dyn Location) -> Result<Box<dyn File>, VfsError> {
            move_to_location(self, location)
        }
    }

    fn broken_source(fs: &ObjectFileSystem) -> BrokenSource {
        BrokenSource {
            location: fs.new_location("bucket", "/").unwrap(),
            reads: 0,
        }
    }

    #[test]
    fn failed_stream_copy_keeps_target_content() {
        let client = Arc::new(MemoryClient::new());
        let fs = ObjectFileSystem::memory(Arc::clone(&client));
        let dst = ObjectKey::from_path("bucket", "/dst.txt");
        client.put(&dst, &mut &b"ORIGINAL CONTENT"[..]).unwrap();

        let mut source = broken_source(&fs);
        let mut target = fs.open_file("bucket", "/dst.txt").unwrap();
        assert!(source.copy_to_file(&mut target).is_err());
        assert!(!target.is_open());

        target.close().unwrap();
        assert_eq!(client.contents(&dst).unwrap(), b"ORIGINAL CONTENT");
    }

    #[test]
    fn failed_stream_copy_does_not_create_target() {
        let client = Arc::new(MemoryClient::new());
        let fs = ObjectFileSystem::memory(Arc::clone(&client));

        let mut source = broken_source(&fs);
        let mut target = fs.open_file("bucket", "/new.txt").unwrap();
        assert!(source.move_to_file(&mut target).is_err());

        target.close().unwrap();
        assert!(!target.exists().unwrap());
        assert!(client.is_empty());
    }

    #[derive(Default)]
    struct CountingWriter {
        calls: usize,
        data: Vec<u8>,
    }

    impl Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn touch_copy_writes_once_for_empty_reader() {
        let mut writer = CountingWriter::default();
        let copied = touch_copy(&mut writer, &mut io::empty()).unwrap();
        assert_eq!(copied, 0);
        assert_eq!(writer.calls, 1);
        assert!(writer.data.is_empty());
    }

    #[test]
    fn touch_copy_copies_content() {
        let mut writer = CountingWriter::default();
        let copied = touch_copy(&mut writer, &mut &b"hello world!"[..]).unwrap();
        assert_eq!(copied, 12);
        assert_eq!(writer.data, b"hello world!");
    }

    #[test]
    fn touch_copy_propagates_read_error() {
        struct FailingReader;
        impl Read for FailingReader {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("boom"))
            }
        }

        let mut writer = CountingWriter::default();
        assert!(touch_copy(&mut writer, &mut FailingReader).is_err());
        assert_eq!(writer.calls, 0);
    }
}
