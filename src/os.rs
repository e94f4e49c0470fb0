//! # Local-disk backend
//!
//! The local filesystem already supports random access, so an [`OsFile`]
//! needs no staging buffer: `read`/`write`/`seek` go straight to a native
//! handle opened lazily on first use (parent directories are created as
//! needed). Volumes have no meaning here and are ignored.

use std::fmt;
use std::fs;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::time::SystemTime;

use crate::copy;
use crate::location::VolumeLocation;
use crate::path;
use crate::{File, FileSystem, Location, VfsError};

/// Scheme of the local-disk backend.
pub const FILE_SCHEME: &str = "file";

/// File system over the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    /// Create the local-disk file system.
    pub fn new() -> Self {
        Self
    }

    /// Like [`FileSystem::new_file`], returning the concrete type.
    ///
    /// # Errors
    ///
    /// [`VfsError::InvalidPath`] if `path` is not an absolute file path.
    pub fn open_file(&self, _volume: &str, path: &str) -> Result<OsFile, VfsError> {
        let path = path::validate_file_path(path)?;
        let (dir, name) = path::split_file_path(&path);
        Ok(OsFile {
            location: VolumeLocation::new(*self, "", dir),
            name: name.to_owned(),
            file: None,
        })
    }

    /// Like [`FileSystem::new_location`], returning the concrete type.
    ///
    /// # Errors
    ///
    /// [`VfsError::InvalidPath`] if `path` is not an absolute directory path.
    pub fn open_location(
        &self,
        _volume: &str,
        path: &str,
    ) -> Result<VolumeLocation<OsFileSystem>, VfsError> {
        let path = path::validate_location_path(path)?;
        Ok(VolumeLocation::new(*self, "", path))
    }
}

impl FileSystem for OsFileSystem {
    fn scheme(&self) -> &str {
        FILE_SCHEME
    }

    fn name(&self) -> &str {
        "Local"
    }

    fn new_file(&self, volume: &str, path: &str) -> Result<Box<dyn File>, VfsError> {
        Ok(Box::new(self.open_file(volume, path)?))
    }

    fn new_location(&self, volume: &str, path: &str) -> Result<Box<dyn Location>, VfsError> {
        Ok(Box::new(self.open_location(volume, path)?))
    }
}

/// A file on the local disk.
#[derive(Debug)]
pub struct OsFile {
    location: VolumeLocation<OsFileSystem>,
    name: String,
    file: Option<fs::File>,
}

impl OsFile {
    /// Native path of this file.
    pub fn local_path(&self) -> PathBuf {
        PathBuf::from(self.path())
    }

    /// Returns `true` if the native handle is open.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    fn handle(&mut self) -> io::Result<&mut fs::File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                fs::create_dir_all(self.location.path())?;
                fs::OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .open(self.local_path())?
            }
        };
        Ok(self.file.insert(file))
    }

    fn stat(&self) -> Result<Option<fs::Metadata>, VfsError> {
        match fs::metadata(self.local_path()) {
            Ok(meta) => Ok(Some(meta)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VfsError::io("stat", self.local_path(), e)),
        }
    }

    fn existing_stat(&self) -> Result<fs::Metadata, VfsError> {
        self.stat()?
            .ok_or_else(|| VfsError::NotFound { uri: self.uri() })
    }
}

impl File for OsFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> &dyn Location {
        &self.location
    }

    fn exists(&self) -> Result<bool, VfsError> {
        Ok(self.stat()?.is_some())
    }

    fn size(&self) -> Result<u64, VfsError> {
        Ok(self.existing_stat()?.len())
    }

    fn last_modified(&self) -> Result<SystemTime, VfsError> {
        self.existing_stat()?
            .modified()
            .map_err(|e| VfsError::io("modified", self.local_path(), e))
    }

    fn truncate(&mut self, size: u64) -> Result<(), VfsError> {
        let path = self.local_path();
        self.handle()
            .and_then(|file| file.set_len(size))
            .map_err(|e| VfsError::io("truncate", path, e))
    }

    fn close(&mut self) -> Result<(), VfsError> {
        match self.file.take() {
            Some(file) => file
                .sync_all()
                .map_err(|e| VfsError::io("close", self.local_path(), e)),
            None => Ok(()),
        }
    }

    fn discard(&mut self) {
        self.file = None;
    }

    fn delete(&mut self) -> Result<(), VfsError> {
        match fs::remove_file(self.local_path()) {
            Ok(()) => {
                self.file = None;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(VfsError::NotFound { uri: self.uri() })
            }
            Err(e) => Err(VfsError::io("delete", self.local_path(), e)),
        }
    }

    fn copy_to_file(&mut self, target: &mut dyn File) -> Result<(), VfsError> {
        copy::stream_copy(self, target).map(|_| ())
    }

    fn copy_to_location(&mut self, location: &dyn Location) -> Result<Box<dyn File>, VfsError> {
        copy::copy_to_location(self, location)
    }

    fn move_to_file(&mut self, target: &mut dyn File) -> Result<(), VfsError> {
        copy::move_to_file(self, target)
    }

    fn move_to_location(&mut self, location: &dyn Location) -> Result<Box<dyn File>, VfsError> {
        let target = copy::move_to_location(self, location)?;
        if location.file_system().scheme() == FILE_SCHEME {
            self.location = OsFileSystem.open_location("", location.path())?;
        }
        Ok(target)
    }
}

impl Read for OsFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.file.is_none() && !self.exists()? {
            return Err(VfsError::NotFound { uri: self.uri() }.into());
        }
        self.handle()?.read(buf)
    }
}

impl Write for OsFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.handle()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.file {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Seek for OsFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.handle()?.seek(pos)
    }
}

impl fmt::Display for OsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_in(dir: &tempfile::TempDir, relative: &str) -> OsFile {
        let path = format!("{}/{relative}", dir.path().display());
        OsFileSystem.open_file("", &path).unwrap()
    }

    #[test]
    fn volume_is_ignored() {
        let file = OsFileSystem.open_file("somehost", "/tmp/a.txt").unwrap();
        assert_eq!(file.location().volume(), "");
        assert_eq!(file.uri(), "file:///tmp/a.txt");
        assert_eq!(file.to_string(), "file:///tmp/a.txt");
    }

    #[test]
    fn path_validation() {
        assert!(OsFileSystem.open_file("", "relative.txt").is_err());
        assert!(OsFileSystem.open_file("", "/tmp/dir/").is_err());
        assert!(OsFileSystem.open_location("", "/tmp/dir").is_err());
        assert_eq!(OsFileSystem.open_location("", "/tmp//dir/").unwrap().path(), "/tmp/dir/");
    }

    #[test]
    fn write_close_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = file_in(&dir, "nested/deeper/a.txt");
        file.write_all(b"hello world!").unwrap();
        file.close().unwrap();
        assert!(!file.is_open());

        let mut again = file_in(&dir, "nested/deeper/a.txt");
        let mut text = String::new();
        again.read_to_string(&mut text).unwrap();
        assert_eq!(text, "hello world!");
        again.close().unwrap();
    }

    #[test]
    fn read_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = file_in(&dir, "missing.txt");
        let mut buf = [0u8; 4];
        let err = file.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!file.exists().unwrap());
    }

    #[test]
    fn seek_within_open_handle() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = file_in(&dir, "a.txt");
        file.write_all(b"hello world!").unwrap();
        file.seek(SeekFrom::Start(6)).unwrap();
        let mut tail = String::new();
        file.read_to_string(&mut tail).unwrap();
        assert_eq!(tail, "world!");
        file.close().unwrap();
    }

    #[test]
    fn close_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = file_in(&dir, "a.txt");
        file.close().unwrap();
        file.write_all(b"x").unwrap();
        file.close().unwrap();
        file.close().unwrap();
    }

    #[test]
    fn discard_releases_handle() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = file_in(&dir, "a.txt");
        file.write_all(b"x").unwrap();
        file.discard();
        assert!(!file.is_open());
        file.close().unwrap();
    }

    #[test]
    fn metadata_probes() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = file_in(&dir, "a.txt");
        assert!(file.size().unwrap_err().is_not_found());
        assert!(file.last_modified().unwrap_err().is_not_found());

        file.write_all(b"12345").unwrap();
        file.close().unwrap();
        assert!(file.exists().unwrap());
        assert_eq!(file.size().unwrap(), 5);
        assert!(file.last_modified().unwrap() > SystemTime::UNIX_EPOCH);
    }

    #[test]
    fn delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = file_in(&dir, "a.txt");
        file.write_all(b"x").unwrap();
        file.delete().unwrap();
        assert!(!file.is_open());
        assert!(!file.exists().unwrap());
        assert!(file.delete().unwrap_err().is_not_found());
    }

    #[test]
    fn truncate_shrinks_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = file_in(&dir, "a.txt");
        file.write_all(b"abcdef").unwrap();
        file.truncate(3).unwrap();
        file.close().unwrap();
        assert_eq!(fs::read(file.local_path()).unwrap(), b"abc");
    }
}
