//! # Object-store backend
//!
//! [`ObjectFileSystem`] adapts any [`ObjectClient`] (whole-object get/put)
//! to the seekable, writable [`File`] contract.
//!
//! ## Staging buffer
//!
//! Each [`ObjectFile`] owns at most one local temporary file:
//!
//! | State | Entered by | Behaviour |
//! |-------|-----------|-----------|
//! | Unopened | construction, `close`, `delete` | no buffer |
//! | Open | first `read`/`write`/`seek`/`truncate` | object downloaded once (empty if missing); all I/O hits the buffer |
//! | Closed | `close` | buffer uploaded if dirty, then released |
//!
//! The object is transferred at most twice per open/close cycle (one
//! download, one upload) no matter how many I/O calls happen in between.
//! Concurrent handles on the same object are not coordinated: the last one
//! to close wins.
//!
//! ## Schemes
//!
//! The same adapter serves every object-store family; only the scheme tag
//! and client differ: [`S3_SCHEME`], [`GS_SCHEME`] and [`MEMORY_SCHEME`].

use std::fmt;
use std::fs;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::copy;
use crate::location::VolumeLocation;
use crate::path;
use crate::{
    ClientError, File, FileSystem, Location, MemoryClient, ObjectClient, ObjectKey, ObjectMeta,
    VfsError,
};

/// Scheme of S3-style object stores.
pub const S3_SCHEME: &str = "s3";
/// Scheme of Google-Cloud-Storage-style object stores.
pub const GS_SCHEME: &str = "gs";
/// Scheme of the in-process [`MemoryClient`] store.
pub const MEMORY_SCHEME: &str = "mem";

/// Tunables for object-store file systems.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ObjectOptions {
    /// Directory for staging buffers. `None` uses the system temp directory.
    pub staging_dir: Option<PathBuf>,
}

#[cfg(feature = "serde")]
impl ObjectOptions {
    /// Parse options from JSON, e.g. `{"staging_dir": "/var/tmp/vfs"}`.
    ///
    /// # Errors
    ///
    /// [`VfsError::Deserialization`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, VfsError> {
        serde_json::from_str(json).map_err(|e| VfsError::Deserialization(e.to_string()))
    }
}

#[derive(Debug)]
struct Inner {
    scheme: String,
    name: String,
    client: Arc<dyn ObjectClient>,
    options: ObjectOptions,
}

/// File system over an object store.
///
/// Cheap to clone; clones share the client.
///
/// ```rust
/// use anyfs_vfs::{File, FileSystem, MemoryClient, ObjectFileSystem};
/// use std::io::{Read, Write};
/// use std::sync::Arc;
///
/// let fs = ObjectFileSystem::memory(Arc::new(MemoryClient::new()));
/// let mut file = fs.new_file("bucket", "/greeting.txt").unwrap();
/// file.write_all(b"hello").unwrap();
/// file.close().unwrap();
///
/// let mut again = fs.new_file("bucket", "/greeting.txt").unwrap();
/// let mut text = String::new();
/// again.read_to_string(&mut text).unwrap();
/// assert_eq!(text, "hello");
/// ```
#[derive(Debug, Clone)]
pub struct ObjectFileSystem {
    inner: Arc<Inner>,
}

impl ObjectFileSystem {
    /// Create a file system for `scheme` backed by `client`.
    pub fn new(
        scheme: impl Into<String>,
        name: impl Into<String>,
        client: Arc<dyn ObjectClient>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                scheme: scheme.into(),
                name: name.into(),
                client,
                options: ObjectOptions::default(),
            }),
        }
    }

    /// S3-style store.
    pub fn s3(client: Arc<dyn ObjectClient>) -> Self {
        Self::new(S3_SCHEME, "AWS S3", client)
    }

    /// Google-Cloud-Storage-style store.
    pub fn gs(client: Arc<dyn ObjectClient>) -> Self {
        Self::new(GS_SCHEME, "Google Cloud Storage", client)
    }

    /// In-process store.
    pub fn memory(client: Arc<MemoryClient>) -> Self {
        Self::new(MEMORY_SCHEME, "In-Memory Object Store", client)
    }

    /// Replace the options.
    pub fn with_options(self, options: ObjectOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                scheme: self.inner.scheme.clone(),
                name: self.inner.name.clone(),
                client: Arc::clone(&self.inner.client),
                options,
            }),
        }
    }

    /// The shared client.
    pub fn client(&self) -> &Arc<dyn ObjectClient> {
        &self.inner.client
    }

    /// Current options.
    pub fn options(&self) -> &ObjectOptions {
        &self.inner.options
    }

    /// Like [`FileSystem::new_file`], returning the concrete type.
    ///
    /// # Errors
    ///
    /// - [`VfsError::InvalidVolume`] if `volume` is empty or contains a separator
    /// - [`VfsError::InvalidPath`] if `path` is not an absolute file path
    pub fn open_file(&self, volume: &str, path: &str) -> Result<ObjectFile, VfsError> {
        validate_volume(volume)?;
        let path = path::validate_file_path(path)?;
        let (dir, name) = path::split_file_path(&path);
        Ok(ObjectFile {
            location: VolumeLocation::new(self.clone(), volume, dir),
            name: name.to_owned(),
            staging: None,
        })
    }

    /// Like [`FileSystem::new_location`], returning the concrete type.
    ///
    /// # Errors
    ///
    /// - [`VfsError::InvalidVolume`] if `volume` is empty or contains a separator
    /// - [`VfsError::InvalidPath`] if `path` is not an absolute directory path
    pub fn open_location(
        &self,
        volume: &str,
        path: &str,
    ) -> Result<VolumeLocation<ObjectFileSystem>, VfsError> {
        validate_volume(volume)?;
        let path = path::validate_location_path(path)?;
        Ok(VolumeLocation::new(self.clone(), volume, path))
    }
}

impl FileSystem for ObjectFileSystem {
    fn scheme(&self) -> &str {
        &self.inner.scheme
    }

    fn name(&self) -> &str {
        &self.inner.name
    }

    fn new_file(&self, volume: &str, path: &str) -> Result<Box<dyn File>, VfsError> {
        Ok(Box::new(self.open_file(volume, path)?))
    }

    fn new_location(&self, volume: &str, path: &str) -> Result<Box<dyn Location>, VfsError> {
        Ok(Box::new(self.open_location(volume, path)?))
    }
}

fn validate_volume(volume: &str) -> Result<(), VfsError> {
    let reason = if volume.is_empty() {
        "bucket name is required"
    } else if volume.contains(path::SEPARATOR) {
        "bucket name must not contain a separator"
    } else {
        return Ok(());
    };
    Err(VfsError::InvalidVolume {
        volume: volume.to_owned(),
        reason,
    })
}

#[derive(Debug)]
struct Staging {
    buffer: fs::File,
    dirty: bool,
}

/// One object in an object store, with a lazily created staging buffer.
#[derive(Debug)]
pub struct ObjectFile {
    location: VolumeLocation<ObjectFileSystem>,
    name: String,
    staging: Option<Staging>,
}

impl ObjectFile {
    /// Bucket and key of this object.
    pub fn key(&self) -> ObjectKey {
        ObjectKey::from_path(self.location.volume(), &self.path())
    }

    /// Returns `true` if a staging buffer is currently open.
    pub fn is_open(&self) -> bool {
        self.staging.is_some()
    }

    /// Returns `true` if the open buffer holds writes not yet uploaded.
    pub fn is_dirty(&self) -> bool {
        self.staging.as_ref().is_some_and(|s| s.dirty)
    }

    fn backend(&self) -> &ObjectFileSystem {
        self.location.backend()
    }

    fn client(&self) -> &dyn ObjectClient {
        self.backend().client().as_ref()
    }

    fn staging(&mut self) -> Result<&mut Staging, VfsError> {
        let staging = match self.staging.take() {
            Some(staging) => staging,
            None => self.download()?,
        };
        Ok(self.staging.insert(staging))
    }

    fn download(&self) -> Result<Staging, VfsError> {
        let uri = self.uri();
        let staging_dir = self.backend().options().staging_dir.clone();
        let created = match staging_dir.as_deref() {
            Some(dir) => tempfile::tempfile_in(dir),
            None => tempfile::tempfile(),
        };
        let mut buffer = created
            .map_err(|e| VfsError::io("create staging buffer", staging_dir.unwrap_or_default(), e))?;

        match self.client().get(&self.key()) {
            Ok(mut body) => {
                let bytes = io::copy(&mut body, &mut buffer)
                    .and_then(|bytes| buffer.seek(SeekFrom::Start(0)).map(|_| bytes))
                    .map_err(|e| VfsError::from_io("download", uri.as_str(), e))?;
                debug!(uri = %uri, bytes, "downloaded object into staging buffer");
            }
            Err(ClientError::NotFound) => {
                debug!(uri = %uri, "object missing, staging buffer starts empty");
            }
            Err(err) => return Err(VfsError::from_client("get", &uri, err)),
        }

        Ok(Staging {
            buffer,
            dirty: false,
        })
    }

    fn head(&self) -> Result<Option<ObjectMeta>, VfsError> {
        match self.client().head(&self.key()) {
            Ok(meta) => Ok(Some(meta)),
            Err(ClientError::NotFound) => Ok(None),
            Err(err) => Err(VfsError::from_client("head", &self.uri(), err)),
        }
    }

    fn existing_meta(&self) -> Result<ObjectMeta, VfsError> {
        self.head()?
            .ok_or_else(|| VfsError::NotFound { uri: self.uri() })
    }

    fn can_native_copy(&self, target: &dyn File) -> bool {
        target.location().file_system().scheme() == self.backend().scheme()
            && self.client().has_native_copy()
    }

    fn native_copy_to(&mut self, target: &mut dyn File) -> Result<(), VfsError> {
        // Persist pending writes on both sides so the server-side copy sees
        // the latest source and no stale target buffer is uploaded over it.
        self.close()?;
        target.close()?;

        let target_key = ObjectKey::from_path(target.location().volume(), &target.path());
        self.client()
            .native_copy(&self.key(), &target_key)
            .map_err(|e| VfsError::from_client("copy", &self.uri(), e))?;
        debug!(source = %self.uri(), target = %target.uri(), "native copy");
        Ok(())
    }
}

impl File for ObjectFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> &dyn Location {
        &self.location
    }

    fn exists(&self) -> Result<bool, VfsError> {
        Ok(self.head()?.is_some())
    }

    fn size(&self) -> Result<u64, VfsError> {
        Ok(self.existing_meta()?.size)
    }

    fn last_modified(&self) -> Result<SystemTime, VfsError> {
        Ok(self.existing_meta()?.last_modified)
    }

    fn truncate(&mut self, size: u64) -> Result<(), VfsError> {
        let uri = self.uri();
        let staging = self.staging()?;
        staging.dirty = true;
        staging
            .buffer
            .set_len(size)
            .map_err(|e| VfsError::from_io("truncate", uri.as_str(), e))
    }

    fn close(&mut self) -> Result<(), VfsError> {
        let Some(mut staging) = self.staging.take() else {
            return Ok(());
        };
        if !staging.dirty {
            return Ok(());
        }

        let uri = self.uri();
        staging
            .buffer
            .seek(SeekFrom::Start(0))
            .map_err(|e| VfsError::from_io("upload", uri.as_str(), e))?;
        self.client()
            .put(&self.key(), &mut staging.buffer)
            .map_err(|e| VfsError::from_client("put", &uri, e))?;
        debug!(uri = %uri, "uploaded staging buffer");
        Ok(())
    }

    fn discard(&mut self) {
        if self.staging.take().is_some_and(|s| s.dirty) {
            debug!(uri = %self.uri(), "discarded unsaved writes");
        }
    }

    fn delete(&mut self) -> Result<(), VfsError> {
        self.client()
            .delete(&self.key())
            .map_err(|e| VfsError::from_client("delete", &self.uri(), e))?;
        self.staging = None;
        Ok(())
    }

    fn copy_to_file(&mut self, target: &mut dyn File) -> Result<(), VfsError> {
        if self.can_native_copy(target) {
            self.native_copy_to(target)
        } else {
            copy::stream_copy(self, target).map(|_| ())
        }
    }

    fn copy_to_location(&mut self, location: &dyn Location) -> Result<Box<dyn File>, VfsError> {
        copy::copy_to_location(self, location)
    }

    fn move_to_file(&mut self, target: &mut dyn File) -> Result<(), VfsError> {
        copy::move_to_file(self, target)
    }

    fn move_to_location(&mut self, location: &dyn Location) -> Result<Box<dyn File>, VfsError> {
        let target = copy::move_to_location(self, location)?;
        if location.file_system().scheme() == self.backend().scheme() {
            self.location = self
                .backend()
                .open_location(location.volume(), location.path())?;
        }
        Ok(target)
    }
}

impl Read for ObjectFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.staging()?.buffer.read(buf)
    }
}

impl Write for ObjectFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let staging = self.staging()?;
        staging.dirty = true;
        staging.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.staging {
            Some(staging) => staging.buffer.flush(),
            None => Ok(()),
        }
    }
}

impl Seek for ObjectFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.staging()?.buffer.seek(pos)
    }
}

impl Drop for ObjectFile {
    fn drop(&mut self) {
        if self.is_dirty() {
            warn!(uri = %self.uri(), "discarding unsaved writes of unclosed file");
        }
    }
}

impl fmt::Display for ObjectFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}
