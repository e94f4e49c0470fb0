//! # Backend registry
//!
//! An explicit mapping from scheme string to a file-system constructor. The
//! host application builds it once at startup and then shares it read-only.
//!
//! ```rust
//! use anyfs_vfs::{File, Registry};
//! use std::io::Write;
//!
//! let registry = Registry::builder().with_defaults().build();
//! let mut file = registry.new_file("mem://bucket/notes/today.txt").unwrap();
//! file.write_all(b"remember the milk").unwrap();
//! file.close().unwrap();
//!
//! // `mem` handles share one store.
//! let again = registry.new_file("mem://bucket/notes/today.txt").unwrap();
//! assert_eq!(again.size().unwrap(), 17);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::path;
use crate::{
    FILE_SCHEME, File, FileSystem, Location, MemoryClient, ObjectFileSystem, OsFileSystem,
    VfsError,
};

/// Constructor registered for a scheme.
pub type Factory = Box<dyn Fn() -> Result<Box<dyn FileSystem>, VfsError> + Send + Sync>;

/// Collects factories before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
    factories: HashMap<String, Factory>,
}

impl RegistryBuilder {
    /// Register `factory` under `scheme`, replacing any earlier entry.
    pub fn register<F>(mut self, scheme: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn FileSystem>, VfsError> + Send + Sync + 'static,
    {
        self.factories.insert(scheme.into(), Box::new(factory));
        self
    }

    /// Register one shared file system instance under its own scheme.
    pub fn register_instance<F>(self, fs: F) -> Self
    where
        F: FileSystem + Clone + 'static,
    {
        let scheme = fs.scheme().to_owned();
        self.register(scheme, move || Ok(Box::new(fs.clone())))
    }

    /// Register the local disk (`file`) and an in-process store (`mem`).
    pub fn with_defaults(self) -> Self {
        let memory = ObjectFileSystem::memory(Arc::new(MemoryClient::new()));
        self.register(FILE_SCHEME, || Ok(Box::new(OsFileSystem::new())))
            .register_instance(memory)
    }

    /// Freeze the mapping.
    pub fn build(self) -> Registry {
        Registry {
            factories: self.factories,
        }
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("schemes", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Read-only scheme → file-system mapping.
pub struct Registry {
    factories: HashMap<String, Factory>,
}

impl Registry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registered schemes, sorted.
    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }

    /// Returns `true` if `scheme` is registered.
    pub fn contains(&self, scheme: &str) -> bool {
        self.factories.contains_key(scheme)
    }

    /// Construct the file system registered under `scheme`.
    ///
    /// # Errors
    ///
    /// - [`VfsError::UnknownScheme`] if nothing is registered under `scheme`
    /// - whatever the factory returns
    pub fn file_system(&self, scheme: &str) -> Result<Box<dyn FileSystem>, VfsError> {
        let factory = self
            .factories
            .get(scheme)
            .ok_or_else(|| VfsError::UnknownScheme {
                scheme: scheme.to_owned(),
            })?;
        factory()
    }

    /// Resolve a file URI such as `s3://bucket/a/b.txt`.
    ///
    /// # Errors
    ///
    /// [`VfsError::InvalidUri`], [`VfsError::UnknownScheme`], or the backend's
    /// own validation errors.
    pub fn new_file(&self, uri: &str) -> Result<Box<dyn File>, VfsError> {
        let parsed = path::parse_uri(uri)?;
        self.file_system(&parsed.scheme)?
            .new_file(&parsed.volume, &parsed.path)
    }

    /// Resolve a location URI such as `gs://bucket/some/prefix/`.
    ///
    /// # Errors
    ///
    /// [`VfsError::InvalidUri`], [`VfsError::UnknownScheme`], or the backend's
    /// own validation errors.
    pub fn new_location(&self, uri: &str) -> Result<Box<dyn Location>, VfsError> {
        let parsed = path::parse_uri(uri)?;
        self.file_system(&parsed.scheme)?
            .new_location(&parsed.volume, &parsed.path)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("schemes", &self.schemes())
            .finish()
    }
}
