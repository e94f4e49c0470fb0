//! Error types for the virtual filesystem abstraction.

use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

/// Boxed error produced by a backend client adapter.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Virtual filesystem error with contextual variants.
///
/// Construction-time variants ([`InvalidPath`](VfsError::InvalidPath),
/// [`InvalidVolume`](VfsError::InvalidVolume)) never reach a backend.
/// Everything else is surfaced synchronously from the call that triggered it.
///
/// # Examples
///
/// ```rust
/// use anyfs_vfs::VfsError;
///
/// let err = VfsError::NotFound { uri: "s3://bucket/missing.txt".into() };
/// assert_eq!(err.to_string(), "not found: s3://bucket/missing.txt");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum VfsError {
    // Construction errors
    /// Path is empty, relative, or of the wrong kind (file vs. directory).
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Volume is missing or malformed for this backend.
    #[error("invalid volume {volume:?}: {reason}")]
    InvalidVolume {
        /// The rejected volume.
        volume: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// URI could not be split into scheme, volume and path.
    #[error("invalid uri {uri:?}: {reason}")]
    InvalidUri {
        /// The rejected URI.
        uri: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// No backend is registered under the scheme.
    #[error("no backend registered for scheme {scheme:?}")]
    UnknownScheme {
        /// The requested scheme.
        scheme: String,
    },

    // Backend errors
    /// The object does not exist.
    #[error("not found: {uri}")]
    NotFound {
        /// URI of the missing object.
        uri: String,
    },

    /// Any other failure reported by a backend client adapter.
    #[error("{operation} failed for {uri}: {source}")]
    Backend {
        /// The operation that failed.
        operation: &'static str,
        /// URI of the object involved.
        uri: String,
        /// The adapter's error, unchanged.
        #[source]
        source: BoxError,
    },

    /// Local I/O failure (native file or staging buffer).
    #[error("{operation} failed for {}: {source}", path.display())]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The local path, or the URI of the object being staged.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Copy succeeded but deleting the source failed.
    ///
    /// Both the source and the destination exist afterwards.
    #[error("move of {source_uri} to {target_uri} copied but did not delete the source: {source}")]
    PartialMove {
        /// URI of the source that could not be deleted.
        source_uri: String,
        /// URI of the completed copy.
        target_uri: String,
        /// The delete failure.
        #[source]
        source: Box<VfsError>,
    },

    /// Configuration could not be parsed.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl VfsError {
    /// Returns `true` for malformed path, volume or URI arguments.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            VfsError::InvalidPath { .. }
                | VfsError::InvalidVolume { .. }
                | VfsError::InvalidUri { .. }
        )
    }

    /// Returns `true` if the error reports a missing object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VfsError::NotFound { .. })
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        VfsError::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Wrap an I/O failure, recovering a `VfsError` that was tunnelled
    /// through `std::io` by a `Read`/`Write`/`Seek` implementation.
    pub(crate) fn from_io(operation: &'static str, path: impl Into<PathBuf>, error: io::Error) -> Self {
        if !error.get_ref().is_some_and(|inner| inner.is::<VfsError>()) {
            return VfsError::io(operation, path, error);
        }
        let kind = error.kind();
        match error.into_inner().map(|inner| inner.downcast::<VfsError>()) {
            Some(Ok(inner)) => *inner,
            Some(Err(other)) => VfsError::io(operation, path, io::Error::new(kind, other)),
            None => VfsError::io(operation, path, io::Error::from(kind)),
        }
    }

    /// Translate an adapter error for `uri`, keeping `NotFound` distinct.
    pub(crate) fn from_client(operation: &'static str, uri: &str, error: ClientError) -> Self {
        match error {
            ClientError::NotFound => VfsError::NotFound { uri: uri.to_owned() },
            ClientError::Other(source) => VfsError::Backend {
                operation,
                uri: uri.to_owned(),
                source,
            },
        }
    }
}

impl From<io::Error> for VfsError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => VfsError::NotFound { uri: String::new() },
            _ => VfsError::Io {
                operation: "io",
                path: PathBuf::new(),
                source: error,
            },
        }
    }
}

impl From<VfsError> for io::Error {
    fn from(error: VfsError) -> Self {
        match error {
            VfsError::Io { source, .. } => source,
            e @ VfsError::NotFound { .. } => io::Error::new(io::ErrorKind::NotFound, e),
            e if e.is_invalid_argument() => io::Error::new(io::ErrorKind::InvalidInput, e),
            e => io::Error::other(e),
        }
    }
}

/// Error returned by an [`ObjectClient`](crate::ObjectClient), already classified.
///
/// Each adapter decides which of its native failures mean "no such object";
/// the core only ever inspects this tag.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The object does not exist.
    #[error("object not found")]
    NotFound,

    /// Any other failure.
    #[error(transparent)]
    Other(BoxError),
}

impl ClientError {
    /// Wrap an arbitrary adapter error as [`ClientError::Other`].
    pub fn other(error: impl Into<BoxError>) -> Self {
        ClientError::Other(error.into())
    }
}

impl From<io::Error> for ClientError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => ClientError::NotFound,
            _ => ClientError::Other(Box::new(error)),
        }
    }
}
