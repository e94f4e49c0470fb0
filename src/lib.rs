//! # anyfs-vfs
//!
//! A **backend-agnostic File / Location / FileSystem contract** for files
//! that live on a local disk or inside a remote object store.
//!
//! The same sequence of calls works whether the medium is a local path or a
//! bucket/key pair in a store with no native random access or directories.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use anyfs_vfs::{File, FileSystem, MemoryClient, ObjectFileSystem};
//! use std::io::{Read, Seek, SeekFrom, Write};
//! use std::sync::Arc;
//!
//! fn roundtrip(fs: &dyn FileSystem, volume: &str) -> Result<String, anyfs_vfs::VfsError> {
//!     let mut file = fs.new_file(volume, "/greetings/hello.txt")?;
//!     file.write_all(b"hello world!")?;
//!     file.seek(SeekFrom::Start(6))?;
//!     let mut tail = String::new();
//!     file.read_to_string(&mut tail)?;
//!     file.close()?;
//!     Ok(tail)
//! }
//!
//! let store = ObjectFileSystem::memory(Arc::new(MemoryClient::new()));
//! assert_eq!(roundtrip(&store, "bucket").unwrap(), "world!");
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`FileSystem`] | One storage medium, identified by scheme; factory for locations and files |
//! | [`Location`] | Directory-like prefix (volume + path) |
//! | [`File`] | One object: `Read + Write + Seek`, metadata, copy, move, delete |
//! | [`ObjectFileSystem`] | Object-store backend with a lazy staging buffer per file |
//! | [`OsFileSystem`] | Local-disk backend |
//! | [`ObjectClient`] | Narrow get/put/head/delete/native-copy surface of an object store |
//! | [`Registry`] | Scheme → file-system constructor mapping |
//! | [`VfsError`] | Error type with context |
//!
//! ---
//!
//! ## Copy and Move
//!
//! Same-scheme copies between object stores use the client's server-side
//! copy. Everything else streams through `Read`/`Write` with
//! [`stream_copy`], which always writes at least once so an empty source
//! still materializes the destination. A move is copy-then-delete; a failed
//! copy never deletes, a failed delete reports [`VfsError::PartialMove`].
//!
//! ---
//!
//! ## Thread Safety
//!
//! File systems, locations, clients and the registry are `Send + Sync`.
//! A [`File`] handle is `Send` but must not be used from two places at once.
//! All operations are blocking; there are no internal threads, timeouts or
//! retries.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`ObjectKey`], [`ObjectMeta`], [`ObjectOptions`], plus `ObjectOptions::from_json` |

// Private modules
mod client;
mod copy;
mod error;
mod ext;
mod location;
mod object;
mod os;
mod registry;
mod traits;
mod types;

// Public modules
pub mod path;

// Public re-exports - error types
pub use error::{BoxError, ClientError, VfsError};

// Public re-exports - core types
pub use types::{ObjectKey, ObjectMeta};

// Public re-exports - contracts
pub use traits::{File, FileSystem, Location};

// Public re-exports - backends
pub use client::{MemoryClient, ObjectClient};
pub use location::VolumeLocation;
pub use object::{
    GS_SCHEME, MEMORY_SCHEME, ObjectFile, ObjectFileSystem, ObjectOptions, S3_SCHEME,
};
pub use os::{FILE_SCHEME, OsFile, OsFileSystem};

// Public re-exports - infrastructure
pub use copy::{stream_copy, touch_copy};
pub use ext::FileExt;
pub use registry::{Factory, Registry, RegistryBuilder};
