//! # Virtual Filesystem Traits
//!
//! The three contracts every backend implements.
//!
//! ```text
//! FileSystem 1──* Location 1──* File
//!   (scheme)       (volume, path/)   (name)
//! ```
//!
//! ## Quick Reference
//!
//! | Trait | Identifies | Factory for |
//! |-------|-----------|-------------|
//! | [`FileSystem`] | A storage medium, by scheme | [`Location`], [`File`] |
//! | [`Location`] | A directory-like prefix | Child [`Location`]s, [`File`]s |
//! | [`File`] | One object | Copies and moves of itself |
//!
//! ## Object Safety
//!
//! All traits are object-safe. Backends hand out `Box<dyn File>` and
//! `Box<dyn Location>` so callers never name a concrete backend type:
//!
//! ```rust
//! use anyfs_vfs::{File, FileSystem, VfsError};
//! use std::io::Write;
//!
//! fn save(fs: &dyn FileSystem, volume: &str, data: &[u8]) -> Result<(), VfsError> {
//!     let mut file = fs.new_file(volume, "/reports/latest.csv")?;
//!     file.write_all(data)?;
//!     file.close()
//! }
//! ```

mod file;
mod file_system;
mod location;

pub use file::File;
pub use file_system::FileSystem;
pub use location::Location;
