//! # Backend client adapters
//!
//! [`ObjectClient`] is the narrow surface the object-store adapter consumes:
//! whole-object `get`/`put`, a `head` probe, `delete`, and an optional
//! server-side copy. SDK wiring (credentials, retries, request shaping) lives
//! behind this trait and is not the core's concern.
//!
//! [`MemoryClient`] is a complete in-process implementation. It backs the
//! `mem` scheme and is a convenient store for tests.

use std::fmt;
use std::io::{self, Read};
use std::time::SystemTime;

use dashmap::DashMap;

use crate::{ClientError, ObjectKey, ObjectMeta};

/// Capability surface of one object-store backend.
///
/// Every method classifies its own failures: "no such object" must be
/// reported as [`ClientError::NotFound`], everything else as
/// [`ClientError::Other`].
///
/// # Thread Safety
///
/// Clients are shared by every file of a file system and must be
/// `Send + Sync`.
pub trait ObjectClient: Send + Sync + fmt::Debug {
    /// Stream the full content of an object.
    fn get(&self, key: &ObjectKey) -> Result<Box<dyn Read + Send>, ClientError>;

    /// Replace the content of an object (creating it if missing).
    fn put(&self, key: &ObjectKey, body: &mut dyn Read) -> Result<(), ClientError>;

    /// Probe size and modification time.
    fn head(&self, key: &ObjectKey) -> Result<ObjectMeta, ClientError>;

    /// Remove an object.
    fn delete(&self, key: &ObjectKey) -> Result<(), ClientError>;

    /// Whether [`native_copy`](ObjectClient::native_copy) is available.
    fn has_native_copy(&self) -> bool {
        false
    }

    /// Server-side copy from `source` to `target`.
    ///
    /// Only called when [`has_native_copy`](ObjectClient::has_native_copy)
    /// returns `true`.
    fn native_copy(&self, source: &ObjectKey, target: &ObjectKey) -> Result<(), ClientError> {
        let _ = (source, target);
        Err(ClientError::other("native copy is not supported by this client"))
    }
}

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    modified: SystemTime,
}

/// In-process object store.
///
/// Objects live in a concurrent map keyed by [`ObjectKey`]. Supports native
/// copy.
///
/// ```rust
/// use anyfs_vfs::{MemoryClient, ObjectClient, ObjectKey};
///
/// let client = MemoryClient::new();
/// let key = ObjectKey::from_path("bucket", "/a.txt");
/// client.put(&key, &mut &b"hi"[..]).unwrap();
/// assert_eq!(client.head(&key).unwrap().size, 2);
/// ```
#[derive(Debug, Default)]
pub struct MemoryClient {
    objects: DashMap<ObjectKey, StoredObject>,
}

impl MemoryClient {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Copy of the stored bytes, if the object exists.
    pub fn contents(&self, key: &ObjectKey) -> Option<Vec<u8>> {
        self.objects.get(key).map(|o| o.data.clone())
    }
}

impl ObjectClient for MemoryClient {
    fn get(&self, key: &ObjectKey) -> Result<Box<dyn Read + Send>, ClientError> {
        let data = self.contents(key).ok_or(ClientError::NotFound)?;
        Ok(Box::new(io::Cursor::new(data)))
    }

    fn put(&self, key: &ObjectKey, body: &mut dyn Read) -> Result<(), ClientError> {
        let mut data = Vec::new();
        body.read_to_end(&mut data)?;
        self.objects.insert(
            key.clone(),
            StoredObject {
                data,
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    fn head(&self, key: &ObjectKey) -> Result<ObjectMeta, ClientError> {
        self.objects
            .get(key)
            .map(|o| ObjectMeta {
                size: o.data.len() as u64,
                last_modified: o.modified,
            })
            .ok_or(ClientError::NotFound)
    }

    fn delete(&self, key: &ObjectKey) -> Result<(), ClientError> {
        self.objects
            .remove(key)
            .map(|_| ())
            .ok_or(ClientError::NotFound)
    }

    fn has_native_copy(&self) -> bool {
        true
    }

    fn native_copy(&self, source: &ObjectKey, target: &ObjectKey) -> Result<(), ClientError> {
        // Clone out before inserting so no shard guard is held across both keys.
        let data = self.contents(source).ok_or(ClientError::NotFound)?;
        self.objects.insert(
            target.clone(),
            StoredObject {
                data,
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(path: &str) -> ObjectKey {
        ObjectKey::from_path("bucket", path)
    }

    #[test]
    fn put_then_get_returns_bytes() {
        let client = MemoryClient::new();
        client.put(&key("/a.txt"), &mut &b"hello"[..]).unwrap();

        let mut out = String::new();
        client
            .get(&key("/a.txt"))
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn missing_object_is_not_found() {
        let client = MemoryClient::new();
        assert!(matches!(client.get(&key("/x")), Err(ClientError::NotFound)));
        assert!(matches!(client.head(&key("/x")), Err(ClientError::NotFound)));
        assert!(matches!(client.delete(&key("/x")), Err(ClientError::NotFound)));
    }

    #[test]
    fn head_reports_size() {
        let client = MemoryClient::new();
        client.put(&key("/a.txt"), &mut &b"12345"[..]).unwrap();
        assert_eq!(client.head(&key("/a.txt")).unwrap().size, 5);
    }

    #[test]
    fn native_copy_duplicates_object() {
        let client = MemoryClient::new();
        client.put(&key("/a.txt"), &mut &b"data"[..]).unwrap();
        assert!(client.has_native_copy());
        client.native_copy(&key("/a.txt"), &key("/b.txt")).unwrap();
        assert_eq!(client.contents(&key("/b.txt")).unwrap(), b"data");
        assert_eq!(client.len(), 2);
    }

    #[test]
    fn delete_removes_object() {
        let client = MemoryClient::new();
        client.put(&key("/a.txt"), &mut &b""[..]).unwrap();
        client.delete(&key("/a.txt")).unwrap();
        assert!(client.is_empty());
    }

    #[test]
    fn default_native_copy_is_unsupported() {
        #[derive(Debug)]
        struct GetOnly;
        impl ObjectClient for GetOnly {
            fn get(&self, _: &ObjectKey) -> Result<Box<dyn Read + Send>, ClientError> {
                Ok(Box::new(io::empty()))
            }
            fn put(&self, _: &ObjectKey, _: &mut dyn Read) -> Result<(), ClientError> {
                Ok(())
            }
            fn head(&self, _: &ObjectKey) -> Result<ObjectMeta, ClientError> {
                Ok(ObjectMeta::default())
            }
            fn delete(&self, _: &ObjectKey) -> Result<(), ClientError> {
                Ok(())
            }
        }

        assert!(!GetOnly.has_native_copy());
        assert!(GetOnly.native_copy(&key("/a"), &key("/b")).is_err());
    }
}
