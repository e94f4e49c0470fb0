//! Core value types shared by backends.

use std::fmt;
use std::time::SystemTime;

/// Coordinates of one object in an object store: bucket plus key.
///
/// The key never starts with a separator; it is the file path with its
/// leading slash removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectKey {
    /// Bucket (volume) holding the object.
    pub volume: String,
    /// Key within the bucket.
    pub key: String,
}

impl ObjectKey {
    /// Build coordinates from a volume and an absolute file path.
    pub fn from_path(volume: &str, path: &str) -> Self {
        Self {
            volume: volume.to_owned(),
            key: path.trim_start_matches('/').to_owned(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.volume, self.key)
    }
}

/// Result of a metadata probe (head-style call).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectMeta {
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    #[cfg_attr(feature = "serde", serde(with = "system_time_serde"))]
    pub last_modified: SystemTime,
}

impl Default for ObjectMeta {
    fn default() -> Self {
        Self {
            size: 0,
            last_modified: SystemTime::UNIX_EPOCH,
        }
    }
}

/// Serde support for SystemTime (when serde feature is enabled).
#[cfg(feature = "serde")]
mod system_time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        (duration.as_secs(), duration.subsec_nanos()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (secs, nanos): (u64, u32) = Deserialize::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::new(secs, nanos))
    }
}
