//! Directory-backed storage.
//!
//! Each key maps to `<dir>/<encoded key>.json`. Writes go to a uniquely named
//! temporary file in the same directory and are renamed into place, so a
//! crash mid-write leaves either the old document or the new one, and
//! concurrent writers never share a temporary file.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::{KeyValueStore, StorageError};

/// A [`KeyValueStore`] that keeps one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`.
    ///
    /// The directory is created lazily on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document for `key`.
    ///
    /// Keys are percent-encoded so arbitrary key strings cannot escape the
    /// directory.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }

    fn io_error(key: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_owned(),
            source,
        }
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(key, e))?;

        let path = self.path_for(key);
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| Self::io_error(key, e))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| Self::io_error(key, e))?;
        tmp.persist(&path).map_err(|e| Self::io_error(key, e.error))?;

        debug!(key, path = %path.display(), bytes = value.len(), "Wrote storage document");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_in_fresh_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path().join("state"));

        assert_eq!(storage.get("plugon-demo-user").unwrap(), None);

        storage.set("plugon-demo-user", "{\"a\":1}").unwrap();
        assert_eq!(
            storage.get("plugon-demo-user").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        storage.remove("plugon-demo-user").unwrap();
        assert_eq!(storage.get("plugon-demo-user").unwrap(), None);
        storage.remove("plugon-demo-user").unwrap();
    }

    #[test]
    fn test_concurrent_writers_leave_one_whole_document() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path());
        let values: Vec<String> = (0..8).map(|i| format!("[{i},{i},{i}]")).collect();

        std::thread::scope(|scope| {
            for value in &values {
                let storage = storage.clone();
                scope.spawn(move || {
                    for _ in 0..25 {
                        storage.set("plugon-cart", value).unwrap();
                    }
                });
            }
        });

        let stored = storage.get("plugon-cart").unwrap().unwrap();
        assert!(values.contains(&stored));

        let leftovers: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("plugon-cart.json")]);
    }

    #[test]
    fn test_keys_cannot_escape_directory() {
        let storage = FileStorage::new("/var/lib/plugon");
        let path = storage.path_for("../../etc/passwd");
        assert_eq!(path.parent().unwrap(), Path::new("/var/lib/plugon"));
    }
}
