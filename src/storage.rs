//! Key/value persistence: one pretty-printed JSON file per key in the data directory.

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const LAYOUT_KEY: &str = "explainator-layout";
pub const CATEGORIES_KEY: &str = "explainator-categories";
pub const CANVAS_KEY: &str = "explainator-canvas";
pub const SLIDES_KEY: &str = "explainator-slides-storage";
pub const PROJECTS_KEY: &str = "explainator-projects";
pub const NOTES_KEY: &str = "explainator-notes";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Stored value for {key} is not valid: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        debug!(dir = %dir.display(), "storage opened");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    /// `Ok(None)` when nothing has been stored under `key` yet.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io {
                    key: key.to_string(),
                    source,
                })
            }
        };
        let value = serde_json::from_str(&text).map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })?;
        debug!(key, "loaded");
        Ok(Some(value))
    }

    /// Writes to a temporary sibling first and renames it over the target,
    /// so a crash never leaves a half-written file behind.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })?;
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        {
            let mut file = fs::File::create(&tmp).map_err(io_err)?;
            file.write_all(json.as_bytes()).map_err(io_err)?;
            file.sync_all().map_err(io_err)?;
        }
        fs::rename(&tmp, &path).map_err(io_err)?;
        debug!(key, bytes = json.len(), "saved");
        Ok(())
    }

    pub fn remove(&self, key: &str) -> StorageResult<bool> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {
                info!(key, "removed");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        let value: Option<serde_json::Value> = storage.load(LAYOUT_KEY).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_save_load_remove() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path().join("nested")).unwrap();
        storage.save(CANVAS_KEY, &json!({ "canvasMode": true })).unwrap();
        assert!(storage.contains(CANVAS_KEY));
        assert!(!dir.path().join("nested/.explainator-canvas.json.tmp").exists());

        let loaded: serde_json::Value = storage.load(CANVAS_KEY).unwrap().unwrap();
        assert_eq!(loaded["canvasMode"], true);

        assert!(storage.remove(CANVAS_KEY).unwrap());
        assert!(!storage.remove(CANVAS_KEY).unwrap());
    }

    #[test]
    fn test_corrupt_file_reports_key() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        fs::write(storage.path_for(SLIDES_KEY), "{ nope").unwrap();
        let err = storage.load::<serde_json::Value>(SLIDES_KEY).unwrap_err();
        assert!(matches!(err, StorageError::Json { ref key, .. } if key == SLIDES_KEY));
        assert!(err.to_string().contains(SLIDES_KEY));
    }
}
