use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::Result;

pub const USERS_KEY: &str = "users";
pub const AUTH_KEY: &str = "auth";
pub const APPLICATIONS_KEY: &str = "applications";

/// A small key/value store over JSON files in the data directory, one file
/// per key. Reads are best-effort: a missing or malformed value reads as
/// absent, with the malformed file discarded.
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn open() -> Result<Self> {
        let dir = Self::default_dir();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn open_at(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn default_dir() -> PathBuf {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "hrd") {
            proj_dirs.data_dir().to_path_buf()
        } else {
            // Fallback to current directory
            PathBuf::from(".hrd")
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.key_path(key);
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                // Corrupt value: discard it and fall back to the default state
                warn!(key, %err, "discarding malformed stored value");
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string_pretty(value)?;
        fs::write(self.key_path(key), raw)?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, Storage) {
        let tmp = tempfile::tempdir().expect("temp dir");
        let storage = Storage::open_at(tmp.path().to_path_buf()).expect("storage");
        (tmp, storage)
    }

    #[test]
    fn test_missing_key_reads_as_none() {
        let (_tmp, storage) = storage();
        let value: Option<Vec<String>> = storage.read(USERS_KEY);
        assert!(value.is_none());
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let (_tmp, storage) = storage();
        let users = vec!["a".to_string(), "b".to_string()];
        storage.write(USERS_KEY, &users).unwrap();
        let back: Vec<String> = storage.read(USERS_KEY).unwrap();
        assert_eq!(back, users);
    }

    #[test]
    fn test_malformed_value_is_discarded() {
        let (_tmp, storage) = storage();
        std::fs::write(storage.key_path(AUTH_KEY), "{not json").unwrap();

        let value: Option<Vec<String>> = storage.read(AUTH_KEY);
        assert!(value.is_none());
        // The corrupt file is gone, so the next read is a clean miss
        assert!(!storage.key_path(AUTH_KEY).exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_tmp, storage) = storage();
        storage.write(AUTH_KEY, &"x").unwrap();
        storage.remove(AUTH_KEY).unwrap();
        storage.remove(AUTH_KEY).unwrap();
        let value: Option<String> = storage.read(AUTH_KEY);
        assert!(value.is_none());
    }
}
