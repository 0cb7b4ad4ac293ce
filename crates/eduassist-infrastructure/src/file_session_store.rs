//! File-backed session store.
//!
//! All keys live in one JSON object file. Every mutation is a
//! read-modify-write under an exclusive lock, written to a temporary file
//! and renamed into place.

use eduassist_core::session_store::{SessionStore, StorageKey};
use eduassist_core::{EduError, Result};
use serde_json::{Map, Value};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(EduError::storage(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
        }
    }

    fn save(&self, data: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(serde_json::to_string_pretty(data)?.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let _lock = FileLock::acquire(&self.path)?;
        let mut data = match self.load() {
            Ok(data) => data,
            Err(e @ (EduError::Serialization { .. } | EduError::Storage(_))) => {
                tracing::warn!("[SessionStore] Unreadable session file, starting over: {}", e);
                self.set_aside()?;
                Map::new()
            }
            Err(e) => return Err(e),
        };
        f(&mut data);
        self.save(&data)
    }

    /// Moves an unreadable session file to `<name>.corrupt` next to it.
    fn set_aside(&self) -> Result<()> {
        let backup = self.sibling("corrupt")?;
        fs::rename(&self.path, &backup)?;
        tracing::warn!("[SessionStore] Moved old session file to {}", backup.display());
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self.file_name()?;
        Ok(self.parent()?.join(format!(".{file_name}.tmp")))
    }

    fn sibling(&self, suffix: &str) -> Result<PathBuf> {
        let file_name = self.file_name()?;
        Ok(self.parent()?.join(format!("{file_name}.{suffix}")))
    }

    fn parent(&self) -> Result<&Path> {
        self.path
            .parent()
            .ok_or_else(|| EduError::storage("session file has no parent directory"))
    }

    fn file_name(&self) -> Result<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| EduError::storage("session file has no file name"))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: StorageKey) -> Result<Option<Value>> {
        Ok(self.load()?.remove(key.as_str()))
    }

    fn set(&self, key: StorageKey, value: Value) -> Result<()> {
        self.update(|data| {
            data.insert(key.as_str().to_string(), value);
        })
    }

    fn clear(&self, key: StorageKey) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|data| {
            data.remove(key.as_str());
        })
    }
}

/// A file lock guard that automatically releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| EduError::storage(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduassist_core::session_store::SessionStoreExt;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_values_survive_a_new_handle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let store = FileSessionStore::new(path.clone());
        store.set(StorageKey::Token, json!("teacher-token")).unwrap();
        store
            .set(StorageKey::PreselectedUsers, json!([{"id": 1}, {"id": 2}]))
            .unwrap();

        let reopened = FileSessionStore::new(path);
        assert_eq!(
            reopened.get_string(StorageKey::Token).unwrap().as_deref(),
            Some("teacher-token")
        );
        assert_eq!(
            reopened.get(StorageKey::PreselectedUsers).unwrap(),
            Some(json!([{"id": 1}, {"id": 2}]))
        );
    }

    #[test]
    fn test_clear_only_removes_one_key() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.set(StorageKey::Token, json!("a")).unwrap();
        store.set(StorageKey::StudentToken, json!("b")).unwrap();

        store.clear(StorageKey::Token).unwrap();
        assert_eq!(store.get(StorageKey::Token).unwrap(), None);
        assert_eq!(store.get(StorageKey::StudentToken).unwrap(), Some(json!("b")));
    }

    #[test]
    fn test_missing_file_reads_empty_and_clear_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get(StorageKey::Token).unwrap(), None);
        store.clear(StorageKey::Token).unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_non_object_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let store = FileSessionStore::new(path);
        assert!(matches!(store.get(StorageKey::Token), Err(EduError::Storage(_))));
    }

    #[test]
    fn test_garbage_file_does_not_block_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileSessionStore::new(path.clone());

        assert!(matches!(
            store.get(StorageKey::Token),
            Err(EduError::Serialization { .. })
        ));

        store.set(StorageKey::Token, json!("fresh")).unwrap();
        assert_eq!(
            store.get_string(StorageKey::Token).unwrap().as_deref(),
            Some("fresh")
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("session.json.corrupt")).unwrap(),
            "{not json"
        );
    }

    #[test]
    fn test_clear_recovers_from_non_object_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "\"just a string\"").unwrap();
        let store = FileSessionStore::new(path);

        store.clear(StorageKey::StudentToken).unwrap();
        assert_eq!(store.get(StorageKey::StudentToken).unwrap(), None);
    }
}
