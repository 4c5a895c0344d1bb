use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{PersistError, PersistResult};

/// A synchronous string-to-string store.
///
/// Methods take `&self` so one store can back several gateways; backends use
/// interior mutability where they need it.
pub trait KeyValueStore: fmt::Debug {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> PersistResult<Option<String>>;
    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> PersistResult<()>;
    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> PersistResult<()>;
    /// Every key currently stored, sorted.
    fn keys(&self) -> PersistResult<Vec<String>>;
}

/// A store shared between the gateways of one process.
pub type SharedStore = Rc<dyn KeyValueStore>;

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// This store behind a [`SharedStore`], still reachable through `self`.
    pub fn shared(&self) -> SharedStore {
        Rc::new(self.clone())
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PersistResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PersistResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> PersistResult<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

/// Directory-backed store: each key is a `<key>.json` file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

const EXTENSION: &str = "json";

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> PersistResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PersistResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(PersistError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> PersistResult<()> {
        let path = self.path_for(key)?;
        // Write then rename so a crash never leaves a truncated record.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> PersistResult<()> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> PersistResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let shared = store.shared();
        shared.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.len(), 1);
        store.remove("a").unwrap();
        assert!(shared.get("a").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn memory_store_keys_are_sorted() {
        let store = MemoryStore::new();
        store.set("b", "").unwrap();
        store.set("a", "").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("saves")).unwrap();
        assert!(store.get("slot_1").unwrap().is_none());

        store.set("slot_1", "{\"x\":1}").unwrap();
        store.set("slot_2", "{}").unwrap();
        assert_eq!(store.get("slot_1").unwrap().as_deref(), Some("{\"x\":1}"));
        assert_eq!(store.keys().unwrap(), vec!["slot_1", "slot_2"]);

        store.set("slot_1", "{\"x\":2}").unwrap();
        assert_eq!(store.get("slot_1").unwrap().as_deref(), Some("{\"x\":2}"));

        store.remove("slot_1").unwrap();
        store.remove("slot_1").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["slot_2"]);
    }

    #[test]
    fn file_store_ignores_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("notes.txt"), "hi").unwrap();
        store.set("k", "v").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["k"]);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(
                store.set(key, "x"),
                Err(PersistError::InvalidKey(_))
            ));
        }
    }
}
