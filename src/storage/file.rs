use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::{KeyValueStore, Partition, StorageKey, StorageResult};

/// One JSON file per key:
///
/// ```text
/// <root>/global/<name>.json
/// <root>/users/<hex user id>/<name>.json
/// ```
///
/// User ids are hex encoded, so no id can name a path outside its own
/// directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("global"))?;
        fs::create_dir_all(root.join("users"))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &StorageKey) -> PathBuf {
        let dir = match &key.partition {
            Partition::Global => self.root.join("global"),
            Partition::User(id) => self.root.join("users").join(hex::encode(id)),
        };
        dir.join(format!("{}.json", key.name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &StorageKey) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &StorageKey, value: String) -> StorageResult<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Readers never observe a half-written file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let key = StorageKey::cart("user-1");

        assert!(store.get(&key).unwrap().is_none());
        store.set(&key, r#"{"p1":{"M":2}}"#.into()).unwrap();
        assert_eq!(store.get(&key).unwrap().as_deref(), Some(r#"{"p1":{"M":2}}"#));

        store.remove(&key).unwrap();
        assert!(store.get(&key).unwrap().is_none());
        store.remove(&key).unwrap();
    }

    #[test]
    fn user_partition_is_hex_named() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set(&StorageKey::cart("u1"), "{}".into()).unwrap();
        assert!(dir.path().join("users").join("7531").join("cart.json").is_file());
    }

    #[test]
    fn hostile_user_ids_stay_inside_their_partition() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let sneaky = StorageKey::user("../global", "user");
        store.set(&sneaky, "\"evil\"".into()).unwrap();

        assert!(store.get(&StorageKey::session()).unwrap().is_none());
        let path = store.path_for(&sneaky);
        assert!(path.starts_with(dir.path().join("users")));
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let key = StorageKey::orders("u");
        FileStore::open(dir.path())
            .unwrap()
            .set(&key, "[]".into())
            .unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get(&key).unwrap().as_deref(), Some("[]"));
    }
}
