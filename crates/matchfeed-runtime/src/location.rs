use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use matchfeed_types::Location;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

use crate::Result;

const LOCATION_KEY: &str = "userLocation";
const STORAGE_FILE: &str = "storage.json";

/// Tiny key-value store persisted as one JSON object on disk
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store file inside a data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STORAGE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut entries = self.read_all()?;
        match entries.remove(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        // A corrupt store is replaced rather than blocking writes
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), serde_json::to_value(value)?);
        self.write_all(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.read_all()?;
        let removed = entries.remove(key).is_some();
        if removed {
            self.write_all(&entries)?;
        }
        Ok(removed)
    }
}

/// Device-local cache of the user's selected location
#[derive(Debug, Clone)]
pub struct LocationStore {
    storage: LocalStorage,
}

impl LocationStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(LocalStorage::in_dir(data_dir))
    }

    /// Cached location, if any. Unreadable entries are logged and ignored.
    pub fn load(&self) -> Option<Location> {
        match self.storage.get::<Location>(LOCATION_KEY) {
            Ok(location) => location,
            Err(err) => {
                warn!(path = %self.storage.path().display(), error = %err, "failed to load cached location");
                None
            }
        }
    }

    pub fn save(&self, location: &Location) -> Result<()> {
        location.validate()?;
        self.storage.set(LOCATION_KEY, location)
    }

    pub fn clear(&self) -> Result<bool> {
        self.storage.remove(LOCATION_KEY)
    }

    pub fn has_location(&self) -> bool {
        self.load().is_some_and(|location| location.is_complete())
    }

    pub fn formatted(&self) -> Option<String> {
        self.load().and_then(|location| location.formatted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::TempDir;

    fn minsk() -> Location {
        Location::new("by", "Беларусь", "Минск", Some("Центральный".to_string()))
    }

    #[test]
    fn test_save_load_clear() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = LocationStore::in_dir(temp_dir.path());
        assert_eq!(store.load(), None);
        assert!(!store.has_location());

        store.save(&minsk())?;
        assert_eq!(store.load(), Some(minsk()));
        assert_eq!(
            store.formatted().as_deref(),
            Some("Минск (Центральный), Беларусь")
        );

        assert!(store.clear()?);
        assert!(!store.clear()?);
        assert_eq!(store.load(), None);
        Ok(())
    }

    #[test]
    fn test_invalid_location_is_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = LocationStore::in_dir(temp_dir.path());

        let missing_district = Location::new("by", "Беларусь", "Минск", None);
        assert!(matches!(store.save(&missing_district), Err(Error::Types(_))));
        assert_eq!(store.load(), None);
        Ok(())
    }

    #[test]
    fn test_corrupt_store_loads_as_empty_and_is_overwritten() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = LocationStore::in_dir(temp_dir.path());
        std::fs::write(temp_dir.path().join(STORAGE_FILE), "{not json")?;

        assert_eq!(store.load(), None);
        store.save(&minsk())?;
        assert_eq!(store.load(), Some(minsk()));
        Ok(())
    }

    #[test]
    fn test_other_keys_survive() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let storage = LocalStorage::in_dir(temp_dir.path());
        storage.set("theme", &"dark")?;

        let store = LocationStore::new(storage.clone());
        store.save(&minsk())?;
        store.clear()?;

        assert_eq!(storage.get::<String>("theme")?.as_deref(), Some("dark"));
        Ok(())
    }
}
