use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use hbnb_types::{Entity, EntityKind, TYPE_FIELD};

use crate::error::{StoreError, StoreResult};
use crate::map::EntityMap;
use crate::traits::{LoadReport, ObjectStore};

/// Store checkpointed to a single JSON document.
///
/// On-disk format:
/// ```text
/// {
///   "User.1b7c...": {"__class__": "User", "id": "1b7c...",
///                    "created_at": "2017-09-28T21:05:54.119427",
///                    "updated_at": "2017-09-28T21:05:54.119572",
///                    "first_name": "Betty"},
///   ...
/// }
/// ```
///
/// `save` writes a complete snapshot to a temporary file next to the target
/// and renames it into place, so a crash mid-write leaves the previous
/// snapshot intact. No file handle is held between calls.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    objects: EntityMap,
}

impl FileStorage {
    /// Create an empty store backed by `path`. Nothing is read until `load`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            objects: EntityMap::new(),
        }
    }

    /// Create a store for `path` and load it.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<(Self, LoadReport)> {
        let mut store = Self::new(path);
        let report = store.load()?;
        Ok((store, report))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, reason: impl Into<String>) -> StoreError {
        StoreError::Corrupt {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn decode(&self, text: &str) -> StoreResult<(EntityMap, LoadReport)> {
        let mut objects = EntityMap::new();
        let mut report = LoadReport::default();

        if text.trim().is_empty() {
            warn!(path = %self.path.display(), "store file is empty; starting empty");
            return Ok((objects, report));
        }

        let document: Map<String, Value> =
            serde_json::from_str(text).map_err(|e| self.corrupt(e.to_string()))?;

        for (key, record) in document {
            if !record.is_object() {
                return Err(self.corrupt(format!("record {key:?} is not an object")));
            }

            let kind = record.get(TYPE_FIELD).and_then(Value::as_str);
            if kind.and_then(|k| k.parse::<EntityKind>().ok()).is_none() {
                warn!(%key, kind = ?kind, "skipping record of unknown kind");
                report.skipped += 1;
                continue;
            }

            let entity: Entity = serde_json::from_value(record)
                .map_err(|e| self.corrupt(format!("record {key:?}: {e}")))?;

            let own_key = entity.key().to_string();
            if own_key != key {
                warn!(%key, %own_key, "record stored under a foreign key; re-keying");
            }
            if let Some(dropped) = objects.insert(entity) {
                warn!(
                    %key,
                    duplicate_of = %dropped.key(),
                    "two records share a key; keeping the later one"
                );
                report.skipped += 1;
            } else {
                report.loaded += 1;
            }
        }

        Ok((objects, report))
    }
}

impl ObjectStore for FileStorage {
    fn load(&mut self) -> StoreResult<LoadReport> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no store file; starting empty");
                self.objects.clear();
                return Ok(LoadReport::default());
            }
            Err(e) => return Err(e.into()),
        };

        let (objects, report) = self.decode(&text)?;
        self.objects = objects;
        debug!(
            path = %self.path.display(),
            loaded = report.loaded,
            skipped = report.skipped,
            "store loaded"
        );
        Ok(report)
    }

    fn save(&self) -> StoreResult<()> {
        let snapshot: BTreeMap<String, &Entity> = self
            .objects
            .iter()
            .map(|(key, entity)| (key.to_string(), entity))
            .collect();
        let bytes =
            serde_json::to_vec(&snapshot).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Persist {
            path: self.path.clone(),
            reason: e.error.to_string(),
        })?;

        debug!(
            path = %self.path.display(),
            entities = snapshot.len(),
            bytes = bytes.len(),
            "store saved"
        );
        Ok(())
    }

    fn objects(&self) -> &EntityMap {
        &self.objects
    }

    fn objects_mut(&mut self) -> &mut EntityMap {
        &mut self.objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> (tempfile::TempDir, FileStorage) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::new(dir.path().join("file.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_loads_empty() {
        let (_dir, mut store) = temp_store();
        assert_eq!(store.load().unwrap(), LoadReport::default());
        assert_eq!(store.count(None), 0);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let (_dir, mut store) = temp_store();
        let mut user = Entity::new(EntityKind::User);
        user.set_attribute("first_name", "Betty").unwrap();
        user.set_attribute("age", 89).unwrap();
        user.set_attribute("verified", true).unwrap();
        let city = Entity::new(EntityKind::City);
        store.insert(user.clone());
        store.insert(city.clone());
        store.save().unwrap();

        let (reloaded, report) = FileStorage::open(store.path()).unwrap();
        assert_eq!(report, LoadReport { loaded: 2, skipped: 0 });

        let back = reloaded.get(EntityKind::User, user.id()).expect("user reloaded");
        assert_eq!(back.created_at(), user.created_at());
        assert_eq!(back.updated_at(), user.updated_at());
        assert_eq!(back.attributes(), user.attributes());
        assert!(reloaded.get(EntityKind::City, city.id()).is_some());
    }

    #[test]
    fn file_is_keyed_by_composite_key() {
        let (_dir, mut store) = temp_store();
        let state = Entity::new(EntityKind::State);
        store.insert(state.clone());
        store.save().unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        let record = &doc[format!("State.{}", state.id())];
        assert_eq!(record["__class__"], json!("State"));
        assert_eq!(record["id"], json!(state.id()));
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let (_dir, mut store) = temp_store();
        let amenity = Entity::new(EntityKind::Amenity);
        let id = amenity.id().to_string();
        store.insert(amenity);
        store.save().unwrap();
        store.delete(EntityKind::Amenity, &id);
        store.save().unwrap();

        let (reloaded, _) = FileStorage::open(store.path()).unwrap();
        assert_eq!(reloaded.count(None), 0);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let (_dir, mut store) = temp_store();
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn non_object_document_is_an_error() {
        let (_dir, mut store) = temp_store();
        fs::write(store.path(), "[1, 2, 3]").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn record_with_bad_timestamp_is_an_error() {
        let (_dir, mut store) = temp_store();
        let doc = json!({
            "User.1": {
                "__class__": "User", "id": "1",
                "created_at": "not-a-date", "updated_at": "not-a-date"
            }
        });
        fs::write(store.path(), doc.to_string()).unwrap();
        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn empty_file_loads_empty() {
        let (_dir, mut store) = temp_store();
        fs::write(store.path(), "").unwrap();
        assert_eq!(store.load().unwrap(), LoadReport::default());
    }

    #[test]
    fn unknown_kind_is_skipped() {
        let (_dir, mut store) = temp_store();
        let doc = json!({
            "Ghost.1": {
                "__class__": "Ghost", "id": "1",
                "created_at": "2020-01-01T00:00:00.000000",
                "updated_at": "2020-01-01T00:00:00.000000"
            },
            "NoClass.2": {"id": "2"},
            "City.3": {
                "__class__": "City", "id": "3",
                "created_at": "2020-01-01T00:00:00.000000",
                "updated_at": "2020-01-02T00:00:00.000000",
                "name": "Oakland"
            }
        });
        fs::write(store.path(), doc.to_string()).unwrap();

        let report = store.load().unwrap();
        assert_eq!(report, LoadReport { loaded: 1, skipped: 2 });
        let city = store.get(EntityKind::City, "3").unwrap();
        assert_eq!(city.attribute("name"), Some(json!("Oakland")));
    }

    #[test]
    fn rekeyed_collision_counts_dropped_record() {
        let (_dir, mut store) = temp_store();
        let record = |name: &str| {
            json!({
                "__class__": "City", "id": "7",
                "created_at": "2020-01-01T00:00:00.000000",
                "updated_at": "2020-01-01T00:00:00.000000",
                "name": name
            })
        };
        let doc = json!({ "City.7": record("Oakland"), "City.old": record("Berkeley") });
        fs::write(store.path(), doc.to_string()).unwrap();

        let report = store.load().unwrap();
        assert_eq!(report, LoadReport { loaded: 1, skipped: 1 });
        assert_eq!(store.count(None), 1);
        assert!(store.get(EntityKind::City, "7").is_some());
    }

    #[test]
    fn failed_load_keeps_current_map() {
        let (_dir, mut store) = temp_store();
        store.insert(Entity::new(EntityKind::Review));
        fs::write(store.path(), "garbage").unwrap();
        assert!(store.load().is_err());
        assert_eq!(store.count(None), 1);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("file.json");
        let mut store = FileStorage::new(&path);
        store.insert(Entity::new(EntityKind::Place));
        store.save().unwrap();
        assert!(path.exists());
    }
}
