use std::cell::Cell;

use crate::error::StoreResult;
use crate::map::EntityMap;
use crate::traits::{LoadReport, ObjectStore};

/// Store with no durable side.
///
/// Intended for tests and embedding. `load` keeps the current map, `save`
/// only counts how many times a checkpoint was requested.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    objects: EntityMap,
    saves: Cell<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save()` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl ObjectStore for InMemoryStore {
    fn load(&mut self) -> StoreResult<LoadReport> {
        Ok(LoadReport {
            loaded: self.objects.len(),
            skipped: 0,
        })
    }

    fn save(&self) -> StoreResult<()> {
        self.saves.set(self.saves.get() + 1);
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
    use hbnb_types::{Entity, EntityKind};

    #[test]
    fn starts_empty() {
        let mut store = InMemoryStore::new();
        assert_eq!(store.load().unwrap(), LoadReport::default());
        assert_eq!(store.count(None), 0);
        assert!(store.all(None).is_empty());
    }

    #[test]
    fn insert_does_not_save() {
        let mut store = InMemoryStore::new();
        store.insert(Entity::new(EntityKind::State));
        assert_eq!(store.count(None), 1);
        assert_eq!(store.save_count(), 0);
        store.save().unwrap();
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn delete_present_then_missing() {
        let mut store = InMemoryStore::new();
        let city = Entity::new(EntityKind::City);
        let id = city.id().to_string();
        store.insert(city);
        assert!(store.delete(EntityKind::City, &id));
        assert!(store.get(EntityKind::City, &id).is_none());
        assert!(!store.delete(EntityKind::City, &id));
        assert_eq!(store.count(None), 0);
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut store = InMemoryStore::new();
        let amenity = Entity::new(EntityKind::Amenity);
        let id = amenity.id().to_string();
        store.insert(amenity);
        store
            .get_mut(EntityKind::Amenity, &id)
            .unwrap()
            .set_attribute("name", "Wifi")
            .unwrap();
        let stored = store.get(EntityKind::Amenity, &id).unwrap();
        assert_eq!(stored.attribute("name"), Some("Wifi".into()));
    }

    #[test]
    fn same_id_under_two_kinds_is_two_entries() {
        let mut store = InMemoryStore::new();
        let user = Entity::new(EntityKind::User);
        let record = serde_json::json!({
            "__class__": "Place",
            "id": user.id(),
            "created_at": "2020-01-01T00:00:00.000000",
            "updated_at": "2020-01-01T00:00:00.000000",
        });
        let place: Entity = serde_json::from_value(record).unwrap();
        store.insert(user);
        store.insert(place);
        assert_eq!(store.count(None), 2);
        assert_eq!(store.count(Some(EntityKind::User)), 1);
        assert_eq!(store.count(Some(EntityKind::Place)), 1);
    }
}
