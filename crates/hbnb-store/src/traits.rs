use hbnb_types::{Entity, EntityKind};

use crate::error::StoreResult;
use crate::map::EntityMap;

/// Outcome of loading a durable snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records reconstructed into the map.
    pub loaded: usize,
    /// Records skipped because their kind could not be resolved.
    pub skipped: usize,
}

/// Keyed entity store with an explicit checkpoint.
///
/// Implementations provide the map and the durable side (`load`/`save`);
/// the lookup and mutation operations are shared. Invariants:
/// - A `Kind.id` key maps to at most one entity.
/// - `insert` and `delete` touch memory only. Nothing is durable until `save`.
/// - `load` replaces the in-memory map with the snapshot's contents.
pub trait ObjectStore {
    /// Replace the in-memory map with the durable snapshot.
    ///
    /// A missing snapshot yields an empty store. A snapshot that exists but
    /// cannot be decoded is an error.
    fn load(&mut self) -> StoreResult<LoadReport>;

    /// Write the whole map as the new durable snapshot.
    fn save(&self) -> StoreResult<()>;

    fn objects(&self) -> &EntityMap;

    fn objects_mut(&mut self) -> &mut EntityMap;

    /// Every entity, or only those of `kind`, sorted by key.
    fn all(&self, kind: Option<EntityKind>) -> Vec<&Entity> {
        self.objects().filtered(kind)
    }

    fn get(&self, kind: EntityKind, id: &str) -> Option<&Entity> {
        self.objects().get(kind, id)
    }

    fn get_mut(&mut self, kind: EntityKind, id: &str) -> Option<&mut Entity> {
        self.objects_mut().get_mut(kind, id)
    }

    /// Add or overwrite an entity under its own key.
    fn insert(&mut self, entity: Entity) {
        self.objects_mut().insert(entity);
    }

    /// Remove an entity. Returns `true` if it existed; absent keys are a no-op.
    fn delete(&mut self, kind: EntityKind, id: &str) -> bool {
        self.objects_mut().remove(kind, id).is_some()
    }

    fn count(&self, kind: Option<EntityKind>) -> usize {
        self.objects().count(kind)
    }
}
