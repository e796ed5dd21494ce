use std::collections::HashMap;

use hbnb_types::{Entity, EntityKey, EntityKind};

/// The canonical `Kind.id -> Entity` mapping shared by every backend.
#[derive(Clone, Debug, Default)]
pub struct EntityMap {
    entries: HashMap<EntityKey, Entity>,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Insert under the entity's own key, returning whatever was there.
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        self.entries.insert(entity.key(), entity)
    }

    pub fn get(&self, kind: EntityKind, id: &str) -> Option<&Entity> {
        self.entries.get(&EntityKey::new(kind, id))
    }

    pub fn get_mut(&mut self, kind: EntityKind, id: &str) -> Option<&mut Entity> {
        self.entries.get_mut(&EntityKey::new(kind, id))
    }

    pub fn remove(&mut self, kind: EntityKind, id: &str) -> Option<Entity> {
        self.entries.remove(&EntityKey::new(kind, id))
    }

    /// Entities matching the optional kind filter, sorted by key.
    pub fn filtered(&self, kind: Option<EntityKind>) -> Vec<&Entity> {
        let mut matching: Vec<(&EntityKey, &Entity)> = self
            .entries
            .iter()
            .filter(|(key, _)| kind.map_or(true, |k| key.kind == k))
            .collect();
        matching.sort_by(|a, b| a.0.cmp(b.0));
        matching.into_iter().map(|(_, entity)| entity).collect()
    }

    pub fn count(&self, kind: Option<EntityKind>) -> usize {
        match kind {
            None => self.entries.len(),
            Some(k) => self.entries.keys().filter(|key| key.kind == k).count(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityKey, &Entity)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut map = EntityMap::new();
        let user = Entity::new(EntityKind::User);
        let id = user.id().to_string();
        assert!(map.insert(user).is_none());
        assert!(map.get(EntityKind::User, &id).is_some());
        assert!(map.get(EntityKind::City, &id).is_none());
    }

    #[test]
    fn insert_same_key_overwrites() {
        let mut map = EntityMap::new();
        let mut user = Entity::new(EntityKind::User);
        map.insert(user.clone());
        user.set_attribute("email", "a@b.c").unwrap();
        let previous = map.insert(user).expect("previous entry");
        assert!(previous.attributes().is_empty());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn filtered_is_sorted_and_scoped() {
        let mut map = EntityMap::new();
        for kind in [EntityKind::City, EntityKind::User, EntityKind::City] {
            map.insert(Entity::new(kind));
        }
        let cities = map.filtered(Some(EntityKind::City));
        assert_eq!(cities.len(), 2);
        assert!(cities.iter().all(|e| e.kind() == EntityKind::City));
        assert!(cities[0].id() < cities[1].id());

        let everything = map.filtered(None);
        assert_eq!(everything.len(), 3);
        assert_eq!(everything[0].kind(), EntityKind::User);
    }

    #[test]
    fn count_matches_filtered() {
        let mut map = EntityMap::new();
        map.insert(Entity::new(EntityKind::Amenity));
        map.insert(Entity::new(EntityKind::Review));
        for filter in [None, Some(EntityKind::Amenity), Some(EntityKind::State)] {
            assert_eq!(map.count(filter), map.filtered(filter).len());
        }
    }

    #[test]
    fn remove_missing_is_none() {
        let mut map = EntityMap::new();
        assert!(map.remove(EntityKind::User, "nope").is_none());
    }
}
