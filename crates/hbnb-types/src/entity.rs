use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::TypeError;
use crate::key::EntityKey;
use crate::kind::EntityKind;
use crate::timestamp;

/// Name of the discriminator field in the persisted dictionary view.
pub const TYPE_FIELD: &str = "__class__";

/// Attribute names owned by the entity itself. Never writable through
/// [`Entity::set_attribute`].
pub const RESERVED_ATTRIBUTES: &[&str] = &["id", "created_at", "updated_at", "type_name", TYPE_FIELD];

/// An identified, timestamped record of some [`EntityKind`].
///
/// `Entity::new` is the only place ids and creation timestamps are minted.
/// Deserializing restores exactly what was persisted: the dictionary view is
/// `__class__`, `id`, `created_at`, `updated_at`, then every other attribute
/// at top level.
///
/// Equality and hashing go through the composite key, not the attributes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "__class__")]
    kind: EntityKind,
    id: String,
    #[serde(with = "timestamp")]
    created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    updated_at: DateTime<Utc>,
    #[serde(flatten)]
    attributes: BTreeMap<String, Value>,
}

impl Entity {
    /// Create a fresh entity with a random UUID and `created_at == updated_at`.
    pub fn new(kind: EntityKind) -> Self {
        let now = timestamp::now();
        Self {
            kind,
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            attributes: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.kind, self.id.clone())
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Attributes set on this entity, excluding the identity fields.
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Read an attribute, falling back to the kind's declared default.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes
            .get(name)
            .cloned()
            .or_else(|| self.kind.default_for(name))
    }

    pub fn is_reserved(name: &str) -> bool {
        RESERVED_ATTRIBUTES.contains(&name)
    }

    /// Set an attribute and refresh `updated_at`.
    ///
    /// Persisting the change is the caller's job.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<Value>) -> Result<(), TypeError> {
        if Self::is_reserved(name) {
            return Err(TypeError::ReservedAttribute(name.to_string()));
        }
        self.attributes.insert(name.to_string(), value.into());
        self.touch();
        Ok(())
    }

    /// Mark the entity as modified. `updated_at` strictly increases.
    pub fn touch(&mut self) {
        let now = timestamp::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.id == other.id
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.id.hash(state);
    }
}

/// `[Kind] (id) {id: ..., created_at: ..., updated_at: ..., attr: value}`
impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ({}) {{id: {}, created_at: {}, updated_at: {}",
            self.kind,
            self.id,
            self.id,
            timestamp::format(&self.created_at),
            timestamp::format(&self.updated_at),
        )?;
        for (name, value) in &self.attributes {
            match value {
                Value::String(text) => write!(f, ", {name}: {text}")?,
                other => write!(f, ", {name}: {other}")?,
            }
        }
        f.write_str("}")
    }
}
