use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;
use crate::kind::EntityKind;

/// Composite store key: an entity kind paired with an id.
///
/// Rendered as `Kind.id`. Two entities of different kinds may share an id;
/// their keys still differ.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.id)
    }
}

impl FromStr for EntityKey {
    type Err = TypeError;

    /// Split at the first `.`; the id may itself contain dots.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once('.')
            .ok_or_else(|| TypeError::InvalidKey(s.to_string()))?;
        if id.is_empty() {
            return Err(TypeError::InvalidKey(s.to_string()));
        }
        Ok(Self::new(kind.parse()?, id))
    }
}
