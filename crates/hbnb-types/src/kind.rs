use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;

/// The kind of an entity.
///
/// The set is closed: every record in a store carries one of these as its
/// discriminator, and reconstruction from persisted data dispatches on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// Abstract base kind. Loadable and addressable, never created by the console.
    BaseModel,
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

/// Default value declared for a schema attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeDefault {
    Text,
    Integer,
    Float,
    List,
}

impl AttributeDefault {
    /// The JSON value an unset attribute reads as.
    pub fn value(&self) -> Value {
        match self {
            Self::Text => Value::String(String::new()),
            Self::Integer => Value::from(0),
            Self::Float => Value::from(0.0),
            Self::List => Value::Array(Vec::new()),
        }
    }
}

const USER_SCHEMA: &[(&str, AttributeDefault)] = &[
    ("email", AttributeDefault::Text),
    ("password", AttributeDefault::Text),
    ("first_name", AttributeDefault::Text),
    ("last_name", AttributeDefault::Text),
];

const STATE_SCHEMA: &[(&str, AttributeDefault)] = &[("name", AttributeDefault::Text)];

const CITY_SCHEMA: &[(&str, AttributeDefault)] = &[
    ("state_id", AttributeDefault::Text),
    ("name", AttributeDefault::Text),
];

const AMENITY_SCHEMA: &[(&str, AttributeDefault)] = &[("name", AttributeDefault::Text)];

const PLACE_SCHEMA: &[(&str, AttributeDefault)] = &[
    ("city_id", AttributeDefault::Text),
    ("user_id", AttributeDefault::Text),
    ("name", AttributeDefault::Text),
    ("description", AttributeDefault::Text),
    ("number_rooms", AttributeDefault::Integer),
    ("number_bathrooms", AttributeDefault::Integer),
    ("max_guest", AttributeDefault::Integer),
    ("price_by_night", AttributeDefault::Integer),
    ("latitude", AttributeDefault::Float),
    ("longitude", AttributeDefault::Float),
    ("amenity_ids", AttributeDefault::List),
];

const REVIEW_SCHEMA: &[(&str, AttributeDefault)] = &[
    ("place_id", AttributeDefault::Text),
    ("user_id", AttributeDefault::Text),
    ("text", AttributeDefault::Text),
];

impl EntityKind {
    /// Every kind, in registry order.
    pub const ALL: [EntityKind; 7] = [
        Self::BaseModel,
        Self::User,
        Self::State,
        Self::City,
        Self::Amenity,
        Self::Place,
        Self::Review,
    ];

    /// The kind's name as it appears in keys and the `__class__` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BaseModel => "BaseModel",
            Self::User => "User",
            Self::State => "State",
            Self::City => "City",
            Self::Amenity => "Amenity",
            Self::Place => "Place",
            Self::Review => "Review",
        }
    }

    /// Whether new instances of this kind may be created interactively.
    pub fn is_instantiable(&self) -> bool {
        !matches!(self, Self::BaseModel)
    }

    /// Declared attributes of this kind and their defaults.
    pub fn schema(&self) -> &'static [(&'static str, AttributeDefault)] {
        match self {
            Self::BaseModel => &[],
            Self::User => USER_SCHEMA,
            Self::State => STATE_SCHEMA,
            Self::City => CITY_SCHEMA,
            Self::Amenity => AMENITY_SCHEMA,
            Self::Place => PLACE_SCHEMA,
            Self::Review => REVIEW_SCHEMA,
        }
    }

    /// Default for a declared attribute, or `None` if the kind doesn't declare it.
    pub fn default_for(&self, attribute: &str) -> Option<Value> {
        self.schema()
            .iter()
            .find(|(name, _)| *name == attribute)
            .map(|(_, default)| default.value())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TypeError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_every_kind() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(
            "user".parse::<EntityKind>(),
            Err(TypeError::UnknownKind("user".into()))
        );
        assert!("".parse::<EntityKind>().is_err());
        assert!("MyModel".parse::<EntityKind>().is_err());
    }

    #[test]
    fn only_base_model_is_abstract() {
        let abstract_kinds: Vec<_> = EntityKind::ALL
            .into_iter()
            .filter(|k| !k.is_instantiable())
            .collect();
        assert_eq!(abstract_kinds, vec![EntityKind::BaseModel]);
    }

    #[test]
    fn schema_defaults() {
        assert_eq!(EntityKind::User.default_for("email"), Some(Value::from("")));
        assert_eq!(EntityKind::Place.default_for("max_guest"), Some(Value::from(0)));
        assert_eq!(EntityKind::Place.default_for("latitude"), Some(Value::from(0.0)));
        assert_eq!(
            EntityKind::Place.default_for("amenity_ids"),
            Some(Value::Array(vec![]))
        );
        assert_eq!(EntityKind::State.default_for("email"), None);
        assert!(EntityKind::BaseModel.schema().is_empty());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(EntityKind::Review.to_string(), "Review");
    }
}
