//! Entity model for the HBnB object store.
//!
//! This crate defines the closed set of entity kinds, the composite key used
//! to address entities in a store, and the timestamped [`Entity`] record
//! itself. Both the store and the console depend on `hbnb-types`.
//!
//! # Key Types
//!
//! - [`EntityKind`] -- Closed registry of entity kinds (`BaseModel`, `User`, ...)
//! - [`EntityKey`] -- Composite `Kind.id` key, unique within a store
//! - [`Entity`] -- Identified, timestamped record with free-form attributes
//! - [`TypeError`] -- Errors from parsing kinds/keys and mutating entities

pub mod entity;
pub mod error;
pub mod key;
pub mod kind;
pub mod timestamp;

pub use entity::{Entity, RESERVED_ATTRIBUTES, TYPE_FIELD};
pub use error::TypeError;
pub use key::EntityKey;
pub use kind::EntityKind;
