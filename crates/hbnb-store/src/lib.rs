//! Object store for HBnB entities.
//!
//! The store owns every [`Entity`](hbnb_types::Entity) of a process, keyed by
//! its composite `Kind.id` key. The in-memory map is the source of truth; the
//! durable file is a checkpoint written wholesale on every `save()`.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`FileStorage`] -- JSON document on disk, replaced atomically on save
//! - [`InMemoryStore`] -- no durable side, for tests and embedding
//!
//! # Design Rules
//!
//! 1. Keys are unique; inserting under an existing key overwrites.
//! 2. `insert`/`delete` never flush. Persisting is the caller's decision.
//! 3. Loading never mints ids or timestamps; records come back exactly.
//! 4. A missing file is an empty store. A malformed file is an error.
//! 5. Records of an unknown kind are skipped with a warning, not fatal.

pub mod error;
pub mod file;
pub mod map;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileStorage;
pub use map::EntityMap;
pub use memory::InMemoryStore;
pub use traits::{LoadReport, ObjectStore};
