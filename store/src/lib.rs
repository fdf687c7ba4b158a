//! # Roster Store
//!
//! Named, observable stores on top of [`roster_engine`] collections.
//!
//! Each [`EntityStore`] owns one collection state plus user extension
//! state. Reads go through the engine's getters, writes through
//! [`EntityStore::mutate`], after which subscribers receive a
//! [`StoreEvent`]. A [`StoreRegistry`] keeps one store per name.
//!
//! ```rust
//! use roster_engine::{Entity, EntityId};
//! use roster_store::{define_store, StoreRegistry};
//! use serde_json::json;
//!
//! let mut registry = StoreRegistry::new();
//! let users = registry.register(define_store("users")).unwrap();
//!
//! users.subscribe(|event| println!("{} is now at revision {}", event.store, event.revision));
//! users.mutate(|actions| {
//!     actions.create_one(Entity::from_json(json!({"id": 1, "name": "Alice"})).unwrap());
//!     actions.set_active(&EntityId::from(1));
//! });
//!
//! let users = registry.get("users").unwrap();
//! assert_eq!(users.getters().get_first_active(), Some(&EntityId::from(1)));
//! ```

pub mod error;
pub mod registry;
pub mod store;

pub use error::{Result, StoreError};
pub use registry::StoreRegistry;
pub use store::{define_store, EntityStore, StoreEvent, SubscriptionId};
