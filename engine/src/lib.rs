//! # Roster Engine
//!
//! Normalized, in-memory entity collections with dirty tracking, selection
//! and queries.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine knows nothing about files, network or platform
//! - **Never fails on absence**: a missing id is `None`, `false` or a no-op
//! - **Single owner**: actions borrow the state mutably, getters immutably
//! - **Deterministic when asked**: timestamps come from a pluggable [`Clock`]
//!
//! ## Core Concepts
//!
//! ### State
//!
//! A [`State`] holds one collection:
//! - `byId` - identifier to wrapped entity
//! - `allIds` - identifiers in insertion order
//! - `current` - a free-standing snapshot (may be a draft not in the store)
//! - `currentById` - a pointer into `byId`
//! - `active` - a multi-selection of identifiers
//!
//! ### Wrapped entities
//!
//! [`wrap`] turns an [`Entity`] into a [`WrappedEntity`]. Every write goes
//! through [`WrappedEntity::set`], which marks the entity dirty, records the
//! changed field and stamps `updatedAt` when the value actually changes.
//!
//! ### Actions and getters
//!
//! - [`Actions`] - create, update (upsert), delete, select and dirty-flag
//! - [`Getters`] - lookups, filters, missing-id detection, sorting, search
//!
//! ## Quick Start
//!
//! ```rust
//! use roster_engine::{
//!     create_actions, create_getters, create_state, Entity, EntityId, SortOptions,
//!     WrappedEntity,
//! };
//! use serde_json::json;
//!
//! // 1. Create a state
//! let mut state = create_state();
//!
//! // 2. Mutate it through actions
//! let mut actions = create_actions(&mut state);
//! actions.create_many(vec![
//!     Entity::from_json(json!({"id": 1, "name": "Alice", "age": 30})).unwrap(),
//!     Entity::from_json(json!({"id": 2, "name": "Bob", "age": 25})).unwrap(),
//! ]);
//! actions.update_field("age", 31, &EntityId::from(1));
//!
//! // 3. Query it through getters
//! let getters = create_getters(&state);
//! assert!(getters.is_dirty(&EntityId::from(1)));
//!
//! let adults = |e: &WrappedEntity| e["age"].as_i64().unwrap_or(0) >= 18;
//! let sorted = getters.get_where_array(Some(&adults), &SortOptions::by_field("age"));
//! assert_eq!(sorted[0]["name"], json!("Bob"));
//! ```

pub mod actions;
pub mod clock;
pub mod config;
pub mod entity;
pub mod error;
pub mod getters;
pub mod id;
pub mod sort;
pub mod state;
pub mod wrap;

// Re-export main types at crate root
pub use actions::{create_actions, Actions};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CollectionConfig, DEFAULT_ID_FIELD};
pub use entity::Entity;
pub use error::Error;
pub use getters::{create_getters, Getters, Predicate};
pub use id::EntityId;
pub use sort::{sort_entities, OrderBy, SortDirection, SortOptions};
pub use state::{create_state, create_state_with, State};
pub use wrap::{wrap, EntityMeta, WrappedEntity};

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;
