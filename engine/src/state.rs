//! The normalized state container.
//!
//! Entities live in a by-id map; a separate ordered id list records
//! insertion order. `current` is a free-standing snapshot, `current_by_id`
//! a pointer into the map, and `active` a multi-selection of ids.

use crate::{CollectionConfig, EntityId, WrappedEntity};
use serde::Serialize;
use std::collections::HashMap;

/// Normalized storage for one collection.
///
/// Fields are only readable from outside the crate; all mutation goes
/// through [`Actions`](crate::Actions).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub(crate) by_id: HashMap<EntityId, WrappedEntity>,
    pub(crate) all_ids: Vec<EntityId>,
    pub(crate) current: Option<WrappedEntity>,
    pub(crate) current_by_id: Option<EntityId>,
    pub(crate) active: Vec<EntityId>,
    #[serde(skip)]
    pub(crate) config: CollectionConfig,
}

/// Create an empty state with the default configuration.
pub fn create_state() -> State {
    State::default()
}

/// Create an empty state with `config`.
pub fn create_state_with(config: CollectionConfig) -> State {
    State {
        config,
        ..State::default()
    }
}

impl State {
    pub fn by_id(&self) -> &HashMap<EntityId, WrappedEntity> {
        &self.by_id
    }

    pub fn all_ids(&self) -> &[EntityId] {
        &self.all_ids
    }

    pub fn current(&self) -> Option<&WrappedEntity> {
        self.current.as_ref()
    }

    pub fn current_by_id(&self) -> Option<&EntityId> {
        self.current_by_id.as_ref()
    }

    pub fn active(&self) -> &[EntityId] {
        &self.active
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Name of the identifier field for this collection.
    pub fn id_field(&self) -> &str {
        &self.config.id_field
    }
}
