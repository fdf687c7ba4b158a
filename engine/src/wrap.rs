//! Entity wrapping and dirty tracking.
//!
//! A [`WrappedEntity`] owns the entity's fields and routes every write
//! through [`WrappedEntity::set`], which compares the new value with the
//! old one and records the change in the entity's metadata. Tracking lives
//! on the entity itself, so a write from anywhere (the action set, a
//! caller holding `current`, ...) is recorded the same way.

use crate::{
    clock::{Clock, SystemClock},
    error::Result,
    Entity, EntityId, Timestamp,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::ops::Index;

/// Name of the dirty flag in the serialized form.
pub const DIRTY_KEY: &str = "isDirty";
/// Name of the metadata object in the serialized form.
pub const META_KEY: &str = "meta";

static NULL: Value = Value::Null;

/// Whether `key` is one of the tracking keys that can never be an entity field.
pub fn is_reserved(key: &str) -> bool {
    key == DIRTY_KEY || key == META_KEY
}

/// Change-tracking metadata attached to a wrapped entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMeta {
    created_at: Timestamp,
    updated_at: Option<Timestamp>,
    changed_fields: BTreeSet<String>,
}

impl EntityMeta {
    fn new(created_at: Timestamp) -> Self {
        Self {
            created_at,
            updated_at: None,
            changed_fields: BTreeSet::new(),
        }
    }

    /// When the entity was wrapped.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// When a tracked field last changed, if ever.
    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    /// Fields changed since wrapping or the last [`WrappedEntity::mark_clean`].
    pub fn changed_fields(&self) -> &BTreeSet<String> {
        &self.changed_fields
    }
}

/// An entity plus its dirty flag and change metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedEntity {
    #[serde(flatten)]
    fields: Map<String, Value>,
    is_dirty: bool,
    meta: EntityMeta,
}

/// Wrap an entity, stamping it with the system time.
pub fn wrap(entity: Entity) -> WrappedEntity {
    WrappedEntity::wrap_at(entity, SystemClock.now())
}

impl WrappedEntity {
    /// Wrap an entity using `clock` for the creation time.
    pub fn wrap_with(entity: Entity, clock: &impl Clock) -> Self {
        Self::wrap_at(entity, clock.now())
    }

    /// Wrap an entity with an explicit creation time.
    ///
    /// Fields named like the tracking keys are dropped; the wrapper's own
    /// flag and metadata take their place.
    pub fn wrap_at(entity: Entity, created_at: Timestamp) -> Self {
        let mut fields = entity.into_fields();
        fields.remove(DIRTY_KEY);
        fields.remove(META_KEY);

        Self {
            fields,
            is_dirty: false,
            meta: EntityMeta::new(created_at),
        }
    }

    /// Write a field, stamping any change with the system time.
    ///
    /// Returns `true` if the write was recorded as a change.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        self.set_at(key, value, SystemClock.now())
    }

    /// Write a field, stamping any change with `timestamp`.
    ///
    /// - Tracking keys are refused (they are not fields).
    /// - An existing field set to a different value marks the entity dirty,
    ///   records the field name and bumps `updatedAt`.
    /// - An existing field set to an equal value is written without touching
    ///   the metadata.
    /// - A field that did not exist yet is added without tracking.
    pub fn set_at(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
        timestamp: Timestamp,
    ) -> bool {
        let key = key.into();
        let value = value.into();

        if is_reserved(&key) {
            tracing::trace!(field = %key, "refusing write to tracking key");
            return false;
        }

        match self.fields.get_mut(&key) {
            Some(slot) if *slot == value => {
                *slot = value;
                false
            }
            Some(slot) => {
                *slot = value;
                self.is_dirty = true;
                self.meta.updated_at = Some(timestamp);
                self.meta.changed_fields.insert(key);
                true
            }
            None => {
                self.fields.insert(key, value);
                false
            }
        }
    }

    /// Raise the dirty flag without touching the metadata.
    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    /// Clear the dirty flag together with the changed field set.
    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
        self.meta.changed_fields.clear();
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    /// Get a field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Read the identifier stored under `id_field`.
    pub fn id(&self, id_field: &str) -> Option<EntityId> {
        self.fields.get(id_field).and_then(EntityId::from_value)
    }

    /// The entity's own fields, without tracking data.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Copy the fields out as a plain entity.
    pub fn to_entity(&self) -> Entity {
        Entity::from(self.fields.clone())
    }

    /// Drop the tracking data and return the plain entity.
    pub fn into_entity(self) -> Entity {
        Entity::from(self.fields)
    }

    /// Convert the fields into a typed value.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T> {
        self.to_entity().to_typed()
    }
}

impl Index<&str> for WrappedEntity {
    type Output = Value;

    /// Missing fields read as `null`.
    fn index(&self, key: &str) -> &Value {
        self.fields.get(key).unwrap_or(&NULL)
    }
}
