//! The mutation set.
//!
//! [`Actions`] borrows a [`State`] mutably and is the only way to change it.
//! None of the operations fail: an unknown identifier is a silent no-op.

use crate::{
    clock::{Clock, SystemClock},
    Entity, EntityId, Getters, State, WrappedEntity,
};
use serde_json::Value;

/// Mutations over one collection's state.
pub struct Actions<'a> {
    state: &'a mut State,
    clock: &'a dyn Clock,
}

/// Bind the mutation set to `state`, stamping changes with the system time.
pub fn create_actions(state: &mut State) -> Actions<'_> {
    Actions::with_clock(state, &SystemClock)
}

impl<'a> Actions<'a> {
    /// Bind the mutation set to `state`, stamping changes with `clock`.
    pub fn with_clock(state: &'a mut State, clock: &'a dyn Clock) -> Self {
        Self { state, clock }
    }

    /// Read-only view of the state being mutated.
    pub fn state(&self) -> &State {
        &*self.state
    }

    /// Query the state being mutated.
    pub fn getters(&self) -> Getters<'_> {
        Getters::new(&*self.state)
    }

    /// Wrap `entity` and store it under its identifier.
    ///
    /// An existing entity with the same identifier is replaced, not merged,
    /// and keeps its position in the id list.
    pub fn create_one(&mut self, entity: Entity) {
        let Some(id) = entity.id(self.state.id_field()) else {
            tracing::warn!(
                id_field = %self.state.id_field(),
                "skipping entity without a valid identifier"
            );
            return;
        };

        let wrapped = WrappedEntity::wrap_at(entity, self.clock.now());
        if self.state.by_id.insert(id.clone(), wrapped).is_some() {
            tracing::debug!(%id, "replaced entity");
        } else {
            tracing::debug!(%id, "created entity");
            self.state.all_ids.push(id);
        }
    }

    /// [`create_one`](Self::create_one) for each entity, in order.
    pub fn create_many(&mut self, entities: impl IntoIterator<Item = Entity>) {
        for entity in entities {
            self.create_one(entity);
        }
    }

    /// Assign every field of `entity` onto the stored entity `id`.
    ///
    /// Fields not in the payload are left untouched; each assignment goes
    /// through dirty tracking. The identifier field is never reassigned.
    /// If `id` is not stored, the payload is created as a full entity.
    pub fn update_one(&mut self, id: &EntityId, entity: Entity) {
        let now = self.clock.now();
        let id_field = self.state.config.id_field.as_str();

        match self.state.by_id.get_mut(id) {
            Some(existing) => {
                let mut changed = 0usize;
                for (key, value) in entity {
                    if key == id_field {
                        continue;
                    }
                    if existing.set_at(key, value, now) {
                        changed += 1;
                    }
                }
                tracing::debug!(%id, changed, "updated entity");
            }
            None => {
                tracing::trace!(%id, "update target missing, creating");
                self.create_one(entity);
            }
        }
    }

    /// [`update_one`](Self::update_one) for each entity, keyed by its own identifier.
    pub fn update_many(&mut self, entities: impl IntoIterator<Item = Entity>) {
        for entity in entities {
            match entity.id(self.state.id_field()) {
                Some(id) => self.update_one(&id, entity),
                None => tracing::warn!(
                    id_field = %self.state.id_field(),
                    "skipping update without a valid identifier"
                ),
            }
        }
    }

    /// Remove `id` from the map, the id list and the active list.
    ///
    /// A `current_by_id` pointer at `id` is cleared as well. The `current`
    /// snapshot is left alone.
    pub fn delete_one(&mut self, id: &EntityId) {
        let removed = self.state.by_id.remove(id).is_some();
        self.state.all_ids.retain(|existing| existing != id);
        self.state.active.retain(|existing| existing != id);
        if self.state.current_by_id.as_ref() == Some(id) {
            self.state.current_by_id = None;
        }

        if removed {
            tracing::debug!(%id, "deleted entity");
        } else {
            tracing::trace!(%id, "delete target missing");
        }
    }

    /// [`delete_one`](Self::delete_one) for each id.
    pub fn delete_many(&mut self, ids: &[EntityId]) {
        for id in ids {
            self.delete_one(id);
        }
    }

    /// Wrap `entity` and make it the current snapshot, stored or not.
    pub fn set_current(&mut self, entity: Entity) {
        self.state.current = Some(WrappedEntity::wrap_at(entity, self.clock.now()));
    }

    /// Mutable access to the current snapshot.
    ///
    /// Writes through [`WrappedEntity::set`] are tracked like writes on a
    /// stored entity.
    pub fn current_mut(&mut self) -> Option<&mut WrappedEntity> {
        self.state.current.as_mut()
    }

    /// Assign a single field on the current snapshot, with dirty tracking.
    pub fn update_current_field(&mut self, field: &str, value: impl Into<Value>) {
        if field == self.state.config.id_field {
            tracing::trace!("refusing to reassign identifier field of current");
            return;
        }
        let now = self.clock.now();
        match self.state.current.as_mut() {
            Some(current) => {
                current.set_at(field, value, now);
            }
            None => tracing::trace!(field, "no current snapshot to update"),
        }
    }

    pub fn remove_current(&mut self) {
        self.state.current = None;
    }

    /// Point `current_by_id` at `id` if it is stored; otherwise do nothing.
    pub fn set_current_by_id(&mut self, id: &EntityId) {
        if self.state.by_id.contains_key(id) {
            self.state.current_by_id = Some(id.clone());
        } else {
            tracing::trace!(%id, "current_by_id target missing");
        }
    }

    pub fn remove_current_by_id(&mut self) {
        self.state.current_by_id = None;
    }

    /// Append `id` to the active list if it is stored and not active yet.
    ///
    /// This is a guarded append, not a toggle: a second call is a no-op.
    pub fn set_active(&mut self, id: &EntityId) {
        if !self.state.by_id.contains_key(id) {
            tracing::trace!(%id, "active target missing");
            return;
        }
        if !self.state.active.contains(id) {
            self.state.active.push(id.clone());
        }
    }

    pub fn reset_active(&mut self) {
        self.state.active.clear();
    }

    /// Raise the dirty flag of `id` without touching its metadata.
    pub fn set_is_dirty(&mut self, id: &EntityId) {
        if let Some(entity) = self.state.by_id.get_mut(id) {
            entity.mark_dirty();
        }
    }

    /// Clear the dirty flag of `id` along with its changed field set.
    pub fn set_is_not_dirty(&mut self, id: &EntityId) {
        if let Some(entity) = self.state.by_id.get_mut(id) {
            entity.mark_clean();
        }
    }

    /// Assign a single field on `id`, with dirty tracking.
    pub fn update_field(&mut self, field: &str, value: impl Into<Value>, id: &EntityId) {
        if field == self.state.config.id_field {
            tracing::trace!(%id, "refusing to reassign identifier field");
            return;
        }
        let now = self.clock.now();
        if let Some(entity) = self.state.by_id.get_mut(id) {
            entity.set_at(field, value, now);
        }
    }
}
