//! The query set.
//!
//! [`Getters`] borrows a [`State`] immutably. Nothing here fails: absence is
//! `None`, `false` or an empty collection, and a missing predicate matches
//! everything.

use crate::{sort::sort_entities, Entity, EntityId, SortOptions, State, WrappedEntity};
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// A filter over wrapped entities.
pub type Predicate<'p> = &'p dyn Fn(&WrappedEntity) -> bool;

/// Read-only queries over one collection's state.
#[derive(Debug, Clone, Copy)]
pub struct Getters<'a> {
    state: &'a State,
}

/// Bind the query set to `state`.
pub fn create_getters(state: &State) -> Getters<'_> {
    Getters::new(state)
}

impl<'a> Getters<'a> {
    pub fn new(state: &'a State) -> Self {
        Self { state }
    }

    pub fn get_one(&self, id: &EntityId) -> Option<&'a WrappedEntity> {
        self.state.by_id.get(id)
    }

    /// Entities for `ids`, in request order. Unknown ids are left out.
    pub fn get_many(&self, ids: &[EntityId]) -> Vec<&'a WrappedEntity> {
        ids.iter().filter_map(|id| self.get_one(id)).collect()
    }

    pub fn get_all(&self) -> &'a HashMap<EntityId, WrappedEntity> {
        &self.state.by_id
    }

    /// All entities in id-list order.
    pub fn get_all_array(&self) -> Vec<&'a WrappedEntity> {
        self.iter().collect()
    }

    pub fn get_all_ids(&self) -> &'a [EntityId] {
        &self.state.all_ids
    }

    pub fn get_current(&self) -> Option<&'a WrappedEntity> {
        self.state.current.as_ref()
    }

    /// The stored entity `current_by_id` points at.
    pub fn get_current_by_id(&self) -> Option<&'a WrappedEntity> {
        self.state
            .current_by_id
            .as_ref()
            .and_then(|id| self.get_one(id))
    }

    /// The active ids, unresolved.
    pub fn get_active(&self) -> &'a [EntityId] {
        &self.state.active
    }

    pub fn get_first_active(&self) -> Option<&'a EntityId> {
        self.state.active.first()
    }

    pub fn is_already_in_store(&self, id: &EntityId) -> bool {
        self.state.by_id.contains_key(id)
    }

    pub fn is_already_active(&self, id: &EntityId) -> bool {
        self.state.active.contains(id)
    }

    /// Dirty flag of `id`, `false` if it is not stored.
    pub fn is_dirty(&self, id: &EntityId) -> bool {
        self.get_one(id).is_some_and(WrappedEntity::is_dirty)
    }

    pub fn get_is_empty(&self) -> bool {
        self.state.all_ids.is_empty()
    }

    pub fn get_is_not_empty(&self) -> bool {
        !self.get_is_empty()
    }

    pub fn len(&self) -> usize {
        self.state.all_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.get_is_empty()
    }

    /// Entities in id-list order.
    pub fn iter(&self) -> impl Iterator<Item = &'a WrappedEntity> + 'a {
        let state = self.state;
        state.all_ids.iter().filter_map(move |id| state.by_id.get(id))
    }

    /// Requested ids that are not stored.
    ///
    /// Repeated ids are reported once (at their first position) unless
    /// `can_have_duplicates` is set, in which case every occurrence is kept.
    pub fn get_missing_ids(
        &self,
        ids: &[EntityId],
        can_have_duplicates: bool,
    ) -> Vec<EntityId> {
        let missing = ids.iter().filter(|id| !self.is_already_in_store(id));

        if can_have_duplicates {
            return missing.cloned().collect();
        }

        let mut seen = HashSet::new();
        missing.filter(|id| seen.insert(*id)).cloned().collect()
    }

    /// Input entities whose identifier is not stored.
    ///
    /// An entity without a valid identifier can never be stored, so it
    /// counts as missing.
    pub fn get_missing_entities<'e>(&self, entities: &'e [Entity]) -> Vec<&'e Entity> {
        let id_field = self.state.id_field();
        entities
            .iter()
            .filter(|entity| {
                entity
                    .id(id_field)
                    .map_or(true, |id| !self.is_already_in_store(&id))
            })
            .collect()
    }

    /// Matching entities keyed by id. `None` matches everything.
    ///
    /// A map has no order, so this takes no sort options; use
    /// [`get_where_array`](Self::get_where_array) for ordered results.
    pub fn get_where(
        &self,
        predicate: Option<Predicate<'_>>,
    ) -> HashMap<EntityId, &'a WrappedEntity> {
        let id_field = self.state.id_field();
        self.filtered(predicate)
            .filter_map(|entity| entity.id(id_field).map(|id| (id, entity)))
            .collect()
    }

    /// Matching entities in id-list order, then sorted by `options`.
    pub fn get_where_array(
        &self,
        predicate: Option<Predicate<'_>>,
        options: &SortOptions,
    ) -> Vec<&'a WrappedEntity> {
        let matches: Vec<_> = self.filtered(predicate).collect();
        sort_entities(matches, options)
    }

    /// First match in id-list order. `None` yields the first entity.
    pub fn get_first_where(
        &self,
        predicate: Option<Predicate<'_>>,
    ) -> Option<&'a WrappedEntity> {
        self.filtered(predicate).next()
    }

    /// Entities with at least one string field matching `query`.
    ///
    /// `query` is a case-insensitive regular expression; a query that does
    /// not compile as one is matched as a literal substring. Case folding
    /// follows Unicode simple case folding.
    pub fn search(&self, query: &str) -> Vec<&'a WrappedEntity> {
        let Some(pattern) = search_pattern(query) else {
            return Vec::new();
        };

        self.iter()
            .filter(|entity| {
                entity
                    .fields()
                    .values()
                    .any(|value| matches!(value, Value::String(s) if pattern.is_match(s)))
            })
            .collect()
    }

    fn filtered<'p>(
        &self,
        predicate: Option<Predicate<'p>>,
    ) -> impl Iterator<Item = &'a WrappedEntity> + 'p
    where
        'a: 'p,
    {
        self.iter()
            .filter(move |entity| predicate.map_or(true, |matches| matches(*entity)))
    }
}

fn search_pattern(query: &str) -> Option<Regex> {
    let build = |pattern: &str| RegexBuilder::new(pattern).case_insensitive(true).build();

    match build(query) {
        Ok(pattern) => Some(pattern),
        Err(_) => match build(regex::escape(query).as_str()) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                tracing::warn!(%query, error = %err, "unusable search query");
                None
            }
        },
    }
}
