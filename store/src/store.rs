//! A named, observable collection.

use crate::error::Result;
use roster_engine::{
    create_state_with, Actions, Clock, CollectionConfig, Getters, State, SystemClock,
};
use serde::Serialize;
use std::fmt;

/// Handle returned by [`EntityStore::subscribe`].
pub type SubscriptionId = u64;

/// Notification sent to subscribers after every [`EntityStore::mutate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreEvent<'a> {
    /// Name of the store that changed
    pub store: &'a str,
    /// Store revision after the change
    pub revision: u64,
}

type Subscriber = Box<dyn FnMut(&StoreEvent<'_>)>;

/// One named collection plus user extension state.
///
/// Reads go through [`getters`](Self::getters); writes go through
/// [`mutate`](Self::mutate), which is the only path to the engine's
/// action set and the point where subscribers are notified. Extension
/// getters and actions are ordinary methods the user writes against `X`
/// or against the store itself.
pub struct EntityStore<X = ()> {
    name: String,
    state: State,
    extension: X,
    clock: Box<dyn Clock>,
    revision: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: SubscriptionId,
}

/// Define a store with no extension state and the default configuration.
pub fn define_store(name: impl Into<String>) -> EntityStore {
    EntityStore::with_extension(name, ())
}

impl<X> EntityStore<X> {
    /// Define a store carrying `extension` as extra state.
    pub fn with_extension(name: impl Into<String>, extension: X) -> Self {
        Self::build(name.into(), CollectionConfig::default(), extension)
    }

    /// Define a store with a custom collection config.
    pub fn with_config(
        name: impl Into<String>,
        config: CollectionConfig,
        extension: X,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(name.into(), config, extension))
    }

    fn build(name: String, config: CollectionConfig, extension: X) -> Self {
        tracing::debug!(store = %name, id_field = %config.id_field, "defining store");
        Self {
            name,
            state: create_state_with(config),
            extension,
            clock: Box::new(SystemClock),
            revision: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Replace the clock used to stamp entity metadata.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of completed [`mutate`](Self::mutate) calls.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn getters(&self) -> Getters<'_> {
        Getters::new(&self.state)
    }

    pub fn extension(&self) -> &X {
        &self.extension
    }

    pub fn extension_mut(&mut self) -> &mut X {
        &mut self.extension
    }

    /// Run `f` against the action set, then bump the revision and notify
    /// subscribers.
    pub fn mutate<R>(&mut self, f: impl FnOnce(&mut Actions<'_>) -> R) -> R {
        let result = {
            let mut actions = Actions::with_clock(&mut self.state, &*self.clock);
            f(&mut actions)
        };

        self.revision += 1;
        self.notify();
        result
    }

    /// Register a callback invoked after every mutation.
    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&StoreEvent<'_>) + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        tracing::debug!(store = %self.name, subscription = id, "subscribed");
        id
    }

    /// Remove a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        before != self.subscribers.len()
    }

    /// The state as JSON, for inspection.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(&self.state)
            .map_err(roster_engine::Error::from)
            .map_err(Into::into)
    }

    fn notify(&mut self) {
        let event = StoreEvent {
            store: &self.name,
            revision: self.revision,
        };
        tracing::trace!(
            store = %self.name,
            revision = self.revision,
            subscribers = self.subscribers.len(),
            "notifying subscribers"
        );
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&event);
        }
    }
}

impl<X: fmt::Debug> fmt::Debug for EntityStore<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("extension", &self.extension)
            .field("revision", &self.revision)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;
    use roster_engine::{Entity, EntityId, ManualClock, WrappedEntity};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn todo(id: i64, title: &str, done: bool) -> Entity {
        Entity::from_json(json!({"id": id, "title": title, "done": done})).unwrap()
    }

    #[derive(Debug, Default)]
    struct TodoExtension {
        show_done: bool,
    }

    trait TodoQueries {
        fn visible(&self) -> Vec<&WrappedEntity>;
    }

    impl TodoQueries for EntityStore<TodoExtension> {
        fn visible(&self) -> Vec<&WrappedEntity> {
            let show_done = self.extension().show_done;
            let keep = move |e: &WrappedEntity| show_done || e["done"] == false;
            self.getters().get_where_array(Some(&keep), &Default::default())
        }
    }

    #[test]
    fn define_and_mutate() {
        let mut store = define_store("todos");
        assert_eq!(store.name(), "todos");
        assert_eq!(store.revision(), 0);
        assert!(store.getters().get_is_empty());

        store.mutate(|actions| actions.create_one(todo(1, "write", false)));

        assert_eq!(store.revision(), 1);
        assert!(store.getters().is_already_in_store(&EntityId::from(1)));
    }

    #[test]
    fn mutate_returns_closure_result() {
        let mut store = define_store("todos");
        let count = store.mutate(|actions| {
            actions.create_many(vec![todo(1, "a", false), todo(2, "b", true)]);
            actions.getters().len()
        });
        assert_eq!(count, 2);
    }

    #[test]
    fn subscribers_see_every_mutation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = define_store("todos");

        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |event| {
            sink.borrow_mut().push((event.store.to_string(), event.revision));
        });

        store.mutate(|actions| actions.create_one(todo(1, "a", false)));
        store.mutate(|actions| actions.set_active(&EntityId::from(1)));

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.mutate(|actions| actions.reset_active());

        assert_eq!(
            *seen.borrow(),
            vec![("todos".to_string(), 1), ("todos".to_string(), 2)]
        );
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn extension_state_and_queries() {
        let mut store = EntityStore::with_extension("todos", TodoExtension::default());
        store.mutate(|actions| {
            actions.create_many(vec![todo(1, "a", false), todo(2, "b", true)]);
        });

        assert_eq!(store.visible().len(), 1);
        store.extension_mut().show_done = true;
        assert_eq!(store.visible().len(), 2);
    }

    #[test]
    fn custom_config() {
        let config = CollectionConfig::default().with_id_field("key");
        let mut store = EntityStore::with_config("things", config, ()).unwrap();
        store.mutate(|actions| {
            actions.create_one(Entity::from_json(json!({"key": "k1"})).unwrap());
        });

        assert!(store.getters().is_already_in_store(&EntityId::from("k1")));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = CollectionConfig::default().with_id_field("");
        let result = EntityStore::with_config("things", config, ());
        assert!(matches!(result, Err(StoreError::Engine(_))));
    }

    #[test]
    fn custom_clock() {
        let mut store = define_store("todos").with_clock(ManualClock::new(1234));
        store.mutate(|actions| actions.create_one(todo(1, "a", false)));

        let stored = store.getters().get_one(&EntityId::from(1)).unwrap();
        assert_eq!(stored.meta().created_at(), 1234);
    }

    #[test]
    fn state_as_json() {
        let mut store = define_store("todos").with_clock(ManualClock::new(1));
        store.mutate(|actions| actions.create_one(todo(1, "a", false)));

        let value = store.to_json().unwrap();
        assert_eq!(value["allIds"], json!([1]));
        assert_eq!(value["byId"]["1"]["title"], json!("a"));
        assert_eq!(value["byId"]["1"]["isDirty"], json!(false));
    }

    #[test]
    fn debug_output() {
        let store = define_store("todos");
        let debug = format!("{store:?}");
        assert!(debug.contains("todos"));
        assert!(debug.contains("subscribers: 0"));
    }
}
