//! End-to-end tests for named stores.

use roster_engine::{Entity, EntityId, ManualClock, SortOptions, WrappedEntity};
use roster_store::{define_store, EntityStore, StoreRegistry};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_engine=debug,roster_store=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn task(id: i64, title: &str, priority: i64) -> Entity {
    Entity::from_json(json!({"id": id, "title": title, "priority": priority, "done": false}))
        .unwrap()
}

#[derive(Debug, Default)]
struct Board {
    archived: u32,
}

/// User-defined actions layered on top of the engine's.
trait BoardActions {
    fn archive_done(&mut self) -> usize;
}

impl BoardActions for EntityStore<Board> {
    fn archive_done(&mut self) -> usize {
        let is_done = |e: &WrappedEntity| e["done"] == true;
        let done: Vec<EntityId> = self
            .getters()
            .get_where(Some(&is_done))
            .into_keys()
            .collect();

        self.mutate(|actions| actions.delete_many(&done));
        self.extension_mut().archived += done.len() as u32;
        done.len()
    }
}

#[test]
fn task_board_flow() {
    init_tracing();

    let changes = Rc::new(Cell::new(0u32));
    let mut board = EntityStore::with_extension("tasks", Board::default())
        .with_clock(ManualClock::new(1_000));

    let counter = Rc::clone(&changes);
    board.subscribe(move |_| counter.set(counter.get() + 1));

    board.mutate(|actions| {
        actions.create_many(vec![
            task(1, "Write docs", 2),
            task(2, "Fix bug", 1),
            task(3, "Release", 3),
        ]);
    });

    // Edit a draft before committing it.
    board.mutate(|actions| {
        actions.set_current(task(4, "Draft", 5));
        actions.update_current_field("title", "Ship it");
    });
    let draft = board.getters().get_current().unwrap();
    assert!(draft.is_dirty());
    assert_eq!(draft["title"], json!("Ship it"));
    assert!(draft.meta().changed_fields().contains("title"));
    assert!(!board.getters().is_already_in_store(&EntityId::from(4)));

    board.mutate(|actions| {
        actions.update_field("done", true, &EntityId::from(2));
        actions.set_active(&EntityId::from(2));
        actions.set_active(&EntityId::from(3));
    });
    assert!(board.getters().is_dirty(&EntityId::from(2)));

    assert_eq!(board.archive_done(), 1);
    assert_eq!(board.extension().archived, 1);
    assert_eq!(board.getters().get_active(), &[EntityId::from(3)]);

    let by_priority = board
        .getters()
        .get_where_array(None, &SortOptions::by_field("priority").descending());
    let titles: Vec<_> = by_priority.iter().map(|e| e["title"].clone()).collect();
    assert_eq!(titles, vec![json!("Release"), json!("Write docs")]);

    assert_eq!(changes.get(), 4);
    assert_eq!(board.revision(), 4);
}

#[test]
fn registry_of_collections() {
    init_tracing();

    let mut registry: StoreRegistry = StoreRegistry::new();
    registry.register(define_store("users")).unwrap();
    assert!(registry.register(define_store("users")).is_err());

    registry.get_or_define("teams").mutate(|actions| {
        actions.create_one(Entity::from_json(json!({"id": "core", "size": 4})).unwrap());
    });

    let teams = registry.get("teams").unwrap();
    assert_eq!(teams.getters().search("CORE").len(), 1);
    assert!(registry.get("users").unwrap().getters().get_is_empty());
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["teams", "users"]);
}
