use besteats_core::db::open_db_in_memory;
use besteats_core::{
    Change, ChangeSet, EntityRef, Menu, ModelValidationError, Restaurant, RestaurantStore,
    SaveOutcome, SqliteRestaurantStore, StoreError,
};
use uuid::Uuid;

fn store() -> SqliteRestaurantStore {
    SqliteRestaurantStore::new(open_db_in_memory().unwrap())
}

fn insert(store: &SqliteRestaurantStore, name: &str, created_at: i64) -> Restaurant {
    let restaurant = Restaurant::with_id(Uuid::new_v4(), name, created_at);
    store
        .save(&ChangeSet::from(Change::InsertRestaurant(restaurant.clone())))
        .unwrap();
    restaurant
}

fn count(store: &SqliteRestaurantStore, table: &str) -> i64 {
    store
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn empty_save_is_a_no_op() {
    let store = store();
    assert_eq!(store.save(&ChangeSet::new()).unwrap(), SaveOutcome::NoChanges);
    assert!(store.fetch_all().unwrap().is_empty());
}

#[test]
fn fetch_all_orders_by_creation_and_keeps_menu_order() {
    let store = store();
    let later = insert(&store, "later", 2_000);
    let earlier = insert(&store, "earlier", 1_000);

    let mut batch = ChangeSet::new();
    batch
        .push(Change::InsertMenu(Menu::new(later.id, "first", 9_000)))
        .push(Change::InsertMenu(Menu::new(later.id, "second", 12_000)))
        .push(Change::InsertMenu(Menu::new(later.id, "third", 0)));
    assert_eq!(store.save(&batch).unwrap(), SaveOutcome::Saved { applied: 3 });

    let all = store.fetch_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, earlier.id);
    assert_eq!(all[1].id, later.id);
    let names = all[1]
        .menus
        .iter()
        .map(|menu| menu.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[test]
fn failed_batch_rolls_back_every_change() {
    let store = store();
    let restaurant = insert(&store, "kept", 1);

    let mut batch = ChangeSet::new();
    batch
        .push(Change::RenameRestaurant {
            id: restaurant.id,
            name: "renamed".to_string(),
        })
        .push(Change::InsertMenu(Menu::new(Uuid::new_v4(), "orphan", 1_000)));

    let err = store.save(&batch).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(EntityRef::Restaurant(_))));
    assert_eq!(store.fetch_all().unwrap()[0].name, "kept");
}

#[test]
fn rename_validates_and_reports_missing_restaurant() {
    let store = store();
    let restaurant = insert(&store, "name", 1);

    let err = store
        .save(&ChangeSet::from(Change::RenameRestaurant {
            id: restaurant.id,
            name: "  ".to_string(),
        }))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ModelValidationError::EmptyRestaurantName)
    ));

    let missing = Uuid::new_v4();
    let err = store
        .save(&ChangeSet::from(Change::RenameRestaurant {
            id: missing,
            name: "x".to_string(),
        }))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(EntityRef::Restaurant(id)) if id == missing));
}

#[test]
fn update_menu_changes_name_and_price() {
    let store = store();
    let restaurant = insert(&store, "owner", 1);
    let mut menu = Menu::new(restaurant.id, "latte", 4_500);
    store
        .save(&ChangeSet::from(Change::InsertMenu(menu.clone())))
        .unwrap();

    menu.name = "oat latte".to_string();
    menu.price = 5_000;
    store
        .save(&ChangeSet::from(Change::UpdateMenu(menu.clone())))
        .unwrap();

    assert_eq!(store.fetch_all().unwrap()[0].menus, vec![menu]);
}

#[test]
fn deleting_restaurant_cascades_to_its_menus_only() {
    let store = store();
    let doomed = insert(&store, "doomed", 1);
    let survivor = insert(&store, "survivor", 2);

    let mut batch = ChangeSet::new();
    batch
        .push(Change::InsertMenu(Menu::new(doomed.id, "a", 1)))
        .push(Change::InsertMenu(Menu::new(doomed.id, "b", 2)))
        .push(Change::InsertMenu(Menu::new(survivor.id, "c", 3)));
    store.save(&batch).unwrap();

    store.delete(EntityRef::Restaurant(doomed.id)).unwrap();

    let all = store.fetch_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, survivor.id);
    assert_eq!(all[0].menus.len(), 1);
    assert_eq!(count(&store, "menus"), 1);
}

#[test]
fn delete_missing_entity_returns_not_found() {
    let store = store();
    let id = Uuid::new_v4();
    let err = store.delete(EntityRef::Menu(id)).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(EntityRef::Menu(missing)) if missing == id));
}

#[test]
fn data_survives_reopen_and_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.sqlite3");

    let store = SqliteRestaurantStore::new(besteats_core::db::open_db(&path).unwrap());
    let restaurant = insert(&store, "persisted", 1);
    store.close().unwrap();

    let reopened = SqliteRestaurantStore::new(besteats_core::db::open_db(&path).unwrap());
    let all = reopened.fetch_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, restaurant.id);
}
