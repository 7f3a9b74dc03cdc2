use besteats_core::db::open_db_in_memory;
use besteats_core::{
    ChangeSet, EntityRef, FavoritesError, FavoritesRepository, ModelValidationError, Restaurant,
    RestaurantStore, SaveOutcome, SqliteRestaurantStore, StoreError, StoreResult,
};
use std::cell::Cell;
use uuid::Uuid;

fn repository() -> FavoritesRepository<SqliteRestaurantStore> {
    let store = SqliteRestaurantStore::new(open_db_in_memory().unwrap());
    FavoritesRepository::load(store).unwrap()
}

fn names(restaurants: &[&Restaurant]) -> Vec<String> {
    restaurants
        .iter()
        .map(|restaurant| restaurant.name.clone())
        .collect()
}

#[test]
fn create_trims_name_and_lists_in_insertion_order() {
    let mut repo = repository();
    let first = repo.create_restaurant("  을지면옥 ").unwrap();
    let second = repo.create_restaurant("Café Onion").unwrap();

    let all = repo.list_all();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, first);
    assert_eq!(all[0].name, "을지면옥");
    assert_eq!(all[1].id, second);
}

#[test]
fn create_rejects_blank_name_without_touching_storage() {
    let mut repo = repository();
    let err = repo.create_restaurant("   ").unwrap_err();
    assert!(matches!(
        err,
        FavoritesError::Invalid(ModelValidationError::EmptyRestaurantName)
    ));
    assert!(repo.list_all().is_empty());
}

#[test]
fn rename_with_name_updates_listing() {
    let mut repo = repository();
    let id = repo.create_restaurant("old").unwrap();

    assert!(repo.rename(id, Some("new name")).unwrap());
    assert_eq!(repo.get(id).unwrap().name, "new name");
    assert_eq!(repo.list_all()[0].name, "new name");
}

#[test]
fn rename_with_empty_or_absent_name_is_a_no_op() {
    let mut repo = repository();
    let id = repo.create_restaurant("unchanged").unwrap();
    let revision = repo.snapshot().revision;

    assert!(!repo.rename(id, None).unwrap());
    assert!(!repo.rename(id, Some("")).unwrap());
    assert!(!repo.rename(id, Some("   ")).unwrap());

    assert_eq!(repo.get(id).unwrap().name, "unchanged");
    assert_eq!(repo.snapshot().revision, revision);
}

#[test]
fn rename_missing_restaurant_reports_not_found() {
    let mut repo = repository();
    let missing = Uuid::new_v4();
    let err = repo.rename(missing, Some("x")).unwrap_err();
    assert!(matches!(err, FavoritesError::RestaurantNotFound(id) if id == missing));
}

#[test]
fn remove_deletes_restaurant_and_all_its_menus() {
    let mut repo = repository();
    let doomed = repo.create_restaurant("doomed").unwrap();
    let kept = repo.create_restaurant("kept").unwrap();
    let doomed_menus = [
        repo.add_menu(doomed, "냉면", 15_000).unwrap(),
        repo.add_menu(doomed, "수육", 30_000).unwrap(),
    ];
    repo.add_menu(kept, "coffee", 5_000).unwrap();

    repo.remove(doomed).unwrap();

    assert!(repo.get(doomed).is_none());
    let all_menu_ids = repo
        .list_all()
        .iter()
        .flat_map(|restaurant| restaurant.menus.iter().map(|menu| menu.id))
        .collect::<Vec<_>>();
    assert!(doomed_menus.iter().all(|id| !all_menu_ids.contains(id)));
    assert_eq!(repo.get(kept).unwrap().menus.len(), 1);
}

#[test]
fn add_and_remove_menu_resync_cache() {
    let mut repo = repository();
    let id = repo.create_restaurant("menu owner").unwrap();

    let menu_id = repo.add_menu(id, " americano ", 4_000).unwrap();
    let menus = &repo.get(id).unwrap().menus;
    assert_eq!(menus.len(), 1);
    assert_eq!(menus[0].name, "americano");
    assert_eq!(menus[0].price, 4_000);

    repo.remove_menu(menu_id).unwrap();
    assert!(repo.get(id).unwrap().menus.is_empty());

    let err = repo.remove_menu(menu_id).unwrap_err();
    assert!(matches!(err, FavoritesError::MenuNotFound(missing) if missing == menu_id));
}

#[test]
fn rename_stores_non_blank_name_as_given() {
    let mut repo = repository();
    let id = repo.create_restaurant("plain").unwrap();

    assert!(repo.rename(id, Some(" 을지로 본점 ")).unwrap());
    assert_eq!(repo.get(id).unwrap().name, " 을지로 본점 ");
}

#[test]
fn update_menu_keeps_position_and_resyncs() {
    let mut repo = repository();
    let id = repo.create_restaurant("cafe").unwrap();
    let latte = repo.add_menu(id, "latte", 4_500).unwrap();
    let mocha = repo.add_menu(id, "mocha", 5_000).unwrap();
    let revision = repo.snapshot().revision;

    repo.update_menu(latte, " oat latte ", 5_200).unwrap();

    let menus = &repo.get(id).unwrap().menus;
    assert_eq!(menus[0].id, latte);
    assert_eq!(menus[0].name, "oat latte");
    assert_eq!(menus[0].price, 5_200);
    assert_eq!(menus[1].id, mocha);
    assert!(repo.snapshot().revision > revision);
}

#[test]
fn update_menu_rejects_unknown_menu_and_invalid_input() {
    let mut repo = repository();
    let id = repo.create_restaurant("cafe").unwrap();
    let menu = repo.add_menu(id, "latte", 4_500).unwrap();

    let missing = Uuid::new_v4();
    let err = repo.update_menu(missing, "x", 1).unwrap_err();
    assert!(matches!(err, FavoritesError::MenuNotFound(found) if found == missing));

    let err = repo.update_menu(menu, "  ", 1).unwrap_err();
    assert!(matches!(
        err,
        FavoritesError::Invalid(ModelValidationError::EmptyMenuName)
    ));
    let err = repo.update_menu(menu, "latte", -1).unwrap_err();
    assert!(matches!(
        err,
        FavoritesError::Invalid(ModelValidationError::NegativePrice(-1))
    ));
    assert_eq!(repo.get(id).unwrap().menus[0].price, 4_500);
}

#[test]
fn add_menu_rejects_negative_price() {
    let mut repo = repository();
    let id = repo.create_restaurant("owner").unwrap();
    let err = repo.add_menu(id, "free lunch", -100).unwrap_err();
    assert!(matches!(
        err,
        FavoritesError::Invalid(ModelValidationError::NegativePrice(-100))
    ));
}

#[test]
fn empty_search_equals_list_all() {
    let mut repo = repository();
    repo.create_restaurant("one").unwrap();
    repo.create_restaurant("two").unwrap();

    let all = repo.list_all().iter().collect::<Vec<_>>();
    assert_eq!(repo.search(""), all);
}

#[test]
fn search_is_case_diacritic_and_width_insensitive_and_keeps_order() {
    let mut repo = repository();
    for name in ["Crème Café", "BURGER joint", "카페 어니언", "Pho Việt", "ＣＡＦＥ Ｂ"] {
        repo.create_restaurant(name).unwrap();
    }

    assert_eq!(
        names(&repo.search("cafe")),
        vec!["Crème Café".to_string(), "ＣＡＦＥ Ｂ".to_string()]
    );
    assert_eq!(names(&repo.search("Burger")), vec!["BURGER joint".to_string()]);
    assert_eq!(names(&repo.search("viet")), vec!["Pho Việt".to_string()]);
    assert_eq!(names(&repo.search("카페")), vec!["카페 어니언".to_string()]);
    assert!(repo.search("sushi").is_empty());
}

#[test]
fn subscribers_receive_snapshot_after_each_mutation() {
    let mut repo = repository();
    let mut receiver = repo.subscribe();
    assert!(!receiver.has_changed().unwrap());

    let id = repo.create_restaurant("watched").unwrap();
    assert!(receiver.has_changed().unwrap());
    let snapshot = receiver.borrow_and_update().clone();
    assert_eq!(snapshot.restaurants.len(), 1);
    assert_eq!(snapshot.restaurants[0].id, id);

    repo.remove(id).unwrap();
    assert!(receiver.borrow_and_update().restaurants.is_empty());
}

/// Store whose writes always fail while reads reflect an external row.
struct FailingStore {
    fetches: Cell<usize>,
}

impl RestaurantStore for FailingStore {
    fn fetch_all(&self) -> StoreResult<Vec<Restaurant>> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(vec![Restaurant::with_id(Uuid::nil(), "external", 1)])
    }

    fn save(&self, changes: &ChangeSet) -> StoreResult<SaveOutcome> {
        if changes.is_empty() {
            return Ok(SaveOutcome::NoChanges);
        }
        Err(StoreError::InvalidData("disk full".to_string()))
    }

    fn delete(&self, entity: EntityRef) -> StoreResult<()> {
        Err(StoreError::NotFound(entity))
    }
}

#[test]
fn failed_mutation_still_resyncs_and_surfaces_typed_error() {
    let mut repo = FavoritesRepository::load(FailingStore {
        fetches: Cell::new(0),
    })
    .unwrap();

    let err = repo.create_restaurant("never stored").unwrap_err();
    assert!(matches!(err, FavoritesError::Store(StoreError::InvalidData(_))));

    let err = repo.remove(Uuid::nil()).unwrap_err();
    assert!(matches!(err, FavoritesError::RestaurantNotFound(_)));

    let store = repo.into_store();
    assert_eq!(store.fetches.get(), 3);
}
