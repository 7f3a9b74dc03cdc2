//! FFI use-case API for mobile-host calls.
//!
//! # Responsibility
//! - Expose favorites use-cases as sync bridge functions.
//! - Keep error semantics simple: envelopes with `ok` + `message`.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - IDs cross the boundary as UUID strings.

use besteats_core::db::open_db;
use besteats_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    FavoritesError, FavoritesRepository, Restaurant, SqliteRestaurantStore,
};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const FAVORITES_DB_FILE_NAME: &str = "besteats_favorites.sqlite3";
static FAVORITES_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for bridge smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Menu row returned to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteMenuItem {
    pub menu_id: String,
    pub name: String,
    pub price: i64,
}

/// Restaurant row returned to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteItem {
    pub restaurant_id: String,
    pub name: String,
    pub created_at: i64,
    pub menus: Vec<FavoriteMenuItem>,
}

/// Response envelope for listing/searching favorites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesListResponse {
    pub ok: bool,
    pub items: Vec<FavoriteItem>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Created entity ID, when the action creates one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl FavoritesActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Lists favorites whose name contains `query` (all when empty).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn favorites_search(query: String) -> FavoritesListResponse {
    let result = with_favorites(|repo| {
        Ok(repo
            .search(&query)
            .into_iter()
            .map(to_item)
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => {
            let message = if items.is_empty() {
                "No favorites.".to_string()
            } else {
                format!("Found {} favorite(s).", items.len())
            };
            FavoritesListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(message) => FavoritesListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("favorites_search failed: {message}"),
        },
    }
}

/// Saves a new favorite restaurant.
#[flutter_rust_bridge::frb(sync)]
pub fn favorites_create(name: String) -> FavoritesActionResponse {
    match with_favorites(|repo| repo.create_restaurant(&name)) {
        Ok(id) => FavoritesActionResponse::success("Restaurant saved.", Some(id.to_string())),
        Err(err) => FavoritesActionResponse::failure(format!("favorites_create failed: {err}")),
    }
}

/// Renames a favorite; absent or blank `new_name` leaves it unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn favorites_rename(restaurant_id: String, new_name: Option<String>) -> FavoritesActionResponse {
    let result = parse_id(&restaurant_id)
        .and_then(|id| with_favorites(|repo| repo.rename(id, new_name.as_deref())));
    match result {
        Ok(true) => FavoritesActionResponse::success("Restaurant renamed.", None),
        Ok(false) => FavoritesActionResponse::success("Name unchanged.", None),
        Err(err) => FavoritesActionResponse::failure(format!("favorites_rename failed: {err}")),
    }
}

/// Deletes a favorite together with its menus.
#[flutter_rust_bridge::frb(sync)]
pub fn favorites_delete(restaurant_id: String) -> FavoritesActionResponse {
    let result = parse_id(&restaurant_id).and_then(|id| with_favorites(|repo| repo.remove(id)));
    match result {
        Ok(()) => FavoritesActionResponse::success("Restaurant deleted.", None),
        Err(err) => FavoritesActionResponse::failure(format!("favorites_delete failed: {err}")),
    }
}

/// Appends a menu to a favorite restaurant.
#[flutter_rust_bridge::frb(sync)]
pub fn menu_add(restaurant_id: String, name: String, price: i64) -> FavoritesActionResponse {
    let result = parse_id(&restaurant_id)
        .and_then(|id| with_favorites(|repo| repo.add_menu(id, &name, price)));
    match result {
        Ok(menu_id) => FavoritesActionResponse::success("Menu saved.", Some(menu_id.to_string())),
        Err(err) => FavoritesActionResponse::failure(format!("menu_add failed: {err}")),
    }
}

/// Replaces the name and price of one menu.
#[flutter_rust_bridge::frb(sync)]
pub fn menu_update(menu_id: String, name: String, price: i64) -> FavoritesActionResponse {
    let result =
        parse_id(&menu_id).and_then(|id| with_favorites(|repo| repo.update_menu(id, &name, price)));
    match result {
        Ok(()) => FavoritesActionResponse::success("Menu updated.", None),
        Err(err) => FavoritesActionResponse::failure(format!("menu_update failed: {err}")),
    }
}

/// Deletes one menu.
#[flutter_rust_bridge::frb(sync)]
pub fn menu_delete(menu_id: String) -> FavoritesActionResponse {
    let result = parse_id(&menu_id).and_then(|id| with_favorites(|repo| repo.remove_menu(id)));
    match result {
        Ok(()) => FavoritesActionResponse::success("Menu deleted.", None),
        Err(err) => FavoritesActionResponse::failure(format!("menu_delete failed: {err}")),
    }
}

fn resolve_favorites_db_path() -> PathBuf {
    FAVORITES_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("BESTEATS_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(FAVORITES_DB_FILE_NAME)
        })
        .clone()
}

fn with_favorites<T>(
    f: impl FnOnce(&mut FavoritesRepository<SqliteRestaurantStore>) -> Result<T, FavoritesError>,
) -> Result<T, String> {
    let db_path = resolve_favorites_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("favorites DB open failed: {err}"))?;
    let mut repo = FavoritesRepository::load(SqliteRestaurantStore::new(conn))
        .map_err(|err| format!("favorites load failed: {err}"))?;
    let result = f(&mut repo).map_err(|err| err.to_string());
    if let Err(err) = repo.into_store().close() {
        log::warn!("event=ffi_close module=ffi status=error error={err}");
    }
    result
}

fn parse_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid id `{raw}`"))
}

fn to_item(restaurant: &Restaurant) -> FavoriteItem {
    FavoriteItem {
        restaurant_id: restaurant.id.to_string(),
        name: restaurant.name.clone(),
        created_at: restaurant.created_at,
        menus: restaurant
            .menus
            .iter()
            .map(|menu| FavoriteMenuItem {
                menu_id: menu.id.to_string(),
                name: menu.name.clone(),
                price: menu.price,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, favorites_create, favorites_delete, favorites_rename, favorites_search,
        init_logging, menu_add, menu_delete, menu_update, ping,
    };
    use std::sync::{Mutex, MutexGuard};
    use std::time::{SystemTime, UNIX_EPOCH};

    static DB_LOCK: Mutex<()> = Mutex::new(());

    fn db_guard() -> MutexGuard<'static, ()> {
        DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn create_rename_search_and_delete_roundtrip() {
        let _guard = db_guard();
        let token = unique_token("ffi-favorite");
        let created = favorites_create(format!("{token} original"));
        assert!(created.ok, "{}", created.message);
        let id = created.id.expect("create should return id");

        let renamed = favorites_rename(id.clone(), Some(format!("{token} renamed")));
        assert!(renamed.ok, "{}", renamed.message);

        let unchanged = favorites_rename(id.clone(), Some("  ".to_string()));
        assert!(unchanged.ok);
        assert_eq!(unchanged.message, "Name unchanged.");

        let found = favorites_search(token.clone());
        assert!(found.ok, "{}", found.message);
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].name, format!("{token} renamed"));

        let deleted = favorites_delete(id);
        assert!(deleted.ok, "{}", deleted.message);
        assert!(favorites_search(token).items.is_empty());
    }

    #[test]
    fn menus_are_listed_under_their_restaurant() {
        let _guard = db_guard();
        let token = unique_token("ffi-menu");
        let id = favorites_create(token.clone()).id.expect("restaurant id");

        let menu = menu_add(id.clone(), "김밥".to_string(), 3_500);
        assert!(menu.ok, "{}", menu.message);
        let menu_id = menu.id.expect("menu id");

        let listed = favorites_search(token.clone());
        assert_eq!(listed.items[0].menus.len(), 1);
        assert_eq!(listed.items[0].menus[0].price, 3_500);

        let updated = menu_update(menu_id.clone(), "참치김밥".to_string(), 4_500);
        assert!(updated.ok, "{}", updated.message);
        let listed = favorites_search(token.clone());
        assert_eq!(listed.items[0].menus[0].name, "참치김밥");
        assert_eq!(listed.items[0].menus[0].price, 4_500);

        assert!(menu_delete(menu_id).ok);
        assert!(favorites_search(token).items[0].menus.is_empty());
        assert!(favorites_delete(id).ok);
    }

    #[test]
    fn invalid_ids_and_inputs_fail_without_panicking() {
        let _guard = db_guard();
        let response = favorites_delete("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid id"));

        let response = favorites_create("   ".to_string());
        assert!(!response.ok);

        let id = favorites_create(unique_token("ffi-price")).id.expect("id");
        let response = menu_add(id.clone(), "negative".to_string(), -1);
        assert!(!response.ok);
        assert!(favorites_delete(id).ok);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
