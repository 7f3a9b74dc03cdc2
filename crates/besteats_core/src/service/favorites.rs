//! Favorites use-case repository.
//!
//! # Responsibility
//! - Keep an in-memory reflection of the restaurant store.
//! - Own create/rename/update/delete use-cases for restaurants and menus.
//! - Publish an immutable snapshot after every mutation.
//!
//! # Invariants
//! - After any public call returns, the cache equals a fresh `fetch_all`
//!   (re-synced even when the mutation itself failed).
//! - Name search is case, diacritic and width insensitive.

use crate::model::restaurant::{Menu, MenuId, ModelValidationError, Restaurant, RestaurantId};
use crate::store::restaurant_store::{
    Change, ChangeSet, EntityRef, RestaurantStore, StoreError, StoreResult,
};
use crate::text::fold_key;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tokio::sync::watch;

pub type FavoritesResult<T> = Result<T, FavoritesError>;

/// Error surfaced by favorites use-cases.
#[derive(Debug)]
pub enum FavoritesError {
    /// Input violates a record invariant.
    Invalid(ModelValidationError),
    RestaurantNotFound(RestaurantId),
    MenuNotFound(MenuId),
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for FavoritesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::RestaurantNotFound(id) => write!(f, "restaurant not found: {id}"),
            Self::MenuNotFound(id) => write!(f, "menu not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FavoritesError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for FavoritesError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Invalid(err),
            StoreError::NotFound(EntityRef::Restaurant(id)) => Self::RestaurantNotFound(id),
            StoreError::NotFound(EntityRef::Menu(id)) => Self::MenuNotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Immutable view of saved favorites published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesSnapshot {
    /// Bumped on every re-sync.
    pub revision: u64,
    pub restaurants: Arc<[Restaurant]>,
}

/// In-memory favorites cache over a [`RestaurantStore`].
pub struct FavoritesRepository<S: RestaurantStore> {
    store: S,
    restaurants: Arc<[Restaurant]>,
    revision: u64,
    snapshots: watch::Sender<FavoritesSnapshot>,
}

impl<S: RestaurantStore> FavoritesRepository<S> {
    /// Creates the repository and performs the initial fetch.
    pub fn load(store: S) -> FavoritesResult<Self> {
        let restaurants: Arc<[Restaurant]> = store.fetch_all()?.into();
        let snapshot = FavoritesSnapshot {
            revision: 0,
            restaurants: Arc::clone(&restaurants),
        };
        let (snapshots, _) = watch::channel(snapshot);
        info!(
            "event=favorites_load module=favorites status=ok count={}",
            restaurants.len()
        );
        Ok(Self {
            store,
            restaurants,
            revision: 0,
            snapshots,
        })
    }

    /// Returns a receiver that observes every re-synced snapshot.
    pub fn subscribe(&self) -> watch::Receiver<FavoritesSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> FavoritesSnapshot {
        FavoritesSnapshot {
            revision: self.revision,
            restaurants: Arc::clone(&self.restaurants),
        }
    }

    /// All restaurants in storage order.
    pub fn list_all(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn get(&self, id: RestaurantId) -> Option<&Restaurant> {
        self.restaurants.iter().find(|restaurant| restaurant.id == id)
    }

    /// Filters restaurants by name.
    ///
    /// An empty query returns `list_all()` unchanged; otherwise returns the
    /// subsequence whose folded name contains the folded query.
    pub fn search(&self, query: &str) -> Vec<&Restaurant> {
        if query.is_empty() {
            return self.restaurants.iter().collect();
        }
        let needle = fold_key(query);
        self.restaurants
            .iter()
            .filter(|restaurant| fold_key(&restaurant.name).contains(&needle))
            .collect()
    }

    /// Re-reads storage into the cache and publishes a snapshot.
    pub fn reload(&mut self) -> FavoritesResult<()> {
        self.restaurants = self.store.fetch_all()?.into();
        self.revision += 1;
        self.snapshots.send_replace(self.snapshot());
        Ok(())
    }

    /// Saves a new restaurant with a trimmed, non-blank name.
    pub fn create_restaurant(&mut self, name: &str) -> FavoritesResult<RestaurantId> {
        let restaurant = Restaurant::new(name.trim());
        restaurant.validate().map_err(FavoritesError::Invalid)?;
        let id = restaurant.id;
        let result = self
            .store
            .save(&ChangeSet::from(Change::InsertRestaurant(restaurant)));
        self.finish("favorites_create", result).map(|_| id)
    }

    /// Renames a restaurant.
    ///
    /// Returns `Ok(false)` without touching storage when `new_name` is absent
    /// or blank; `Ok(true)` after a persisted rename. A non-blank name is
    /// stored as given.
    pub fn rename(&mut self, id: RestaurantId, new_name: Option<&str>) -> FavoritesResult<bool> {
        let Some(name) = new_name.filter(|name| !name.trim().is_empty()) else {
            info!("event=favorites_rename module=favorites status=skipped reason=empty_name");
            return Ok(false);
        };
        let change = Change::RenameRestaurant {
            id,
            name: name.to_string(),
        };
        let result = self.store.save(&ChangeSet::from(change));
        self.finish("favorites_rename", result).map(|_| true)
    }

    /// Deletes a restaurant and, through the store cascade, its menus.
    pub fn remove(&mut self, id: RestaurantId) -> FavoritesResult<()> {
        let result = self.store.delete(EntityRef::Restaurant(id));
        self.finish("favorites_remove", result)
    }

    /// Appends a menu to an existing restaurant.
    pub fn add_menu(
        &mut self,
        restaurant_id: RestaurantId,
        name: &str,
        price: i64,
    ) -> FavoritesResult<MenuId> {
        let menu = Menu::new(restaurant_id, name.trim(), price);
        menu.validate().map_err(FavoritesError::Invalid)?;
        let id = menu.id;
        let result = self.store.save(&ChangeSet::from(Change::InsertMenu(menu)));
        self.finish("favorites_add_menu", result).map(|_| id)
    }

    /// Replaces the name and price of an existing menu, keeping its position.
    pub fn update_menu(&mut self, menu_id: MenuId, name: &str, price: i64) -> FavoritesResult<()> {
        let Some(restaurant_id) = self.restaurants.iter().find_map(|restaurant| {
            restaurant
                .menus
                .iter()
                .any(|menu| menu.id == menu_id)
                .then_some(restaurant.id)
        }) else {
            return Err(FavoritesError::MenuNotFound(menu_id));
        };
        let menu = Menu {
            id: menu_id,
            restaurant_id,
            name: name.trim().to_string(),
            price,
        };
        menu.validate().map_err(FavoritesError::Invalid)?;
        let result = self.store.save(&ChangeSet::from(Change::UpdateMenu(menu)));
        self.finish("favorites_update_menu", result).map(|_| ())
    }

    pub fn remove_menu(&mut self, menu_id: MenuId) -> FavoritesResult<()> {
        let result = self.store.delete(EntityRef::Menu(menu_id));
        self.finish("favorites_remove_menu", result)
    }

    /// Gives the store back, e.g. to close it at shutdown.
    pub fn into_store(self) -> S {
        self.store
    }

    fn finish<T>(&mut self, event: &'static str, result: StoreResult<T>) -> FavoritesResult<T> {
        match &result {
            Ok(_) => info!("event={event} module=favorites status=ok"),
            Err(err) => warn!("event={event} module=favorites status=error error={err}"),
        }

        if let Err(err) = self.reload() {
            error!("event=favorites_resync module=favorites status=error error={err}");
            // A failed mutation is the more useful error to report.
            return match result {
                Ok(_) => Err(err),
                Err(mutation_err) => Err(mutation_err.into()),
            };
        }

        result.map_err(FavoritesError::from)
    }
}
