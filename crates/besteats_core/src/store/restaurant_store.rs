//! Restaurant store contract and SQLite implementation.
//!
//! # Responsibility
//! - Apply batched changes transactionally.
//! - Delete restaurants with explicit cascade to owned menus.
//! - Read back every restaurant with its ordered menus.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - A failed batch leaves storage untouched.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::restaurant::{
    validate_restaurant_name, Menu, MenuId, ModelValidationError, Restaurant, RestaurantId,
};
use log::{debug, error, info};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Reference to one stored entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Restaurant(RestaurantId),
    Menu(MenuId),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Restaurant(id) => write!(f, "restaurant {id}"),
            Self::Menu(id) => write!(f, "menu {id}"),
        }
    }
}

/// Storage error for save/delete/fetch operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(ModelValidationError),
    Db(DbError),
    NotFound(EntityRef),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::InvalidData(message) => write!(f, "invalid persisted favorites data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ModelValidationError> for StoreError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One pending mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Inserts a restaurant. Menus carried on the record are ignored.
    InsertRestaurant(Restaurant),
    RenameRestaurant { id: RestaurantId, name: String },
    /// Appends a menu after the restaurant's existing menus.
    InsertMenu(Menu),
    UpdateMenu(Menu),
}

/// Ordered batch of pending changes, applied in one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: Change) -> &mut Self {
        self.changes.push(change);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }
}

impl From<Change> for ChangeSet {
    fn from(value: Change) -> Self {
        Self {
            changes: vec![value],
        }
    }
}

/// Result of a successful `save`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing was pending; storage was not touched.
    NoChanges,
    Saved { applied: usize },
}

/// Persistence contract for favorites.
pub trait RestaurantStore {
    /// Returns all restaurants ordered by creation time, each with ordered menus.
    fn fetch_all(&self) -> StoreResult<Vec<Restaurant>>;
    /// Applies `changes` atomically. Empty batches succeed without writing.
    fn save(&self, changes: &ChangeSet) -> StoreResult<SaveOutcome>;
    /// Removes one entity and persists immediately. Restaurants cascade to menus.
    fn delete(&self, entity: EntityRef) -> StoreResult<()>;
}

/// SQLite-backed restaurant store owning its connection.
pub struct SqliteRestaurantStore {
    conn: Connection,
}

impl SqliteRestaurantStore {
    /// Wraps a connection returned by `db::open_db*` (migrations applied).
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the underlying connection, reporting flush failures.
    pub fn close(self) -> StoreResult<()> {
        self.conn
            .close()
            .map_err(|(_, err)| StoreError::Db(DbError::Sqlite(err)))?;
        info!("event=store_close module=store status=ok");
        Ok(())
    }
}

impl RestaurantStore for SqliteRestaurantStore {
    fn fetch_all(&self) -> StoreResult<Vec<Restaurant>> {
        let mut restaurants = Vec::new();
        let mut index_by_id = HashMap::new();

        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, created_at
             FROM restaurants
             ORDER BY created_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let restaurant = parse_restaurant_row(row)?;
            index_by_id.insert(restaurant.id, restaurants.len());
            restaurants.push(restaurant);
        }

        let mut stmt = self.conn.prepare(
            "SELECT uuid, restaurant_uuid, name, price
             FROM menus
             ORDER BY restaurant_uuid ASC, position ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let menu = parse_menu_row(row)?;
            let Some(&index) = index_by_id.get(&menu.restaurant_id) else {
                return Err(StoreError::InvalidData(format!(
                    "menu {} references missing restaurant {}",
                    menu.id, menu.restaurant_id
                )));
            };
            restaurants[index].menus.push(menu);
        }

        Ok(restaurants)
    }

    fn save(&self, changes: &ChangeSet) -> StoreResult<SaveOutcome> {
        if changes.is_empty() {
            debug!("event=store_save module=store status=skipped reason=no_changes");
            return Ok(SaveOutcome::NoChanges);
        }

        let started_at = Instant::now();
        let result = self.apply_changes(changes);
        match &result {
            Ok(_) => info!(
                "event=store_save module=store status=ok changes={} duration_ms={}",
                changes.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_save module=store status=error changes={} duration_ms={} error={}",
                changes.len(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn delete(&self, entity: EntityRef) -> StoreResult<()> {
        let result = self.delete_entity(entity);
        match &result {
            Ok(()) => info!("event=store_delete module=store status=ok entity={entity}"),
            Err(err) => error!(
                "event=store_delete module=store status=error entity={entity} error={err}"
            ),
        }
        result
    }
}

impl SqliteRestaurantStore {
    fn apply_changes(&self, changes: &ChangeSet) -> StoreResult<SaveOutcome> {
        // Dropping the transaction on any early return rolls the batch back.
        let tx = self.conn.unchecked_transaction()?;
        for change in changes.iter() {
            apply_change(&tx, change)?;
        }
        tx.commit()?;
        Ok(SaveOutcome::Saved {
            applied: changes.len(),
        })
    }

    fn delete_entity(&self, entity: EntityRef) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = match entity {
            EntityRef::Restaurant(id) => {
                tx.execute(
                    "DELETE FROM menus WHERE restaurant_uuid = ?1;",
                    [id.to_string()],
                )?;
                tx.execute("DELETE FROM restaurants WHERE uuid = ?1;", [id.to_string()])?
            }
            EntityRef::Menu(id) => {
                tx.execute("DELETE FROM menus WHERE uuid = ?1;", [id.to_string()])?
            }
        };

        if changed == 0 {
            return Err(StoreError::NotFound(entity));
        }

        tx.commit()?;
        Ok(())
    }
}

fn apply_change(tx: &Transaction<'_>, change: &Change) -> StoreResult<()> {
    match change {
        Change::InsertRestaurant(restaurant) => {
            restaurant.validate()?;
            tx.execute(
                "INSERT INTO restaurants (uuid, name, created_at) VALUES (?1, ?2, ?3);",
                params![
                    restaurant.id.to_string(),
                    restaurant.name.as_str(),
                    restaurant.created_at
                ],
            )?;
        }
        Change::RenameRestaurant { id, name } => {
            validate_restaurant_name(name)?;
            let changed = tx.execute(
                "UPDATE restaurants SET name = ?1 WHERE uuid = ?2;",
                params![name.as_str(), id.to_string()],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(EntityRef::Restaurant(*id)));
            }
        }
        Change::InsertMenu(menu) => {
            menu.validate()?;
            ensure_restaurant_exists(tx, menu.restaurant_id)?;
            tx.execute(
                "INSERT INTO menus (uuid, restaurant_uuid, name, price, position)
                 VALUES (
                    ?1, ?2, ?3, ?4,
                    (SELECT COALESCE(MAX(position), -1) + 1 FROM menus WHERE restaurant_uuid = ?2)
                 );",
                params![
                    menu.id.to_string(),
                    menu.restaurant_id.to_string(),
                    menu.name.as_str(),
                    menu.price
                ],
            )?;
        }
        Change::UpdateMenu(menu) => {
            menu.validate()?;
            let changed = tx.execute(
                "UPDATE menus SET name = ?1, price = ?2
                 WHERE uuid = ?3 AND restaurant_uuid = ?4;",
                params![
                    menu.name.as_str(),
                    menu.price,
                    menu.id.to_string(),
                    menu.restaurant_id.to_string()
                ],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(EntityRef::Menu(menu.id)));
            }
        }
    }
    Ok(())
}

fn ensure_restaurant_exists(tx: &Transaction<'_>, id: RestaurantId) -> StoreResult<()> {
    let found = tx
        .query_row(
            "SELECT 1 FROM restaurants WHERE uuid = ?1;",
            [id.to_string()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(StoreError::NotFound(EntityRef::Restaurant(id))),
    }
}

fn parse_restaurant_row(row: &Row<'_>) -> StoreResult<Restaurant> {
    let id = parse_uuid(row, "uuid", "restaurants.uuid")?;
    let restaurant = Restaurant::with_id(id, row.get::<_, String>("name")?, row.get("created_at")?);
    restaurant.validate().map_err(|err| {
        StoreError::InvalidData(format!("restaurant {id} violates invariant: {err}"))
    })?;
    Ok(restaurant)
}

fn parse_menu_row(row: &Row<'_>) -> StoreResult<Menu> {
    let menu = Menu {
        id: parse_uuid(row, "uuid", "menus.uuid")?,
        restaurant_id: parse_uuid(row, "restaurant_uuid", "menus.restaurant_uuid")?,
        name: row.get("name")?,
        price: row.get("price")?,
    };
    menu.validate().map_err(|err| {
        StoreError::InvalidData(format!("menu {} violates invariant: {err}", menu.id))
    })?;
    Ok(menu)
}

fn parse_uuid(row: &Row<'_>, column: &str, label: &str) -> StoreResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid value `{text}` in {label}")))
}
