//! Saved restaurant and menu records.
//!
//! # Responsibility
//! - Define the records owned by the favorites store.
//! - Validate record invariants before persistence.
//!
//! # Invariants
//! - `Restaurant::name` is never blank after creation or rename.
//! - `Menu::price` is never negative.
//! - `Restaurant::menus` keeps insertion order.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub type RestaurantId = Uuid;
pub type MenuId = Uuid;

/// Validation failures for restaurant/menu invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    EmptyRestaurantName,
    EmptyMenuName,
    NegativePrice(i64),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRestaurantName => write!(f, "restaurant name cannot be empty"),
            Self::EmptyMenuName => write!(f, "menu name cannot be empty"),
            Self::NegativePrice(price) => write!(f, "menu price cannot be negative: {price}"),
        }
    }
}

impl Error for ModelValidationError {}

/// Saved favorite restaurant with its owned menus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    /// Owned menus in insertion order. Deleting the restaurant deletes them.
    pub menus: Vec<Menu>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Restaurant {
    /// Creates a restaurant with a generated ID and the current timestamp.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, now_epoch_ms())
    }

    pub fn with_id(id: RestaurantId, name: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            name: name.into(),
            menus: Vec::new(),
            created_at,
        }
    }

    /// Checks record invariants (restaurant fields only).
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_restaurant_name(&self.name)
    }
}

/// Menu item owned by exactly one restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub id: MenuId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    /// Non-negative price in the smallest currency unit (won).
    pub price: i64,
}

impl Menu {
    pub fn new(restaurant_id: RestaurantId, name: impl Into<String>, price: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            restaurant_id,
            name: name.into(),
            price,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::EmptyMenuName);
        }
        if self.price < 0 {
            return Err(ModelValidationError::NegativePrice(self.price));
        }
        Ok(())
    }
}

pub fn validate_restaurant_name(name: &str) -> Result<(), ModelValidationError> {
    if name.trim().is_empty() {
        return Err(ModelValidationError::EmptyRestaurantName);
    }
    Ok(())
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
