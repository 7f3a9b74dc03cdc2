//! Durable restaurant/menu store.
//!
//! # Responsibility
//! - Define the persistence contract consumed by the favorites repository.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - `save` with an empty change set performs no write.
//! - Deleting a restaurant deletes its menus in the same transaction.

pub mod restaurant_store;
