//! Domain model for saved favorites and nearby place search.
//!
//! # Responsibility
//! - Define canonical records owned by the favorites store.
//! - Define immutable values produced by place search.
//!
//! # Invariants
//! - Every stored record is identified by a stable UUID.
//! - A `Menu` belongs to exactly one `Restaurant`.
//! - `Place` values are never persisted.

pub mod category;
pub mod geo;
pub mod place;
pub mod restaurant;
