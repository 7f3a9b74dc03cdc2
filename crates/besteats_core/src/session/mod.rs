//! Map session state.
//!
//! # Responsibility
//! - Track device location and permission state.
//! - Issue sequence-numbered searches and apply only the newest response.
//! - Derive nearest/selected places and the visible viewport.
//!
//! # Invariants
//! - All state transitions run on one consumer; async work only reports back
//!   through `apply_search`.

pub mod location;
pub mod map;
