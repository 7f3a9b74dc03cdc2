//! Core domain logic for BestEats.
//! This crate is the single source of truth for favorites and map session
//! invariants; UI shells only render its snapshots.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod session;
pub mod store;
pub mod text;

pub use app::{BestEatsCore, InitError};
pub use config::{ConfigError, CoreConfig, SearchConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::FoodCategory;
pub use model::geo::{Coordinate, Viewport};
pub use model::place::{Place, PlaceId};
pub use model::restaurant::{Menu, MenuId, ModelValidationError, Restaurant, RestaurantId};
pub use search::client::{
    PlaceSearchClient, SearchError, SearchRequest, SearchResult, SearchTicket,
};
pub use search::dispatch::{SearchCompletion, SearchDispatcher};
pub use search::kakao::KakaoPlaceSearchClient;
pub use service::favorites::{
    FavoritesError, FavoritesRepository, FavoritesResult, FavoritesSnapshot,
};
pub use session::location::{
    ApplyOutcome, AuthorizationStatus, CoordinateReading, LocationError, LocationProvider,
    LocationResult, LocationSession, LocationState, LocationUpdate,
};
pub use session::map::{MapInteractionController, MapSnapshot, PlaceInfo, NO_DATA};
pub use store::restaurant_store::{
    Change, ChangeSet, EntityRef, RestaurantStore, SaveOutcome, SqliteRestaurantStore,
    StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
