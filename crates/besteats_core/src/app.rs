//! Core lifecycle wiring.
//!
//! # Responsibility
//! - Validate configuration, start logging and open the favorites store.
//! - Build map controllers for an injected location provider.
//! - Close storage explicitly at shutdown.
//!
//! # Invariants
//! - Any startup failure is returned as a fatal `InitError`; nothing is
//!   half-initialized.

use crate::config::{ConfigError, CoreConfig};
use crate::db::{open_db_at, DbError};
use crate::logging::{init_logging, LoggingError};
use crate::model::geo::Viewport;
use crate::service::favorites::{FavoritesError, FavoritesRepository};
use crate::session::location::{LocationProvider, LocationSession};
use crate::session::map::MapInteractionController;
use crate::store::restaurant_store::{SqliteRestaurantStore, StoreResult};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fatal startup failure.
#[derive(Debug)]
pub enum InitError {
    Config(ConfigError),
    Logging(LoggingError),
    Db(DbError),
    Favorites(FavoritesError),
}

impl Display for InitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "failed to open favorites store: {err}"),
            Self::Favorites(err) => write!(f, "failed to load favorites: {err}"),
        }
    }
}

impl Error for InitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Favorites(err) => Some(err),
        }
    }
}

/// Opened core: configuration plus the favorites repository.
pub struct BestEatsCore {
    config: CoreConfig,
    favorites: FavoritesRepository<SqliteRestaurantStore>,
}

impl BestEatsCore {
    /// Validates `config`, starts logging when a directory is set, then opens
    /// and loads the favorites store.
    pub fn open(config: CoreConfig) -> Result<Self, InitError> {
        config.validate().map_err(InitError::Config)?;

        if let Some(log_dir) = &config.log_dir {
            init_logging(&config.log_level, &log_dir.to_string_lossy())
                .map_err(InitError::Logging)?;
        }

        let conn = open_db_at(&config.db_path).map_err(|err| {
            error!("event=core_open module=core status=error error_code=store_open_failed error={err}");
            InitError::Db(err)
        })?;
        let favorites = FavoritesRepository::load(SqliteRestaurantStore::new(conn))
            .map_err(InitError::Favorites)?;

        info!(
            "event=core_open module=core status=ok favorites={}",
            favorites.list_all().len()
        );
        Ok(Self { config, favorites })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn favorites(&self) -> &FavoritesRepository<SqliteRestaurantStore> {
        &self.favorites
    }

    pub fn favorites_mut(&mut self) -> &mut FavoritesRepository<SqliteRestaurantStore> {
        &mut self.favorites
    }

    /// Builds a map controller in the configured default category.
    pub fn map_controller<L: LocationProvider>(&self, provider: L) -> MapInteractionController<L> {
        let session = LocationSession::new(provider, self.config.default_category);
        MapInteractionController::new(session, Viewport::default())
    }

    /// Closes the favorites store.
    pub fn close(self) -> StoreResult<()> {
        self.favorites.into_store().close()
    }
}
