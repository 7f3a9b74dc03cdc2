//! Location session and search supersession.
//!
//! # Responsibility
//! - Drive the injected [`LocationProvider`] through permission and fix
//!   states.
//! - Own the active food category and the last applied place list.
//! - Version searches so stale responses never overwrite newer ones.
//!
//! # Invariants
//! - `Denied` and `Failed` are terminal until `reauthorize()`.
//! - A later fix updates `Located` in place and only searches when the
//!   category changed while no fix was available.
//! - Only the response for the most recently issued ticket is applied.
//! - A category change supersedes every outstanding ticket.
//! - A failed search keeps the previously applied places.

use crate::model::category::FoodCategory;
use crate::model::geo::Coordinate;
use crate::model::place::Place;
use crate::search::client::{SearchError, SearchResult, SearchTicket};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Platform permission answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    /// The user has not answered the permission prompt yet.
    NotDetermined,
    Granted,
    Denied,
}

/// One reading from the platform location service.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateReading {
    Fix(Coordinate),
    /// No fix available yet.
    Pending,
    Denied,
    Failed(String),
}

/// Injected platform location capability.
pub trait LocationProvider {
    fn request_authorization(&mut self) -> AuthorizationStatus;
    fn current_coordinate(&mut self) -> CoordinateReading;
}

/// Location session state.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationState {
    /// Waiting for the user to answer the permission prompt.
    Unauthorized,
    Awaiting,
    Located(Coordinate),
    Denied,
    Failed(String),
}

impl LocationState {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Located(coordinate) => Some(*coordinate),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Denied | Self::Failed(_))
    }
}

/// Location failure surfaced to callers and kept as session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    Denied,
    Unavailable(String),
}

impl Display for LocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Denied => write!(f, "location permission denied"),
            Self::Unavailable(message) => write!(f, "location unavailable: {message}"),
        }
    }
}

impl Error for LocationError {}

pub type LocationResult<T> = Result<T, LocationError>;

/// Successful outcome of [`LocationSession::get_current_location`].
#[derive(Debug, Clone, PartialEq)]
pub enum LocationUpdate {
    Located {
        coordinate: Coordinate,
        /// Present for the first fix of the session and for the first fix
        /// after a category change made without a coordinate.
        initial_search: Option<SearchTicket>,
    },
    /// Permission or fix still outstanding; call again later.
    Pending,
}

/// Result of offering a search response to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { count: usize },
    /// A newer search was issued; the response was discarded.
    Superseded,
    /// The newest search failed; previous places were kept.
    Failed(SearchError),
}

/// Location and search session over an injected provider.
pub struct LocationSession<L: LocationProvider> {
    provider: L,
    state: LocationState,
    category: FoodCategory,
    places: Arc<[Place]>,
    next_seq: u64,
    latest_issued: Option<u64>,
    latest_settled: Option<u64>,
    /// The current category has no ticket yet; the next fix issues one.
    search_due: bool,
    last_error: Option<SearchError>,
}

impl<L: LocationProvider> LocationSession<L> {
    pub fn new(provider: L, category: FoodCategory) -> Self {
        Self {
            provider,
            state: LocationState::Awaiting,
            category,
            places: Arc::from(Vec::new()),
            next_seq: 1,
            latest_issued: None,
            latest_settled: None,
            search_due: true,
            last_error: None,
        }
    }

    pub fn state(&self) -> &LocationState {
        &self.state
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.state.coordinate()
    }

    pub fn category(&self) -> FoodCategory {
        self.category
    }

    /// Places from the most recently applied response.
    pub fn places(&self) -> &Arc<[Place]> {
        &self.places
    }

    pub fn last_error(&self) -> Option<&SearchError> {
        self.last_error.as_ref()
    }

    /// Whether the current category still awaits a search response.
    pub fn is_search_pending(&self) -> bool {
        self.search_due || self.latest_issued != self.latest_settled
    }

    /// Requests permission and a fix from the provider.
    ///
    /// The first fix of the session returns a ticket for the initial search
    /// in the current category, as does the first fix after a category
    /// change that happened without a coordinate. Other fixes only refresh
    /// the coordinate.
    pub fn get_current_location(&mut self) -> LocationResult<LocationUpdate> {
        match &self.state {
            LocationState::Denied => return Err(LocationError::Denied),
            LocationState::Failed(message) => {
                return Err(LocationError::Unavailable(message.clone()))
            }
            _ => {}
        }

        match self.provider.request_authorization() {
            AuthorizationStatus::Granted => {}
            AuthorizationStatus::Denied => return Err(self.fail(LocationError::Denied)),
            AuthorizationStatus::NotDetermined => {
                if self.coordinate().is_none() {
                    self.state = LocationState::Unauthorized;
                }
                debug!("event=location_fix module=session status=pending reason=authorization");
                return Ok(LocationUpdate::Pending);
            }
        }

        match self.provider.current_coordinate() {
            CoordinateReading::Fix(coordinate) => {
                let search_due = self.search_due;
                self.state = LocationState::Located(coordinate);
                info!("event=location_fix module=session status=ok search_due={search_due}");
                let initial_search = search_due.then(|| self.issue_ticket(coordinate));
                Ok(LocationUpdate::Located {
                    coordinate,
                    initial_search,
                })
            }
            CoordinateReading::Pending => {
                if self.coordinate().is_none() {
                    self.state = LocationState::Awaiting;
                }
                debug!("event=location_fix module=session status=pending reason=no_fix");
                Ok(LocationUpdate::Pending)
            }
            CoordinateReading::Denied => Err(self.fail(LocationError::Denied)),
            CoordinateReading::Failed(message) => {
                Err(self.fail(LocationError::Unavailable(message)))
            }
        }
    }

    /// Clears a terminal permission/error state so the next
    /// `get_current_location` asks the provider again.
    pub fn reauthorize(&mut self) {
        if self.state.is_terminal() {
            info!("event=location_reauthorize module=session status=ok");
            self.state = LocationState::Awaiting;
        }
    }

    /// Switches the active category.
    ///
    /// Returns a ticket for the re-search when located. Without a coordinate
    /// any outstanding ticket is superseded and the next fix searches in the
    /// new category. Returns `None` when the category is unchanged.
    pub fn set_category(&mut self, category: FoodCategory) -> Option<SearchTicket> {
        if category == self.category {
            return None;
        }
        info!(
            "event=category_change module=session status=ok from={} to={}",
            self.category, category
        );
        self.category = category;
        match self.coordinate() {
            Some(coordinate) => Some(self.issue_ticket(coordinate)),
            None => {
                self.latest_issued = None;
                self.latest_settled = None;
                self.search_due = true;
                None
            }
        }
    }

    /// Re-issues a search for the current category and coordinate.
    pub fn refresh(&mut self) -> Option<SearchTicket> {
        let coordinate = self.coordinate()?;
        Some(self.issue_ticket(coordinate))
    }

    /// Applies a search response if `seq` belongs to the newest ticket.
    pub fn apply_search(&mut self, seq: u64, result: SearchResult<Vec<Place>>) -> ApplyOutcome {
        if Some(seq) != self.latest_issued || self.latest_settled == Some(seq) {
            debug!(
                "event=search_apply module=session status=superseded seq={seq} latest={:?}",
                self.latest_issued
            );
            return ApplyOutcome::Superseded;
        }
        self.latest_settled = Some(seq);

        match result {
            Ok(places) => {
                let count = places.len();
                self.places = places.into();
                self.last_error = None;
                info!("event=search_apply module=session status=ok seq={seq} count={count}");
                ApplyOutcome::Applied { count }
            }
            Err(err) => {
                warn!("event=search_apply module=session status=error seq={seq} error={err}");
                self.last_error = Some(err.clone());
                ApplyOutcome::Failed(err)
            }
        }
    }

    fn issue_ticket(&mut self, origin: Coordinate) -> SearchTicket {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_issued = Some(seq);
        self.search_due = false;
        SearchTicket {
            seq,
            origin,
            category: self.category,
        }
    }

    fn fail(&mut self, err: LocationError) -> LocationError {
        warn!("event=location_fix module=session status=error error={err}");
        self.state = match &err {
            LocationError::Denied => LocationState::Denied,
            LocationError::Unavailable(message) => LocationState::Failed(message.clone()),
        };
        err
    }
}
