//! Place search contract.
//!
//! # Invariants
//! - Results are ordered nearest-first by server rank.
//! - Zero places is a valid result, not an error.
//! - Every issued search carries a strictly increasing sequence number.

use crate::model::category::FoodCategory;
use crate::model::geo::Coordinate;
use crate::model::place::Place;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::time::Duration;

pub type SearchResult<T> = Result<T, SearchError>;

/// Place search failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Payload was empty, malformed or missing required fields.
    EmptyData,
    /// Request could not be sent or the body could not be read.
    Transport(String),
    /// Server answered with a non-success HTTP status.
    Status(u16),
    Timeout(Duration),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyData => write!(f, "place search returned no usable data"),
            Self::Transport(message) => write!(f, "place search transport failure: {message}"),
            Self::Status(code) => write!(f, "place search failed with HTTP status {code}"),
            Self::Timeout(after) => {
                write!(f, "place search timed out after {}ms", after.as_millis())
            }
        }
    }
}

impl Error for SearchError {}

/// Sequence-numbered search request issued by the location session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchTicket {
    pub seq: u64,
    pub origin: Coordinate,
    pub category: FoodCategory,
}

/// Parameters sent to a [`PlaceSearchClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub origin: Coordinate,
    pub category: FoodCategory,
    pub radius_m: u32,
    pub page_size: u32,
}

/// Keyword-based nearby places endpoint.
pub trait PlaceSearchClient {
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = SearchResult<Vec<Place>>> + Send;
}
