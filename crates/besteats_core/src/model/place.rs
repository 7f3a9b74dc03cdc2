//! Place values returned by nearby search.
//!
//! # Invariants
//! - A `Place` lives for one search response and is never persisted.
//! - `distance` keeps the raw server string; an empty or unparseable value is
//!   a valid "unknown" state, not an error.

use crate::model::geo::Coordinate;
use serde::{Deserialize, Serialize};

/// Server-assigned place identifier.
pub type PlaceId = String;

/// Immutable point of interest from one search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    /// Category path such as `음식점 > 카페`.
    pub category_name: Option<String>,
    pub road_address: Option<String>,
    pub address: Option<String>,
    /// Distance from the search origin in meters, as sent by the server.
    pub distance: Option<String>,
    pub coordinate: Coordinate,
}

impl Place {
    /// Parses `distance` into meters.
    ///
    /// Returns `None` for missing, empty, negative or non-numeric values.
    pub fn distance_meters(&self) -> Option<f64> {
        let raw = self.distance.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        raw.parse::<f64>()
            .ok()
            .filter(|meters| meters.is_finite() && *meters >= 0.0)
    }
}

/// Formats a distance for the info panel.
///
/// Below one kilometer the value is rounded to whole meters (`"418m"`),
/// otherwise it is shown in kilometers with one decimal (`"1.2km"`).
pub fn format_distance(meters: f64) -> String {
    let rounded = meters.round();
    if rounded < 1000.0 {
        format!("{rounded}m")
    } else {
        format!("{:.1}km", meters / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{format_distance, Place};
    use crate::model::geo::Coordinate;

    fn place_with_distance(distance: Option<&str>) -> Place {
        Place {
            id: "1".to_string(),
            name: "place".to_string(),
            category_name: None,
            road_address: None,
            address: None,
            distance: distance.map(str::to_string),
            coordinate: Coordinate::new(37.5, 127.0),
        }
    }

    #[test]
    fn distance_parses_decimal_meters() {
        assert_eq!(place_with_distance(Some("418")).distance_meters(), Some(418.0));
        assert_eq!(
            place_with_distance(Some(" 12.5 ")).distance_meters(),
            Some(12.5)
        );
    }

    #[test]
    fn distance_treats_empty_and_garbage_as_unknown() {
        assert_eq!(place_with_distance(None).distance_meters(), None);
        assert_eq!(place_with_distance(Some("")).distance_meters(), None);
        assert_eq!(place_with_distance(Some("near")).distance_meters(), None);
        assert_eq!(place_with_distance(Some("-3")).distance_meters(), None);
    }

    #[test]
    fn format_distance_switches_unit_at_one_kilometer() {
        assert_eq!(format_distance(418.4), "418m");
        assert_eq!(format_distance(999.4), "999m");
        assert_eq!(format_distance(999.6), "1.0km");
        assert_eq!(format_distance(1000.0), "1.0km");
        assert_eq!(format_distance(1260.0), "1.3km");
    }
}
