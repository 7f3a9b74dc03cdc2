//! Map interaction controller.
//!
//! # Responsibility
//! - Combine the location session with explicit user selection.
//! - Keep the viewport centered on the place that governs the screen.
//! - Resolve the info panel fields and publish map snapshots.
//!
//! # Invariants
//! - An explicit selection overrides nearest-based centering until the next
//!   category change.
//! - Empty results clear `nearest` but never `selected`.
//! - Info fields are read from one chosen source (`selected`, else
//!   `nearest`); a field missing on that source resolves to [`NO_DATA`].

use crate::model::category::FoodCategory;
use crate::model::geo::Viewport;
use crate::model::place::{format_distance, Place};
use crate::search::client::{SearchError, SearchResult, SearchTicket};
use crate::session::location::{
    ApplyOutcome, LocationProvider, LocationResult, LocationSession, LocationState,
    LocationUpdate,
};
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::watch;

/// Placeholder shown for any info field without data.
pub const NO_DATA: &str = "정보없음";

/// Text shown in the place info panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceInfo {
    pub name: String,
    pub category: String,
    pub address: String,
    pub distance: String,
}

impl PlaceInfo {
    /// Resolves every field from `source`, falling back to [`NO_DATA`].
    pub fn resolve(source: Option<&Place>) -> Self {
        let Some(place) = source else {
            return Self::empty();
        };
        Self {
            name: non_blank(Some(place.name.as_str())),
            category: non_blank(place.category_name.as_deref()),
            address: non_blank(place.road_address.as_deref().or(place.address.as_deref())),
            distance: place
                .distance_meters()
                .map_or_else(|| NO_DATA.to_string(), format_distance),
        }
    }

    pub fn empty() -> Self {
        Self {
            name: NO_DATA.to_string(),
            category: NO_DATA.to_string(),
            address: NO_DATA.to_string(),
            distance: NO_DATA.to_string(),
        }
    }
}

fn non_blank(value: Option<&str>) -> String {
    value
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(NO_DATA)
        .to_string()
}

/// Immutable map state published after every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSnapshot {
    pub revision: u64,
    pub location: LocationState,
    pub category: FoodCategory,
    pub places: Arc<[Place]>,
    pub nearest: Option<Place>,
    pub selected: Option<Place>,
    pub viewport: Viewport,
    pub info: PlaceInfo,
    pub search_pending: bool,
    pub last_error: Option<SearchError>,
}

/// View-facing controller over a [`LocationSession`].
pub struct MapInteractionController<L: LocationProvider> {
    session: LocationSession<L>,
    nearest: Option<Place>,
    selected: Option<Place>,
    viewport: Viewport,
    revision: u64,
    snapshots: watch::Sender<MapSnapshot>,
}

impl<L: LocationProvider> MapInteractionController<L> {
    pub fn new(session: LocationSession<L>, viewport: Viewport) -> Self {
        let (snapshots, _) = watch::channel(build_snapshot(0, &session, None, None, viewport));
        Self {
            session,
            nearest: None,
            selected: None,
            viewport,
            revision: 0,
            snapshots,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<MapSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn session(&self) -> &LocationSession<L> {
        &self.session
    }

    pub fn nearest(&self) -> Option<&Place> {
        self.nearest.as_ref()
    }

    pub fn selected(&self) -> Option<&Place> {
        self.selected.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of places in the current result set.
    pub fn nearby_count(&self) -> usize {
        self.session.places().len()
    }

    /// Info panel fields for `selected ?? nearest`.
    pub fn place_info(&self) -> PlaceInfo {
        PlaceInfo::resolve(self.selected.as_ref().or(self.nearest.as_ref()))
    }

    pub fn snapshot(&self) -> MapSnapshot {
        build_snapshot(
            self.revision,
            &self.session,
            self.nearest.as_ref(),
            self.selected.as_ref(),
            self.viewport,
        )
    }

    /// Requests a location fix and recenters on the user.
    ///
    /// Returns the initial search ticket on the first fix of the session.
    pub fn locate(&mut self) -> LocationResult<Option<SearchTicket>> {
        let result = self.session.get_current_location();
        let ticket = match &result {
            Ok(LocationUpdate::Located {
                coordinate,
                initial_search,
            }) => {
                self.viewport.recenter(*coordinate);
                *initial_search
            }
            Ok(LocationUpdate::Pending) | Err(_) => None,
        };
        self.publish();
        result.map(|_| ticket)
    }

    /// Switches the category, clearing any explicit selection.
    pub fn select_category(&mut self, category: FoodCategory) -> Option<SearchTicket> {
        if category == self.session.category() {
            return None;
        }
        self.selected = None;
        let ticket = self.session.set_category(category);
        self.publish();
        ticket
    }

    /// Re-searches the current category around the last fix.
    pub fn refresh(&mut self) -> Option<SearchTicket> {
        let ticket = self.session.refresh();
        self.publish();
        ticket
    }

    /// Marks a place from the current results as selected and centers on it.
    ///
    /// Returns `false` when no current place has `place_id`.
    pub fn select_place(&mut self, place_id: &str) -> bool {
        let Some(place) = self
            .session
            .places()
            .iter()
            .find(|place| place.id == place_id)
            .cloned()
        else {
            debug!("event=place_select module=map status=skipped reason=unknown_place");
            return false;
        };
        self.viewport.recenter(place.coordinate);
        self.selected = Some(place);
        info!("event=place_select module=map status=ok");
        self.publish();
        true
    }

    /// Offers a search response to the session and derives `nearest`.
    pub fn apply_search(&mut self, seq: u64, result: SearchResult<Vec<Place>>) -> ApplyOutcome {
        let outcome = self.session.apply_search(seq, result);
        match &outcome {
            ApplyOutcome::Applied { .. } => {
                self.nearest = self.session.places().first().cloned();
                if self.selected.is_none() {
                    if let Some(nearest) = &self.nearest {
                        self.viewport.recenter(nearest.coordinate);
                    }
                }
                self.publish();
            }
            ApplyOutcome::Failed(_) => self.publish(),
            ApplyOutcome::Superseded => {}
        }
        outcome
    }

    fn publish(&mut self) {
        self.revision += 1;
        self.snapshots.send_replace(self.snapshot());
    }
}

fn build_snapshot<L: LocationProvider>(
    revision: u64,
    session: &LocationSession<L>,
    nearest: Option<&Place>,
    selected: Option<&Place>,
    viewport: Viewport,
) -> MapSnapshot {
    MapSnapshot {
        revision,
        location: session.state().clone(),
        category: session.category(),
        places: Arc::clone(session.places()),
        nearest: nearest.cloned(),
        selected: selected.cloned(),
        viewport,
        info: PlaceInfo::resolve(selected.or(nearest)),
        search_pending: session.is_search_pending(),
        last_error: session.last_error().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{PlaceInfo, NO_DATA};
    use crate::model::geo::Coordinate;
    use crate::model::place::Place;

    fn place(road_address: Option<&str>, address: Option<&str>) -> Place {
        Place {
            id: "1".to_string(),
            name: "A".to_string(),
            category_name: Some("음식점 > 한식".to_string()),
            road_address: road_address.map(str::to_string),
            address: address.map(str::to_string),
            distance: Some("1500".to_string()),
            coordinate: Coordinate::new(37.5, 127.0),
        }
    }

    #[test]
    fn resolve_without_source_is_all_no_data() {
        assert_eq!(PlaceInfo::resolve(None), PlaceInfo::empty());
        assert_eq!(PlaceInfo::empty().name, NO_DATA);
    }

    #[test]
    fn address_prefers_road_address_then_general_address() {
        let both = place(Some("세종대로 110"), Some("태평로1가 31"));
        assert_eq!(PlaceInfo::resolve(Some(&both)).address, "세종대로 110");

        let general_only = place(None, Some("태평로1가 31"));
        assert_eq!(PlaceInfo::resolve(Some(&general_only)).address, "태평로1가 31");

        let neither = place(None, None);
        assert_eq!(PlaceInfo::resolve(Some(&neither)).address, NO_DATA);
    }

    #[test]
    fn distance_is_formatted() {
        assert_eq!(PlaceInfo::resolve(Some(&place(None, None))).distance, "1.5km");
    }
}
