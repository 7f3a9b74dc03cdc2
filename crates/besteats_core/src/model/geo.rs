//! Coordinates and map viewport values.

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns whether both components are finite and inside WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Visible map region: a center plus a span in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Viewport {
    const DEFAULT_DELTA: f64 = 0.01;

    /// Creates a viewport with the default street-level span.
    pub fn centered_on(center: Coordinate) -> Self {
        Self {
            center,
            latitude_delta: Self::DEFAULT_DELTA,
            longitude_delta: Self::DEFAULT_DELTA,
        }
    }

    /// Moves the center, keeping the current span.
    pub fn recenter(&mut self, center: Coordinate) {
        self.center = center;
    }
}

impl Default for Viewport {
    /// Seoul City Hall, used until the first location fix arrives.
    fn default() -> Self {
        Self::centered_on(Coordinate::new(37.5665, 126.9780))
    }
}
