//! Location sample definition

use geo::geometry::Point;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One geolocation reading as delivered by a location source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    /// x = longitude, y = latitude, in degrees
    pub coordinates: Point,
    /// Unix time in milliseconds
    pub timestamp_ms: i64,
    /// Reported ground speed, m/s
    pub speed_mps: Option<f64>,
    /// Altitude in meters
    pub altitude_m: Option<f64>,
}

impl LocationSample {
    pub fn basic(latitude: f64, longitude: f64, timestamp_ms: i64) -> Self {
        Self {
            coordinates: Point::new(longitude, latitude),
            timestamp_ms,
            speed_mps: None,
            altitude_m: None,
        }
    }

    pub fn speed(mut self, speed_mps: f64) -> Self {
        self.speed_mps = Some(speed_mps);

        self
    }

    pub fn altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = Some(altitude_m);

        self
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates.y()
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates.x()
    }

    /// Finite latitude within ±90 and longitude within ±180
    pub fn has_valid_position(&self) -> bool {
        let (lat, lng) = (self.latitude(), self.longitude());

        lat.is_finite() && lng.is_finite() && lat.abs() <= 90.0 && lng.abs() <= 180.0
    }

    /// Sample time, `None` when the timestamp is outside the supported range
    pub fn time(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp_nanos(self.timestamp_ms as i128 * 1_000_000).ok()
    }

    /// Build a sample from a wall-clock time
    pub fn at(latitude: f64, longitude: f64, time: OffsetDateTime) -> Self {
        let timestamp_ms = (time.unix_timestamp_nanos() / 1_000_000) as i64;

        Self::basic(latitude, longitude, timestamp_ms)
    }
}
