//! Finished ride record

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::sample::LocationSample;

/// Immutable snapshot of a completed ride, handed to the caller on stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub distance_km: f64,
    pub duration_seconds: u64,
    pub average_speed_kmh: f64,
    pub max_speed_kmh: f64,
    pub elevation_gain_m: f64,
    pub calories: u32,
    pub samples: Vec<LocationSample>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Average speed in km/h, zero before the first second
pub fn average_speed_kmh(distance_km: f64, elapsed_seconds: u64) -> f64 {
    if elapsed_seconds == 0 {
        return 0.0;
    }

    distance_km / (elapsed_seconds as f64 / 3600.0)
}

/// Calorie estimate, whole kcal
pub fn estimate_calories(distance_km: f64, calories_per_km: f64) -> u32 {
    let kcal = (distance_km * calories_per_km).floor();

    if kcal.is_finite() && kcal > 0.0 {
        kcal as u32
    } else {
        0
    }
}
