//! Ride tracking

pub mod haversine;
pub mod sample;
pub mod session;
pub mod summary;
pub mod tracker;


pub use haversine::{haversine_km, EARTH_RADIUS_KM};
pub use sample::LocationSample;
pub use session::{RideSession, RideSnapshot, RideStatus, TICK_INTERVAL_MS};
pub use summary::ActivitySummary;
pub use tracker::RideTracker;
