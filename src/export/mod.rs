//! Ride exporters

pub mod gpx;

pub use self::gpx::GpxExporter;
