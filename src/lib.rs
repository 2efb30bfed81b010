//! velopro - ride tracking core of the VeloPro cycling app

pub mod accounts;
pub mod advisor;
pub mod challenges;
pub mod config;
pub mod error;
pub mod export;
pub mod feed;
pub mod replay;
pub mod ride;
pub mod sources;

pub use config::{Configs, FieldsConfiguration, TrackingOptions};
pub use error::{AuthError, LocationError, RideError, SourceError, StoreError};
pub use export::GpxExporter;
pub use feed::{Activity, ActivityFeed};
pub use replay::replay;
pub use ride::{
    ActivitySummary, LocationSample, RideSession, RideSnapshot, RideStatus, RideTracker,
};
pub use sources::{Clock, LocationSource, SampleSource};
