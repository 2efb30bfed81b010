//! Sample sources API
//!
//! Live collaborators ([`Clock`], [`LocationSource`]) push [`RideEvent`]s into
//! the session's event sink. Recorded sources ([`SampleSource`]) hand back a
//! whole batch of samples at once.

use std::sync::mpsc::Sender;

use time::OffsetDateTime;

use crate::error::{LocationError, SourceError};
use crate::LocationSample;

/// Identifies one periodic timer of a [`Clock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Identifies one subscription of a [`LocationSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle(pub u64);

/// Something a collaborator delivers to a ride session
#[derive(Debug, Clone, PartialEq)]
pub enum RideEvent {
    Tick(TimerHandle),
    Sample(SubscriptionHandle, LocationSample),
    LocationError(SubscriptionHandle, LocationError),
}

pub type EventSink = Sender<RideEvent>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOptions {
    pub high_accuracy: bool,
}

/// Time source with periodic timers
pub trait Clock {
    /// Deliver a [`RideEvent::Tick`] into `sink` every `interval_ms` until cancelled
    fn schedule_periodic(&mut self, interval_ms: u64, sink: EventSink) -> TimerHandle;

    fn cancel(&mut self, handle: TimerHandle);

    fn now(&self) -> OffsetDateTime;
}

/// Device location feed
pub trait LocationSource {
    /// Deliver samples and errors into `sink` until unsubscribed
    fn subscribe(&mut self, sink: EventSink, options: LocationOptions) -> SubscriptionHandle;

    fn unsubscribe(&mut self, handle: SubscriptionHandle);
}

/// Recorded samples source
pub trait SampleSource {
    /// Fetch the samples recorded during the period, unbounded sides included
    fn fetch(
        &mut self,
        start: Option<OffsetDateTime>,
        end: Option<OffsetDateTime>,
    ) -> Result<Vec<LocationSample>, SourceError>;
}

mod manual;

pub use manual::{ManualClock, ManualLocationSource};

#[cfg(feature = "csv")]
mod csv_file;

#[cfg(feature = "csv")]
pub use csv_file::CsvSource;
