//! Replay a recorded ride through a live session

use crate::config::TrackingOptions;
use crate::error::RideError;
use crate::ride::{ActivitySummary, LocationSample, RideSession};
use crate::sources::{ManualClock, ManualLocationSource};

/// Outcome of a replayed ride
#[derive(Debug, Clone)]
pub struct Replayed {
    pub summary: ActivitySummary,
    /// Location failures reported while replaying
    pub failures: Vec<RideError>,
}

/// Drive a fresh session with recorded samples, in time order.
///
/// The clock starts at the first sample and moves forward by whole
/// seconds as later samples arrive, so ticks line up with the recording.
pub fn replay(
    mut samples: Vec<LocationSample>,
    options: TrackingOptions,
) -> Result<Replayed, RideError> {
    samples.sort_by_key(|s| s.timestamp_ms);

    let first_ms = samples.first().map(|s| s.timestamp_ms).unwrap_or(0);
    let start = samples
        .first()
        .and_then(|s| s.time())
        .unwrap_or(time::OffsetDateTime::UNIX_EPOCH);

    let clock = ManualClock::starting_at(start);
    let gps = ManualLocationSource::new();
    let mut session = RideSession::new(clock.clone(), gps.clone(), options);
    let mut failures = vec![];

    session.start()?;

    let mut advanced_ms: u64 = 0;
    for sample in samples {
        let offset_ms = (sample.timestamp_ms - first_ms).max(0) as u64;
        if offset_ms > advanced_ms {
            clock.advance_ms(offset_ms - advanced_ms);
            advanced_ms = offset_ms;
        }

        gps.push(sample);
        failures.extend(session.pump());
    }

    let summary = session.stop()?;

    tracing::info!(
        distance_km = summary.distance_km,
        duration_seconds = summary.duration_seconds,
        "Replay finished"
    );

    Ok(Replayed { summary, failures })
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::replay;
    use crate::config::TrackingOptions;
    use crate::ride::{haversine_km, LocationSample};

    #[test]
    fn replay_out_of_order_track() -> Result<(), String> {
        let p1 = LocationSample::at(0.0, 0.0, datetime!(2024-05-20 7:00 UTC));
        let p2 = LocationSample::at(0.0, 0.001, datetime!(2024-05-20 7:00:10 UTC));
        let p3 = LocationSample::at(0.0, 0.002, datetime!(2024-05-20 7:00:20.5 UTC));

        let replayed = replay(vec![p3, p1, p2], TrackingOptions::default())
            .map_err(|e| e.to_string())?;
        let summary = replayed.summary;

        assert!(replayed.failures.is_empty());
        assert_eq!(3, summary.samples.len());
        assert_eq!(20, summary.duration_seconds);
        assert_eq!(datetime!(2024-05-20 7:00:20.5 UTC), summary.created_at);
        assert!((summary.distance_km - 2.0 * haversine_km(0.0, 0.0, 0.0, 0.001)).abs() < 1e-9);
        assert_eq!(datetime!(2024-05-20 7:00 UTC), summary.samples[0].time().ok_or("time")?);

        Ok(())
    }

    #[test]
    fn replay_nothing() -> Result<(), String> {
        let replayed = replay(vec![], TrackingOptions::default()).map_err(|e| e.to_string())?;

        assert_eq!(0, replayed.summary.duration_seconds);
        assert_eq!(0.0, replayed.summary.distance_km);

        Ok(())
    }
}
