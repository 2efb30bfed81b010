//! Live ride session
//!
//! A session moves through `Idle -> Running -> {Paused <-> Running} -> Finished`.
//! While running it holds a 1 second timer and a location subscription; both
//! deliver [`RideEvent`]s into the session's own queue, which the owner drains
//! with [`RideSession::pump`] on the same thread.
//!
//! Events carry the handle they were produced for. Anything arriving for a
//! handle the session no longer holds (a cancelled timer, a subscription
//! dropped on pause) is discarded, so queued ticks never leak into a pause.

use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};

use serde::{Deserialize, Serialize};

use super::haversine::sample_distance_km;
use super::sample::LocationSample;
use super::summary::{average_speed_kmh, estimate_calories, ActivitySummary};
use crate::config::TrackingOptions;
use crate::error::RideError;
use crate::sources::{
    Clock, LocationOptions, LocationSource, RideEvent, SubscriptionHandle, TimerHandle,
};

/// Period of the elapsed-time timer
pub const TICK_INTERVAL_MS: u64 = 1000;

/// m/s to km/h
const MPS_TO_KMH: f64 = 3.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RideStatus {
    Idle,
    Running,
    Paused,
    Finished,
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RideStatus::Idle => "idle",
            RideStatus::Running => "running",
            RideStatus::Paused => "paused",
            RideStatus::Finished => "finished",
        };

        f.write_str(name)
    }
}

/// Read-only view of the live metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideSnapshot {
    pub status: RideStatus,
    pub elapsed_seconds: u64,
    pub distance_km: f64,
    pub instantaneous_speed_kmh: f64,
    pub average_speed_kmh: f64,
    pub sample_count: usize,
}

pub struct RideSession<C, L>
where
    C: Clock,
    L: LocationSource,
{
    clock: C,
    location: L,
    options: TrackingOptions,
    status: RideStatus,
    elapsed_seconds: u64,
    samples: Vec<LocationSample>,
    distance_km: f64,
    instantaneous_speed_kmh: f64,
    max_speed_kmh: f64,
    elevation_gain_m: f64,
    timer: Option<TimerHandle>,
    subscription: Option<SubscriptionHandle>,
    sink: Sender<RideEvent>,
    events: Receiver<RideEvent>,
}

impl<C, L> RideSession<C, L>
where
    C: Clock,
    L: LocationSource,
{
    /// New idle session, nothing is acquired until [`start`](Self::start)
    pub fn new(clock: C, location: L, options: TrackingOptions) -> Self {
        let (sink, events) = channel();

        Self {
            clock,
            location,
            options,
            status: RideStatus::Idle,
            elapsed_seconds: 0,
            samples: vec![],
            distance_km: 0.0,
            instantaneous_speed_kmh: 0.0,
            max_speed_kmh: 0.0,
            elevation_gain_m: 0.0,
            timer: None,
            subscription: None,
            sink,
            events,
        }
    }

    pub fn status(&self) -> RideStatus {
        self.status
    }

    pub fn samples(&self) -> &[LocationSample] {
        &self.samples
    }

    pub fn elevation_gain_m(&self) -> f64 {
        self.elevation_gain_m
    }

    pub fn max_speed_kmh(&self) -> f64 {
        self.max_speed_kmh
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn snapshot(&self) -> RideSnapshot {
        RideSnapshot {
            status: self.status,
            elapsed_seconds: self.elapsed_seconds,
            distance_km: self.distance_km,
            instantaneous_speed_kmh: self.instantaneous_speed_kmh,
            average_speed_kmh: average_speed_kmh(self.distance_km, self.elapsed_seconds),
            sample_count: self.samples.len(),
        }
    }

    pub fn start(&mut self) -> Result<(), RideError> {
        self.expect_status("start", RideStatus::Idle)?;

        self.acquire_timer();
        self.acquire_location();
        self.status = RideStatus::Running;

        tracing::info!(high_accuracy = self.options.high_accuracy, "Ride started");

        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), RideError> {
        self.expect_status("pause", RideStatus::Running)?;

        self.settle();
        self.release_timer();
        if self.options.pause_suspends_location {
            self.release_location();
        }
        self.status = RideStatus::Paused;

        tracing::info!(elapsed_seconds = self.elapsed_seconds, "Ride paused");

        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), RideError> {
        self.expect_status("resume", RideStatus::Paused)?;

        self.acquire_timer();
        if self.subscription.is_none() {
            self.acquire_location();
        }
        self.status = RideStatus::Running;

        tracing::info!(elapsed_seconds = self.elapsed_seconds, "Ride resumed");

        Ok(())
    }

    /// Finish the ride and hand over its summary. Only valid once.
    pub fn stop(&mut self) -> Result<ActivitySummary, RideError> {
        match self.status {
            RideStatus::Running | RideStatus::Paused => {}
            status => {
                return Err(RideError::InvalidState {
                    operation: "stop",
                    status,
                })
            }
        }

        self.settle();
        self.release_timer();
        self.release_location();
        self.status = RideStatus::Finished;

        let summary = ActivitySummary {
            distance_km: self.distance_km,
            duration_seconds: self.elapsed_seconds,
            average_speed_kmh: average_speed_kmh(self.distance_km, self.elapsed_seconds),
            max_speed_kmh: self.max_speed_kmh,
            elevation_gain_m: self.elevation_gain_m,
            calories: estimate_calories(self.distance_km, self.options.calories_per_km),
            samples: std::mem::take(&mut self.samples),
            created_at: self.clock.now(),
        };

        tracing::info!(
            distance_km = summary.distance_km,
            duration_seconds = summary.duration_seconds,
            samples = summary.samples.len(),
            "Ride finished"
        );

        Ok(summary)
    }

    /// Apply one collaborator event.
    ///
    /// Location failures are reported back as [`RideError::LocationUnavailable`]
    /// but leave the ride untouched.
    pub fn handle(&mut self, event: RideEvent) -> Result<(), RideError> {
        match event {
            RideEvent::Tick(handle) => {
                if self.timer != Some(handle) || self.status != RideStatus::Running {
                    tracing::debug!(timer = handle.0, "Dropping stale tick");
                    return Ok(());
                }

                self.elapsed_seconds += 1;
            }
            RideEvent::Sample(handle, mut sample) => {
                if self.subscription != Some(handle) {
                    tracing::debug!(subscription = handle.0, "Dropping stale sample");
                    return Ok(());
                }

                if !sample.has_valid_position() {
                    tracing::warn!(
                        latitude = sample.latitude(),
                        longitude = sample.longitude(),
                        "Dropping sample with an invalid position"
                    );
                    return Ok(());
                }

                sample.speed_mps = sample.speed_mps.filter(|v| v.is_finite());
                sample.altitude_m = sample.altitude_m.filter(|v| v.is_finite());

                self.record(sample);
            }
            RideEvent::LocationError(handle, error) => {
                if self.subscription != Some(handle) {
                    return Ok(());
                }

                tracing::warn!(error = %error, samples = self.samples.len(), "Location source failed");
                return Err(RideError::LocationUnavailable(error));
            }
        }

        Ok(())
    }

    /// Drain queued events, returns the failures reported along the way
    pub fn pump(&mut self) -> Vec<RideError> {
        let mut reported = vec![];

        while let Ok(event) = self.events.try_recv() {
            if let Err(e) = self.handle(event) {
                reported.push(e);
            }
        }

        reported
    }

    /// Apply what was delivered before a lifecycle change; failures were
    /// already logged by `handle`
    fn settle(&mut self) {
        let reported = self.pump();
        if !reported.is_empty() {
            tracing::debug!(count = reported.len(), "Location failures settled");
        }
    }

    fn record(&mut self, sample: LocationSample) {
        if let Some(prev) = self.samples.last() {
            self.distance_km += sample_distance_km(prev, &sample);

            if self.options.track_elevation_gain {
                if let (Some(from), Some(to)) = (prev.altitude_m, sample.altitude_m) {
                    if to > from {
                        self.elevation_gain_m += to - from;
                    }
                }
            }
        }

        self.instantaneous_speed_kmh = sample.speed_mps.unwrap_or(0.0) * MPS_TO_KMH;
        if self.instantaneous_speed_kmh > self.max_speed_kmh {
            self.max_speed_kmh = self.instantaneous_speed_kmh;
        }

        self.samples.push(sample);
    }

    fn expect_status(&self, operation: &'static str, expected: RideStatus) -> Result<(), RideError> {
        if self.status != expected {
            return Err(RideError::InvalidState {
                operation,
                status: self.status,
            });
        }

        Ok(())
    }

    fn acquire_timer(&mut self) {
        let handle = self
            .clock
            .schedule_periodic(TICK_INTERVAL_MS, self.sink.clone());
        self.timer = Some(handle);
    }

    fn release_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.clock.cancel(handle);
        }
    }

    fn acquire_location(&mut self) {
        let options = LocationOptions {
            high_accuracy: self.options.high_accuracy,
        };
        let handle = self.location.subscribe(self.sink.clone(), options);
        self.subscription = Some(handle);
    }

    fn release_location(&mut self) {
        if let Some(handle) = self.subscription.take() {
            self.location.unsubscribe(handle);
        }
    }
}

impl<C, L> Drop for RideSession<C, L>
where
    C: Clock,
    L: LocationSource,
{
    fn drop(&mut self) {
        // Collaborators may outlive an abandoned session
        self.release_timer();
        self.release_location();
    }
}
