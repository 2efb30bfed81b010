//! One ride at a time

use super::session::{RideSession, RideStatus};
use super::summary::ActivitySummary;
use crate::config::TrackingOptions;
use crate::error::RideError;
use crate::sources::{Clock, LocationSource};

/// Owns the rider's current session and refuses to start a second one
pub struct RideTracker<C, L>
where
    C: Clock,
    L: LocationSource,
{
    options: TrackingOptions,
    current: Option<RideSession<C, L>>,
}

impl<C, L> RideTracker<C, L>
where
    C: Clock,
    L: LocationSource,
{
    pub fn new(options: TrackingOptions) -> Self {
        Self {
            options,
            current: None,
        }
    }

    /// Start a fresh session on the given collaborators
    pub fn begin(&mut self, clock: C, location: L) -> Result<&mut RideSession<C, L>, RideError> {
        if let Some(active) = &self.current {
            let status = active.status();
            if status == RideStatus::Running || status == RideStatus::Paused {
                return Err(RideError::InvalidState {
                    operation: "start",
                    status,
                });
            }
        }

        let mut session = RideSession::new(clock, location, self.options.clone());
        session.start()?;

        Ok(self.current.insert(session))
    }

    pub fn current(&self) -> Option<&RideSession<C, L>> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut RideSession<C, L>> {
        self.current.as_mut()
    }

    /// Stop the active session and release the slot
    pub fn finish(&mut self) -> Result<ActivitySummary, RideError> {
        let session = self.current.as_mut().ok_or(RideError::InvalidState {
            operation: "stop",
            status: RideStatus::Idle,
        })?;

        let summary = session.stop()?;
        self.current = None;

        Ok(summary)
    }
}
