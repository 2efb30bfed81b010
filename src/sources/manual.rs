//! Hand-driven clock and location source
//!
//! Both are cheap clones over shared state: keep one clone to drive time and
//! positions while the ride session owns the other.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use time::{Duration, OffsetDateTime};

use super::{
    Clock, EventSink, LocationOptions, LocationSource, RideEvent, SubscriptionHandle, TimerHandle,
};
use crate::error::LocationError;
use crate::LocationSample;

struct Timer {
    interval_ms: u64,
    pending_ms: u64,
    sink: EventSink,
}

struct ClockState {
    now: OffsetDateTime,
    next_id: u64,
    timers: BTreeMap<TimerHandle, Timer>,
}

/// Clock that only moves when told to
#[derive(Clone)]
pub struct ManualClock {
    state: Rc<RefCell<ClockState>>,
}

impl ManualClock {
    pub fn starting_at(now: OffsetDateTime) -> Self {
        Self {
            state: Rc::new(RefCell::new(ClockState {
                now,
                next_id: 1,
                timers: BTreeMap::new(),
            })),
        }
    }

    /// Move time forward, firing every timer that comes due
    pub fn advance_ms(&self, ms: u64) {
        let mut state = self.state.borrow_mut();
        state.now += Duration::milliseconds(ms as i64);

        for (handle, timer) in state.timers.iter_mut() {
            if timer.interval_ms == 0 {
                continue;
            }

            timer.pending_ms += ms;
            while timer.pending_ms >= timer.interval_ms {
                timer.pending_ms -= timer.interval_ms;
                // A dropped receiver just means nobody listens anymore
                timer.sink.send(RideEvent::Tick(*handle)).ok();
            }
        }
    }

    pub fn advance(&self, seconds: u64) {
        self.advance_ms(seconds * 1000);
    }

    pub fn active_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(OffsetDateTime::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn schedule_periodic(&mut self, interval_ms: u64, sink: EventSink) -> TimerHandle {
        let mut state = self.state.borrow_mut();
        let handle = TimerHandle(state.next_id);
        state.next_id += 1;

        state.timers.insert(
            handle,
            Timer {
                interval_ms,
                pending_ms: 0,
                sink,
            },
        );

        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.state.borrow_mut().timers.remove(&handle);
    }

    fn now(&self) -> OffsetDateTime {
        self.state.borrow().now
    }
}

struct Subscription {
    sink: EventSink,
    options: LocationOptions,
}

#[derive(Default)]
struct LocationState {
    next_id: u64,
    subscriptions: BTreeMap<SubscriptionHandle, Subscription>,
}

/// Location source fed by hand, or by a recorded track
#[derive(Clone, Default)]
pub struct ManualLocationSource {
    state: Rc<RefCell<LocationState>>,
}

impl ManualLocationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a sample to every subscriber, returns how many got it
    pub fn push(&self, sample: LocationSample) -> usize {
        let state = self.state.borrow();

        for (handle, sub) in state.subscriptions.iter() {
            sub.sink.send(RideEvent::Sample(*handle, sample.clone())).ok();
        }

        state.subscriptions.len()
    }

    /// Report a failure to every subscriber
    pub fn fail(&self, error: LocationError) -> usize {
        let state = self.state.borrow();

        for (handle, sub) in state.subscriptions.iter() {
            sub.sink.send(RideEvent::LocationError(*handle, error)).ok();
        }

        state.subscriptions.len()
    }

    pub fn active_subscriptions(&self) -> usize {
        self.state.borrow().subscriptions.len()
    }

    /// Options requested by the most recent live subscription
    pub fn requested_options(&self) -> Option<LocationOptions> {
        self.state
            .borrow()
            .subscriptions
            .values()
            .last()
            .map(|sub| sub.options)
    }
}

impl LocationSource for ManualLocationSource {
    fn subscribe(&mut self, sink: EventSink, options: LocationOptions) -> SubscriptionHandle {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let handle = SubscriptionHandle(state.next_id);

        state
            .subscriptions
            .insert(handle, Subscription { sink, options });

        handle
    }

    fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        self.state.borrow_mut().subscriptions.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use time::macros::datetime;

    use super::*;

    #[test]
    fn timer_fires_per_interval() {
        let mut clock = ManualClock::starting_at(datetime!(2024-05-20 7:00 UTC));
        let (tx, rx) = channel();

        let handle = clock.schedule_periodic(1000, tx);
        clock.advance_ms(2500);

        let ticks: Vec<RideEvent> = rx.try_iter().collect();
        assert_eq!(vec![RideEvent::Tick(handle), RideEvent::Tick(handle)], ticks);

        clock.advance_ms(500);
        assert_eq!(1, rx.try_iter().count());
        assert_eq!(datetime!(2024-05-20 7:00:03 UTC), clock.now());
    }

    #[test]
    fn cancelled_timer_is_silent() {
        let mut clock = ManualClock::default();
        let (tx, rx) = channel();

        let handle = clock.schedule_periodic(1000, tx);
        clock.cancel(handle);
        clock.advance(10);

        assert_eq!(0, rx.try_iter().count());
        assert_eq!(0, clock.active_timers());
    }

    #[test]
    fn location_reaches_only_live_subscribers() {
        let mut source = ManualLocationSource::new();
        let (tx, rx) = channel();

        let handle = source.subscribe(tx, LocationOptions { high_accuracy: true });
        assert_eq!(Some(LocationOptions { high_accuracy: true }), source.requested_options());
        assert_eq!(1, source.push(LocationSample::basic(0.0, 0.0, 0)));

        source.unsubscribe(handle);
        assert_eq!(0, source.push(LocationSample::basic(0.0, 0.001, 1000)));
        assert_eq!(0, source.fail(LocationError::Timeout));

        assert_eq!(1, rx.try_iter().count());
    }
}
