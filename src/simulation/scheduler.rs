//! Event queue driving the simulation
//!
//! Events are plain values ordered by `(time, insertion sequence)`, so events that
//! share a timestamp fire in the order they were scheduled. Nothing at or past the
//! horizon is ever dispatched.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use tracing::debug;

use crate::simulation::clock::{SimTime, SimulationClock};
use crate::simulation::dock_flow::Truck;
use crate::simulation::order_flow::Order;
use crate::types::TruckKind;

/// Everything that can happen during a run
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// The order generator releases its next order
    OrderArrival,
    /// An operator finished picking an order
    OrderCompleted(Order),
    /// The truck generator of one direction releases its next truck
    TruckArrival(TruckKind),
    /// A truck finished loading or unloading and leaves its dock
    TruckDeparted(Truck),
}

#[derive(Debug)]
struct ScheduledEvent {
    at: SimTime,
    seq: u64,
    event: SimEvent,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at.cmp(&other.at).then(self.seq.cmp(&other.seq))
    }
}

/// Priority-queue scheduler owning the run's clock
#[derive(Debug)]
pub struct Scheduler {
    clock: SimulationClock,
    queue: BinaryHeap<Reverse<ScheduledEvent>>,
    next_seq: u64,
    dispatched: u64,
}

impl Scheduler {
    /// Create an empty scheduler whose clock stops at `horizon_min`
    pub fn new(horizon_min: f64) -> Self {
        Self {
            clock: SimulationClock::new(horizon_min),
            queue: BinaryHeap::new(),
            next_seq: 0,
            dispatched: 0,
        }
    }

    /// Current virtual time
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// The run cutoff
    pub fn horizon(&self) -> SimTime {
        self.clock.horizon()
    }

    /// Schedule `event` at an absolute time (clamped to now)
    pub fn schedule_at(&mut self, at: SimTime, event: SimEvent) {
        let at = at.max(self.clock.now());
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(ScheduledEvent { at, seq, event }));
    }

    /// Schedule `event` `delay_min` minutes from now
    ///
    /// An event whose time overflows lies beyond any horizon and is dropped.
    pub fn schedule_in(&mut self, delay_min: f64, event: SimEvent) {
        let at = self.clock.now().as_minutes() + delay_min;
        if !at.is_finite() {
            debug!("Dropping {:?}: scheduled {} min ahead", event, delay_min);
            return;
        }
        self.schedule_at(SimTime::from_minutes(at), event);
    }

    /// Pop the next event before the horizon and advance the clock to it
    ///
    /// Returns `None` once the queue is empty or the earliest event lies at or beyond
    /// the horizon; in both cases the clock is moved to the horizon.
    pub fn next_event(&mut self) -> Option<SimEvent> {
        let due = match self.queue.peek() {
            Some(Reverse(next)) => !self.clock.is_beyond_horizon(next.at),
            None => false,
        };

        if !due {
            self.clock.finish();
            return None;
        }

        let Reverse(next) = self.queue.pop()?;
        self.clock.advance_to(next.at);
        self.dispatched += 1;
        Some(next.event)
    }

    /// Events still waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Events handed out so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_fire_in_time_order() {
        let mut scheduler = Scheduler::new(100.0);
        scheduler.schedule_at(SimTime::from_minutes(30.0), SimEvent::TruckArrival(TruckKind::Outbound));
        scheduler.schedule_at(SimTime::from_minutes(10.0), SimEvent::OrderArrival);
        scheduler.schedule_at(SimTime::from_minutes(20.0), SimEvent::TruckArrival(TruckKind::Inbound));

        assert_eq!(scheduler.next_event(), Some(SimEvent::OrderArrival));
        assert_eq!(scheduler.now().as_minutes(), 10.0);
        assert_eq!(scheduler.next_event(), Some(SimEvent::TruckArrival(TruckKind::Inbound)));
        assert_eq!(scheduler.next_event(), Some(SimEvent::TruckArrival(TruckKind::Outbound)));
        assert_eq!(scheduler.next_event(), None);
        assert_eq!(scheduler.dispatched(), 3);
    }

    #[test]
    fn test_equal_time_events_fire_in_scheduling_order() {
        let mut scheduler = Scheduler::new(100.0);
        scheduler.schedule_at(SimTime::ZERO, SimEvent::TruckArrival(TruckKind::Outbound));
        scheduler.schedule_at(SimTime::ZERO, SimEvent::OrderArrival);
        scheduler.schedule_at(SimTime::ZERO, SimEvent::TruckArrival(TruckKind::Inbound));

        assert_eq!(scheduler.next_event(), Some(SimEvent::TruckArrival(TruckKind::Outbound)));
        assert_eq!(scheduler.next_event(), Some(SimEvent::OrderArrival));
        assert_eq!(scheduler.next_event(), Some(SimEvent::TruckArrival(TruckKind::Inbound)));
    }

    #[test]
    fn test_events_at_or_past_horizon_are_not_dispatched() {
        let mut scheduler = Scheduler::new(50.0);
        scheduler.schedule_at(SimTime::from_minutes(49.0), SimEvent::OrderArrival);
        scheduler.schedule_at(SimTime::from_minutes(50.0), SimEvent::OrderArrival);
        scheduler.schedule_at(SimTime::from_minutes(75.0), SimEvent::OrderArrival);

        assert!(scheduler.next_event().is_some());
        assert!(scheduler.next_event().is_none());
        assert_eq!(scheduler.pending(), 2);
        assert_eq!(scheduler.now(), scheduler.horizon());
    }

    #[test]
    fn test_overflowing_delay_is_never_dispatched() {
        let mut scheduler = Scheduler::new(100.0);
        scheduler.schedule_in(f64::INFINITY, SimEvent::OrderArrival);
        scheduler.schedule_in(f64::MAX, SimEvent::OrderArrival);
        scheduler.schedule_in(f64::MAX, SimEvent::TruckArrival(TruckKind::Inbound));

        assert_eq!(scheduler.pending(), 2);
        assert_eq!(scheduler.next_event(), None);
        assert_eq!(scheduler.dispatched(), 0);
    }

    #[test]
    fn test_schedule_in_is_relative_to_now() {
        let mut scheduler = Scheduler::new(100.0);
        scheduler.schedule_at(SimTime::from_minutes(5.0), SimEvent::OrderArrival);
        scheduler.next_event();

        scheduler.schedule_in(2.5, SimEvent::TruckArrival(TruckKind::Inbound));
        scheduler.next_event();
        assert_eq!(scheduler.now().as_minutes(), 7.5);
    }
}
