//! FIFO counting resources
//!
//! A pool hands out up to `capacity` identical units. Requests beyond capacity wait in
//! arrival order; a release passes the freed unit straight to the head of the queue at
//! the same virtual instant.

use std::collections::VecDeque;

use crate::simulation::clock::SimTime;
use crate::types::PoolKind;

/// Work items that carry an arrival sequence number
pub trait Sequenced {
    /// Position of the item in its arrival stream
    fn sequence(&self) -> u64;
}

/// Outcome of a resource request
#[derive(Debug, Clone, PartialEq)]
pub enum Acquire<T> {
    /// A unit was free; the requester holds it from now on
    Granted(T),
    /// Capacity is exhausted; the requester waits in the FIFO queue
    Queued,
}

/// Fixed-capacity resource with strict first-come, first-served grants
#[derive(Debug)]
pub struct FifoPool<T> {
    kind: PoolKind,
    capacity: usize,
    in_use: usize,
    waiting: VecDeque<T>,
    grants: u64,
    peak_queue: usize,
    busy_unit_minutes: f64,
    last_change: SimTime,
    grant_trace: Option<Vec<u64>>,
}

impl<T: Sequenced> FifoPool<T> {
    /// Create an idle pool
    pub fn new(kind: PoolKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            in_use: 0,
            waiting: VecDeque::new(),
            grants: 0,
            peak_queue: 0,
            busy_unit_minutes: 0.0,
            last_change: SimTime::ZERO,
            grant_trace: None,
        }
    }

    /// Record the sequence number of every grant, in grant order
    pub fn with_grant_trace(mut self) -> Self {
        self.grant_trace = Some(Vec::new());
        self
    }

    /// Which resource this pool models
    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    /// Total units
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Units currently held
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Requesters currently waiting
    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }

    /// Longest queue observed
    pub fn peak_queue(&self) -> usize {
        self.peak_queue
    }

    /// Grants handed out so far
    pub fn grants(&self) -> u64 {
        self.grants
    }

    /// Sequence numbers in grant order, when tracing is enabled
    pub fn grant_trace(&self) -> Option<&[u64]> {
        self.grant_trace.as_deref()
    }

    /// Ask for one unit at `now`
    pub fn request(&mut self, now: SimTime, unit: T) -> Acquire<T> {
        if self.in_use < self.capacity && self.waiting.is_empty() {
            self.accumulate(now);
            self.in_use += 1;
            self.record_grant(&unit);
            Acquire::Granted(unit)
        } else {
            self.waiting.push_back(unit);
            self.peak_queue = self.peak_queue.max(self.waiting.len());
            Acquire::Queued
        }
    }

    /// Return one unit at `now`; the next waiter, if any, is granted immediately
    pub fn release(&mut self, now: SimTime) -> Option<T> {
        debug_assert!(self.in_use > 0, "{} pool released more units than granted", self.kind);
        self.accumulate(now);

        match self.waiting.pop_front() {
            Some(next) => {
                self.record_grant(&next);
                Some(next)
            }
            None => {
                self.in_use = self.in_use.saturating_sub(1);
                None
            }
        }
    }

    /// Share of unit-minutes spent busy between t=0 and `until` (0.0-1.0)
    pub fn utilization(&self, until: SimTime) -> f64 {
        let span = until.as_minutes();
        if self.capacity == 0 || span <= 0.0 {
            return 0.0;
        }
        let open = self.in_use as f64 * until.minutes_since(self.last_change);
        (self.busy_unit_minutes + open) / (self.capacity as f64 * span)
    }

    fn accumulate(&mut self, now: SimTime) {
        self.busy_unit_minutes += self.in_use as f64 * now.minutes_since(self.last_change);
        self.last_change = self.last_change.max(now);
    }

    fn record_grant(&mut self, unit: &T) {
        self.grants += 1;
        if let Some(trace) = self.grant_trace.as_mut() {
            trace.push(unit.sequence());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Job(u64);

    impl Sequenced for Job {
        fn sequence(&self) -> u64 {
            self.0
        }
    }

    fn t(minutes: f64) -> SimTime {
        SimTime::from_minutes(minutes)
    }

    #[test]
    fn test_grants_until_capacity_then_queues() {
        let mut pool = FifoPool::new(PoolKind::Staff, 2);

        assert_eq!(pool.request(t(0.0), Job(0)), Acquire::Granted(Job(0)));
        assert_eq!(pool.request(t(0.0), Job(1)), Acquire::Granted(Job(1)));
        assert_eq!(pool.request(t(0.0), Job(2)), Acquire::Queued);
        assert_eq!(pool.in_use(), 2);
        assert_eq!(pool.queue_len(), 1);
    }

    #[test]
    fn test_release_hands_unit_to_oldest_waiter() {
        let mut pool = FifoPool::new(PoolKind::InboundDock, 1).with_grant_trace();

        pool.request(t(0.0), Job(0));
        pool.request(t(1.0), Job(1));
        pool.request(t(2.0), Job(2));

        assert_eq!(pool.release(t(5.0)), Some(Job(1)));
        assert_eq!(pool.release(t(6.0)), Some(Job(2)));
        assert_eq!(pool.release(t(7.0)), None);
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.grant_trace(), Some(&[0, 1, 2][..]));
        assert_eq!(pool.grants(), 3);
        assert_eq!(pool.peak_queue(), 2);
    }

    #[test]
    fn test_new_request_cannot_jump_the_queue() {
        let mut pool = FifoPool::new(PoolKind::Staff, 1);

        pool.request(t(0.0), Job(0));
        pool.request(t(0.5), Job(1));
        // Unit passes directly to Job(1), so a later arrival still waits
        assert_eq!(pool.release(t(1.0)), Some(Job(1)));
        assert_eq!(pool.request(t(1.0), Job(2)), Acquire::Queued);
    }

    #[test]
    fn test_zero_capacity_never_grants() {
        let mut pool = FifoPool::new(PoolKind::OutboundDock, 0);
        assert_eq!(pool.request(t(0.0), Job(0)), Acquire::Queued);
        assert_eq!(pool.request(t(1.0), Job(1)), Acquire::Queued);
        assert_eq!(pool.grants(), 0);
        assert_eq!(pool.utilization(t(10.0)), 0.0);
    }

    #[test]
    fn test_utilization_integrates_busy_time() {
        let mut pool = FifoPool::new(PoolKind::Staff, 2);

        pool.request(t(0.0), Job(0));
        pool.request(t(5.0), Job(1));
        pool.release(t(10.0));
        // Unit-minutes: one unit 0..10, one unit 5..10, one unit 10..20
        let utilization = pool.utilization(t(20.0));
        assert!((utilization - 25.0 / 40.0).abs() < 1e-12);
    }
}
