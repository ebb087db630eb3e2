//! Order picking flow
//!
//! Orders arrive at a constant interval, each one waits for a free operator in FIFO
//! order, is picked for a fixed service time, and records its cycle time on completion.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::simulation::clock::SimTime;
use crate::simulation::resource::{Acquire, FifoPool, Sequenced};
use crate::simulation::scheduler::{Scheduler, SimEvent};
use crate::simulation::statistics::OrderStatistics;
use crate::types::{OrderId, PoolKind};

/// One customer order in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Arrival sequence number
    pub id: OrderId,
    /// When the order entered the warehouse
    pub arrived_at: SimTime,
    /// When an operator picked it up
    pub started_at: Option<SimTime>,
}

impl Sequenced for Order {
    fn sequence(&self) -> u64 {
        self.id.0
    }
}

/// Timing of the order stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderFlowPlan {
    /// Orders generated per run
    pub target_orders: u64,
    /// Constant gap between arrivals
    pub interval_min: f64,
    /// Operator time per order
    pub service_time_min: f64,
    /// Operators available
    pub staff_count: usize,
}

/// Order generator plus the staff pool it contends for
#[derive(Debug)]
pub struct OrderFlow {
    plan: OrderFlowPlan,
    staff: FifoPool<Order>,
    generated: u64,
    stats: OrderStatistics,
}

impl OrderFlow {
    /// Create the flow with an idle staff pool
    pub fn new(plan: OrderFlowPlan) -> Self {
        Self {
            staff: FifoPool::new(PoolKind::Staff, plan.staff_count),
            plan,
            generated: 0,
            stats: OrderStatistics::default(),
        }
    }

    /// Audit staff grants for FIFO ordering
    pub fn with_grant_trace(mut self) -> Self {
        self.staff = self.staff.with_grant_trace();
        self
    }

    /// Release the first order at t=0
    pub fn start(&mut self, scheduler: &mut Scheduler) {
        if self.plan.target_orders > 0 {
            scheduler.schedule_at(SimTime::ZERO, SimEvent::OrderArrival);
        }
    }

    /// Create the next order, request an operator for it, and arm the next arrival
    pub fn on_arrival(&mut self, scheduler: &mut Scheduler) {
        let now = scheduler.now();
        let order = Order { id: OrderId(self.generated), arrived_at: now, started_at: None };
        self.generated += 1;
        trace!("{} arrived at {}", order.id, now);

        if let Acquire::Granted(order) = self.staff.request(now, order) {
            self.begin_service(scheduler, order);
        }

        if self.generated < self.plan.target_orders {
            scheduler.schedule_in(self.plan.interval_min, SimEvent::OrderArrival);
        } else {
            debug!("Order generator exhausted after {} orders at {}", self.generated, now);
        }
    }

    /// Record the finished order and hand the operator to the next one in line
    pub fn on_completed(&mut self, scheduler: &mut Scheduler, order: Order) {
        let now = scheduler.now();
        let started_at = order.started_at.unwrap_or(order.arrived_at);
        self.stats.record_completion(
            now.minutes_since(order.arrived_at),
            started_at.minutes_since(order.arrived_at),
        );

        if let Some(next) = self.staff.release(now) {
            self.begin_service(scheduler, next);
        }
    }

    fn begin_service(&mut self, scheduler: &mut Scheduler, mut order: Order) {
        order.started_at = Some(scheduler.now());
        scheduler.schedule_in(self.plan.service_time_min, SimEvent::OrderCompleted(order));
    }

    /// Staff grant order, when tracing is enabled
    pub fn grant_trace(&self) -> Option<Vec<u64>> {
        self.staff.grant_trace().map(<[u64]>::to_vec)
    }

    /// Close the flow at the horizon and return its counters
    pub fn finish(mut self, horizon: SimTime) -> OrderStatistics {
        self.stats.generated = self.generated;
        self.stats.queued_at_cutoff = self.staff.queue_len() as u64;
        self.stats.in_service_at_cutoff = self.staff.in_use() as u64;
        self.stats.peak_queue = self.staff.peak_queue() as u64;
        self.stats.staff_utilization = self.staff.utilization(horizon);
        self.stats
    }
}
