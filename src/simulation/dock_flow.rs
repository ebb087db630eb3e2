//! Dock traffic flow
//!
//! Inbound and outbound trucks form two independent lanes. Each lane releases its
//! trucks at a jittered nominal interval, queues them FIFO for a dock of its own
//! pool, and holds the dock for a randomly drawn loading or unloading time. The lanes
//! never touch the staff pool.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::simulation::clock::SimTime;
use crate::simulation::random::RandomSource;
use crate::simulation::resource::{Acquire, FifoPool, Sequenced};
use crate::simulation::scheduler::{Scheduler, SimEvent};
use crate::simulation::statistics::TruckStatistics;
use crate::types::{SimulationConfig, TruckId, TruckKind, UniformRange};

/// One delivery vehicle in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    /// Arrival sequence number within its lane
    pub id: TruckId,
    /// Inbound or outbound
    pub kind: TruckKind,
    /// When the truck reached the yard
    pub arrived_at: SimTime,
    /// When a dock was granted
    pub docked_at: Option<SimTime>,
    /// Drawn loading or unloading time, set at dock grant
    pub service_min: Option<f64>,
}

impl Sequenced for Truck {
    fn sequence(&self) -> u64 {
        self.id.0
    }
}

/// Docks and truck stream for one direction
#[derive(Debug)]
struct TruckLane {
    kind: TruckKind,
    docks: FifoPool<Truck>,
    nominal_interval_min: Option<f64>,
    total: u64,
    generated: u64,
    service: UniformRange,
    stats: TruckStatistics,
}

impl TruckLane {
    fn new(config: &SimulationConfig, kind: TruckKind, dock_count: usize) -> Self {
        Self {
            kind,
            docks: FifoPool::new(kind.pool(), dock_count),
            nominal_interval_min: config.truck_interval_min(kind),
            total: config.truck_count(kind),
            generated: 0,
            service: config.dock.service_range(kind),
            stats: TruckStatistics { dock_count, ..Default::default() },
        }
    }

    fn on_arrival(
        &mut self,
        scheduler: &mut Scheduler,
        random: &mut RandomSource,
        jitter: UniformRange,
    ) {
        let now = scheduler.now();
        let truck = Truck {
            id: TruckId(self.generated),
            kind: self.kind,
            arrived_at: now,
            docked_at: None,
            service_min: None,
        };
        self.generated += 1;
        trace!("{} truck {} arrived at {}", self.kind, truck.id, now);

        if let Acquire::Granted(truck) = self.docks.request(now, truck) {
            self.begin_service(scheduler, random, truck);
        }

        match self.nominal_interval_min {
            Some(nominal) if self.generated < self.total => {
                let delay = random.jittered(nominal, jitter);
                scheduler.schedule_in(delay, SimEvent::TruckArrival(self.kind));
            }
            _ => debug!("{} truck generator exhausted after {} trucks", self.kind, self.generated),
        }
    }

    fn on_departed(&mut self, scheduler: &mut Scheduler, random: &mut RandomSource, truck: Truck) {
        let now = scheduler.now();
        self.stats.served += 1;
        trace!("{} truck {} left its dock at {}", self.kind, truck.id, now);

        if let Some(next) = self.docks.release(now) {
            self.begin_service(scheduler, random, next);
        }
    }

    fn begin_service(
        &mut self,
        scheduler: &mut Scheduler,
        random: &mut RandomSource,
        mut truck: Truck,
    ) {
        let now = scheduler.now();
        self.stats.record_wait(now.minutes_since(truck.arrived_at));

        let service_min = random.sample(self.service);
        truck.docked_at = Some(now);
        truck.service_min = Some(service_min);
        scheduler.schedule_in(service_min, SimEvent::TruckDeparted(truck));
    }

    fn finish(mut self, horizon: SimTime) -> TruckStatistics {
        self.stats.generated = self.generated;
        self.stats.queued_at_cutoff = self.docks.queue_len() as u64;
        self.stats.at_dock_at_cutoff = self.docks.in_use() as u64;
        self.stats.peak_queue = self.docks.peak_queue() as u64;
        self.stats.dock_utilization = self.docks.utilization(horizon);
        self.stats
    }
}

/// Inbound and outbound truck lanes sharing one random source
#[derive(Debug)]
pub struct DockFlow {
    inbound: TruckLane,
    outbound: TruckLane,
    jitter: UniformRange,
    random: RandomSource,
}

impl DockFlow {
    /// Create both lanes with idle docks
    pub fn new(
        config: &SimulationConfig,
        inbound_dock_count: usize,
        outbound_dock_count: usize,
        random: RandomSource,
    ) -> Self {
        let inbound = TruckLane::new(config, TruckKind::Inbound, inbound_dock_count);
        let outbound = TruckLane::new(config, TruckKind::Outbound, outbound_dock_count);
        debug!(
            "Dock flow: {} inbound trucks on {} docks, {} outbound trucks on {} docks",
            inbound.total, inbound_dock_count, outbound.total, outbound_dock_count
        );

        Self { inbound, outbound, jitter: config.dock.arrival_jitter, random }
    }

    /// Audit dock grants for FIFO ordering in both lanes
    pub fn with_grant_trace(mut self) -> Self {
        self.inbound.docks = self.inbound.docks.with_grant_trace();
        self.outbound.docks = self.outbound.docks.with_grant_trace();
        self
    }

    /// Release the first truck of each lane at t=0
    pub fn start(&mut self, scheduler: &mut Scheduler) {
        for kind in TruckKind::ALL {
            if self.lane(kind).total > 0 {
                scheduler.schedule_at(SimTime::ZERO, SimEvent::TruckArrival(kind));
            }
        }
    }

    /// Handle the next truck of one lane
    pub fn on_arrival(&mut self, scheduler: &mut Scheduler, kind: TruckKind) {
        let lane = match kind {
            TruckKind::Inbound => &mut self.inbound,
            TruckKind::Outbound => &mut self.outbound,
        };
        lane.on_arrival(scheduler, &mut self.random, self.jitter);
    }

    /// Count the served truck and pass its dock to the next one in line
    pub fn on_departed(&mut self, scheduler: &mut Scheduler, truck: Truck) {
        let lane = match truck.kind {
            TruckKind::Inbound => &mut self.inbound,
            TruckKind::Outbound => &mut self.outbound,
        };
        lane.on_departed(scheduler, &mut self.random, truck);
    }

    /// Dock grant order of one lane, when tracing is enabled
    pub fn grant_trace(&self, kind: TruckKind) -> Option<Vec<u64>> {
        self.lane(kind).docks.grant_trace().map(<[u64]>::to_vec)
    }

    fn lane(&self, kind: TruckKind) -> &TruckLane {
        match kind {
            TruckKind::Inbound => &self.inbound,
            TruckKind::Outbound => &self.outbound,
        }
    }

    /// Close both lanes at the horizon and return inbound and outbound counters
    pub fn finish(self, horizon: SimTime) -> (TruckStatistics, TruckStatistics) {
        (self.inbound.finish(horizon), self.outbound.finish(horizon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        // 100 orders over one 480-minute day: 4 inbound and 6 outbound trucks
        SimulationConfig {
            target_orders: 100,
            working_days: 1,
            ..Default::default()
        }
    }

    fn drive(flow: &mut DockFlow, scheduler: &mut Scheduler) {
        flow.start(scheduler);
        while let Some(event) = scheduler.next_event() {
            match event {
                SimEvent::TruckArrival(kind) => flow.on_arrival(scheduler, kind),
                SimEvent::TruckDeparted(truck) => flow.on_departed(scheduler, truck),
                other => panic!("unexpected event {:?}", other),
            }
        }
    }

    #[test]
    fn test_every_truck_is_served_with_ample_docks() {
        let config = small_config();
        let mut flow = DockFlow::new(&config, 10, 10, RandomSource::seeded(11));
        let mut scheduler = Scheduler::new(config.run_horizon_min());
        drive(&mut flow, &mut scheduler);

        let (inbound, outbound) = flow.finish(scheduler.horizon());
        assert_eq!(inbound.generated, 4);
        assert_eq!(outbound.generated, 6);
        assert_eq!(inbound.served, 4);
        assert_eq!(outbound.served, 6);
        assert_eq!(inbound.average_wait_min(), 0.0);
        assert_eq!(outbound.max_wait_min, 0.0);
    }

    #[test]
    fn test_single_dock_makes_trucks_wait_in_order() {
        let config = small_config();
        let mut flow = DockFlow::new(&config, 1, 1, RandomSource::seeded(5)).with_grant_trace();
        let mut scheduler = Scheduler::new(config.run_horizon_min());
        drive(&mut flow, &mut scheduler);

        for kind in TruckKind::ALL {
            let trace = flow.grant_trace(kind).unwrap_or_default();
            assert!(!trace.is_empty());
            assert!(trace.windows(2).all(|pair| pair[0] < pair[1]), "{} grants {:?}", kind, trace);
        }

        // Outbound trucks arrive every ~80 minutes but need 60-120 minutes each
        let (_, outbound) = flow.finish(scheduler.horizon());
        assert_eq!(outbound.docked, outbound.served + outbound.at_dock_at_cutoff);
        assert!(outbound.max_wait_min >= outbound.average_wait_min());
    }

    #[test]
    fn test_no_trucks_when_volume_rounds_to_zero() {
        let config = SimulationConfig {
            target_orders: 5,
            working_days: 1,
            ..Default::default()
        };
        let mut flow = DockFlow::new(&config, 4, 4, RandomSource::seeded(1));
        let mut scheduler = Scheduler::new(config.run_horizon_min());
        flow.start(&mut scheduler);
        assert_eq!(scheduler.pending(), 0);

        let (inbound, outbound) = flow.finish(scheduler.horizon());
        assert_eq!(inbound.generated + outbound.generated, 0);
        assert_eq!(inbound.average_wait_min(), 0.0);
    }

    #[test]
    fn test_zero_docks_serve_nothing() {
        let config = small_config();
        let mut flow = DockFlow::new(&config, 0, 0, RandomSource::seeded(2));
        let mut scheduler = Scheduler::new(config.run_horizon_min());
        drive(&mut flow, &mut scheduler);

        let (inbound, outbound) = flow.finish(scheduler.horizon());
        assert_eq!(inbound.served + outbound.served, 0);
        assert_eq!(inbound.queued_at_cutoff, 4);
        assert_eq!(outbound.queued_at_cutoff, 6);
    }
}
