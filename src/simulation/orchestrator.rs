//! Simulation front-ends and the shared run loop
//!
//! `OrderFulfillmentSimulator` runs the order flow alone. `DockAugmentedSimulator`
//! composes the same order flow with an optional dock flow on one scheduler. Both
//! validate their parameters at construction; a run itself cannot fail.

use std::time::{Duration, Instant};

use tracing::{debug, field, info, instrument};

use crate::simulation::dock_flow::DockFlow;
use crate::simulation::order_flow::{OrderFlow, OrderFlowPlan};
use crate::simulation::random::RandomSource;
use crate::simulation::scheduler::{Scheduler, SimEvent};
use crate::simulation::statistics::{GrantTrace, KpiReport, RunStatistics};
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{defaults, RunId, SimulationConfig, TruckKind};
use crate::{perf_span, sim_event};

/// Scenario parameters of a dock-augmented run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockParameters {
    /// Operators in the staff pool
    pub staff_count: usize,
    /// Processing-speed multiplier applied to the base service time
    pub efficiency_multiplier: f64,
    /// Inbound docks
    pub inbound_dock_count: usize,
    /// Outbound docks
    pub outbound_dock_count: usize,
    /// When false the run is identical to an order-only run
    pub enable_dock_simulation: bool,
}

impl DockParameters {
    /// Staffing parameters with the default 4/4 docks and dock simulation enabled
    pub fn new(staff_count: usize, efficiency_multiplier: f64) -> Self {
        Self {
            staff_count,
            efficiency_multiplier,
            inbound_dock_count: defaults::DOCK_COUNT,
            outbound_dock_count: defaults::DOCK_COUNT,
            enable_dock_simulation: true,
        }
    }

    /// Staffing parameters with dock settings taken from `config`
    pub fn from_config(config: &SimulationConfig, staff_count: usize, efficiency_multiplier: f64) -> Self {
        Self {
            staff_count,
            efficiency_multiplier,
            inbound_dock_count: config.inbound_dock_count,
            outbound_dock_count: config.outbound_dock_count,
            enable_dock_simulation: config.enable_dock_simulation,
        }
    }

    /// Override both dock counts
    pub fn with_docks(mut self, inbound_dock_count: usize, outbound_dock_count: usize) -> Self {
        self.inbound_dock_count = inbound_dock_count;
        self.outbound_dock_count = outbound_dock_count;
        self
    }

    /// Turn the dock flow off
    pub fn without_docks(mut self) -> Self {
        self.enable_dock_simulation = false;
        self
    }

    /// Reject empty dock pools; dock counts are ignored while the dock flow is off
    pub fn check_docks(&self) -> SimulationResult<()> {
        if !self.enable_dock_simulation {
            return Ok(());
        }
        for (kind, count) in [
            (TruckKind::Inbound, self.inbound_dock_count),
            (TruckKind::Outbound, self.outbound_dock_count),
        ] {
            if count == 0 {
                return Err(SimulationError::invalid_dock_count(kind, count));
            }
        }
        Ok(())
    }
}

/// Order stream contending for a staff pool
#[derive(Debug, Clone)]
pub struct OrderFulfillmentSimulator {
    config: SimulationConfig,
    staff_count: usize,
    efficiency_multiplier: f64,
    trace_grants: bool,
}

impl OrderFulfillmentSimulator {
    /// Create a simulator after validating the configuration and staffing
    #[instrument(skip(config), fields(target_orders = config.target_orders))]
    pub fn new(
        config: SimulationConfig,
        staff_count: usize,
        efficiency_multiplier: f64,
    ) -> SimulationResult<Self> {
        config.validate()?;

        if staff_count == 0 {
            return Err(SimulationError::InvalidStaffCount(staff_count));
        }
        if !(efficiency_multiplier.is_finite() && efficiency_multiplier > 0.0) {
            return Err(SimulationError::InvalidEfficiency(efficiency_multiplier));
        }
        let service_time_min = config.service_time_min(efficiency_multiplier);
        if !service_time_min.is_finite() {
            return Err(SimulationError::InvalidServiceTime(service_time_min));
        }

        debug!(
            "Order simulator ready: {} orders every {:.3} min, {:.2} min service",
            config.target_orders,
            config.order_interval_min(),
            service_time_min
        );

        Ok(Self { config, staff_count, efficiency_multiplier, trace_grants: false })
    }

    /// Record grant order per pool in the run statistics
    pub fn with_grant_trace(mut self) -> Self {
        self.trace_grants = true;
        self
    }

    /// Configuration the simulator was built with
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Operators in the staff pool
    pub fn staff_count(&self) -> usize {
        self.staff_count
    }

    /// Processing-speed multiplier
    pub fn efficiency_multiplier(&self) -> f64 {
        self.efficiency_multiplier
    }

    /// Run once and return the flat KPI report
    pub fn run(&self) -> KpiReport {
        self.run_detailed().kpis()
    }

    /// Run once and return the full run statistics
    pub fn run_detailed(&self) -> RunStatistics {
        execute(self, None, None)
    }
}

/// Order stream plus independent inbound and outbound truck streams on one clock
#[derive(Debug, Clone)]
pub struct DockAugmentedSimulator {
    base: OrderFulfillmentSimulator,
    inbound_dock_count: usize,
    outbound_dock_count: usize,
    enable_dock_simulation: bool,
    seed: Option<u64>,
    random: Option<RandomSource>,
}

impl DockAugmentedSimulator {
    /// Create a simulator after validating the configuration, staffing, and docks
    #[instrument(skip(config), fields(target_orders = config.target_orders))]
    pub fn new(config: SimulationConfig, params: DockParameters) -> SimulationResult<Self> {
        let seed = config.seed;
        let base =
            OrderFulfillmentSimulator::new(config, params.staff_count, params.efficiency_multiplier)?;

        params.check_docks()?;
        if !params.enable_dock_simulation {
            debug!("Dock simulation disabled, running the order flow only");
        }

        Ok(Self {
            base,
            inbound_dock_count: params.inbound_dock_count,
            outbound_dock_count: params.outbound_dock_count,
            enable_dock_simulation: params.enable_dock_simulation,
            seed,
            random: None,
        })
    }

    /// Pin the random source so repeated runs draw identical truck traffic
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.random = None;
        self
    }

    /// Draw truck traffic from `random`
    ///
    /// Every run starts from a copy of the source in its current state, so repeated
    /// runs see the same draws.
    pub fn with_random_source(mut self, random: RandomSource) -> Self {
        self.seed = random.seed();
        self.random = Some(random);
        self
    }

    /// Record grant order per pool in the run statistics
    pub fn with_grant_trace(mut self) -> Self {
        self.base = self.base.with_grant_trace();
        self
    }

    /// The order-only simulator this one extends
    pub fn base(&self) -> &OrderFulfillmentSimulator {
        &self.base
    }

    /// Whether truck traffic is simulated
    pub fn docks_enabled(&self) -> bool {
        self.enable_dock_simulation
    }

    /// Seed used for truck traffic, if pinned
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Run once and return the flat KPI report
    pub fn run(&self) -> KpiReport {
        self.run_detailed().kpis()
    }

    /// Run once and return the full run statistics
    pub fn run_detailed(&self) -> RunStatistics {
        if !self.enable_dock_simulation {
            return self.base.run_detailed();
        }

        let docks = DockFlow::new(
            &self.base.config,
            self.inbound_dock_count,
            self.outbound_dock_count,
            self.random.clone().unwrap_or_else(|| RandomSource::from_seed(self.seed)),
        );
        execute(&self.base, Some(docks), self.seed)
    }
}

fn execute(sim: &OrderFulfillmentSimulator, docks: Option<DockFlow>, seed: Option<u64>) -> RunStatistics {
    let config = &sim.config;
    let run_id = RunId::new();
    let span = perf_span!(
        "simulation_run",
        run_id = field::display(&run_id),
        staff_count = sim.staff_count,
        efficiency = sim.efficiency_multiplier,
        docks = docks.is_some(),
    );
    let _enter = span.enter();
    let started = Instant::now();

    let plan = OrderFlowPlan {
        target_orders: u64::from(config.target_orders),
        interval_min: config.order_interval_min(),
        service_time_min: config.service_time_min(sim.efficiency_multiplier),
        staff_count: sim.staff_count,
    };
    let mut orders = OrderFlow::new(plan);
    let mut docks = docks;
    if sim.trace_grants {
        orders = orders.with_grant_trace();
        docks = docks.map(DockFlow::with_grant_trace);
    }

    let mut scheduler = Scheduler::new(config.run_horizon_min());
    orders.start(&mut scheduler);
    if let Some(docks) = docks.as_mut() {
        docks.start(&mut scheduler);
    }

    while let Some(event) = scheduler.next_event() {
        match event {
            SimEvent::OrderArrival => orders.on_arrival(&mut scheduler),
            SimEvent::OrderCompleted(order) => orders.on_completed(&mut scheduler, order),
            SimEvent::TruckArrival(kind) => {
                if let Some(docks) = docks.as_mut() {
                    docks.on_arrival(&mut scheduler, kind);
                }
            }
            SimEvent::TruckDeparted(truck) => {
                if let Some(docks) = docks.as_mut() {
                    docks.on_departed(&mut scheduler, truck);
                }
            }
        }
    }

    let grant_trace = sim.trace_grants.then(|| GrantTrace {
        staff: orders.grant_trace().unwrap_or_default(),
        inbound: docks.as_ref().and_then(|d| d.grant_trace(TruckKind::Inbound)),
        outbound: docks.as_ref().and_then(|d| d.grant_trace(TruckKind::Outbound)),
    });

    let horizon = scheduler.horizon();
    let (inbound, outbound) = match docks {
        Some(docks) => {
            let (inbound, outbound) = docks.finish(horizon);
            (Some(inbound), Some(outbound))
        }
        None => (None, None),
    };

    let mut statistics = RunStatistics {
        run_id,
        staff_count: sim.staff_count,
        efficiency_multiplier: sim.efficiency_multiplier,
        target_orders: u64::from(config.target_orders),
        horizon_min: horizon.as_minutes(),
        seed: if inbound.is_some() { seed } else { None },
        orders: orders.finish(horizon),
        inbound,
        outbound,
        events_dispatched: scheduler.dispatched(),
        simulation_duration: Duration::ZERO,
        grant_trace,
    };
    statistics.set_simulation_duration(started.elapsed());

    sim_event!(
        info,
        "Simulation run completed",
        run_id = field::display(&statistics.run_id),
        processed = statistics.orders.processed,
        left_at_cutoff = statistics.orders.left_at_cutoff(),
        events = statistics.events_dispatched,
    );
    if statistics.truncated() {
        info!(
            "{} orders were still queued or in service at the {:.0} min cutoff",
            statistics.orders.left_at_cutoff(),
            statistics.horizon_min
        );
    }

    statistics
}
