//! Warehouse Relocation Simulator
//!
//! A discrete-event simulation of order picking and dock traffic used to compare
//! staffing and automation strategies for relocating a warehouse.
//!
//! # Overview
//!
//! Orders arrive at a constant rate and contend for a pool of interchangeable
//! operators. Inbound and outbound trucks arrive with jittered spacing and contend for
//! two separate dock pools. All three streams share one virtual clock; every pool
//! grants strictly first-come, first-served. A run stops at a fixed horizon and
//! reports throughput, cycle time, and truck wait times.
//!
//! ## Key Features
//!
//! - **Deterministic engine**: single-threaded event queue with FIFO tie-breaking
//! - **Composable flows**: an order flow with an optional dock flow on the same clock
//! - **Reproducible randomness**: truck traffic draws from a seedable source
//! - **Relocation scenarios**: attrition and automation levels mapped to staffing runs
//! - **Configurable**: JSON configuration files with CLI overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use warehouse_relocation_sim::*;
//!
//! let config = SimulationConfig {
//!     target_orders: 1_000,
//!     working_days: 2,
//!     ..Default::default()
//! };
//!
//! let simulator = OrderFulfillmentSimulator::new(config, 40, 1.0)?;
//! let kpis = simulator.run();
//!
//! assert_eq!(kpis.achieved_throughput, 1_000);
//! assert_eq!(kpis.avg_cycle_time_min, 15.0);
//! # Ok::<(), SimulationError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: configuration, identifiers, and enums
//! - [`simulation`]: the event engine, flows, simulators, and statistics
//! - [`scenario`]: relocation scenarios and the sweep that runs them
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod scenario;
pub mod simulation;
pub mod types;

// Core types and configuration
pub use types::{
    ConfigError, ConfigValidationError, DockBottleneck, DockFlowConfig, RunId, SimulationConfig,
    ThroughputStatus, TruckKind, UniformRange,
};

// Simulators and their results
pub use simulation::{
    DockAugmentedSimulator, DockKpis, DockParameters, KpiReport, KpiValue,
    OrderFulfillmentSimulator, RandomSource, RunStatistics, SimulationError, SimulationResult,
};

// Scenario sweep
pub use scenario::{relocation_scenarios, RelocationScenario, ScenarioOutcome, ScenarioSweep};
