//! Simulation engine and control
//!
//! This module contains the discrete-event engine, the order and dock flows it
//! drives, statistics collection, and error handling.
//!
//! # Overview
//!
//! - **Scheduler / SimulationClock**: priority queue of events on one virtual clock
//! - **FifoPool**: fixed-capacity resources granted strictly first-come, first-served
//! - **OrderFlow / DockFlow**: the order stream and the two truck streams
//! - **OrderFulfillmentSimulator / DockAugmentedSimulator**: validated front-ends whose
//!   `run()` returns a flat KPI report
//! - **RunStatistics / KpiReport**: counters and KPIs of a finished run
//!
//! # Usage Example
//!
//! ```rust
//! use warehouse_relocation_sim::simulation::*;
//! use warehouse_relocation_sim::types::*;
//!
//! let config = SimulationConfig {
//!     target_orders: 500,
//!     working_days: 1,
//!     ..Default::default()
//! };
//!
//! let simulator = DockAugmentedSimulator::new(config, DockParameters::new(20, 1.0))
//!     .unwrap()
//!     .with_seed(7);
//! let kpis = simulator.run();
//! assert!(kpis.achieved_throughput <= 500);
//! assert_eq!(kpis.to_map().len(), 8);
//! ```

pub mod clock;
pub mod dock_flow;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod order_flow;
pub mod random;
pub mod resource;
pub mod scheduler;
pub mod statistics;

// Re-export all public types for convenience
pub use clock::*;
pub use dock_flow::*;
pub use error::*;
pub use logging::*;
pub use orchestrator::*;
pub use order_flow::*;
pub use random::*;
pub use resource::*;
pub use scheduler::*;
pub use statistics::*;
