//! Relocation scenarios
//!
//! Each scenario turns an attrition rate and an automation level into a staff count
//! and an efficiency multiplier for the simulator. The sweep runs them all against
//! one configuration and classifies the outcomes.
//!
//! # Usage Example
//!
//! ```rust
//! use warehouse_relocation_sim::scenario::*;
//! use warehouse_relocation_sim::types::*;
//!
//! let config = SimulationConfig {
//!     target_orders: 300,
//!     working_days: 1,
//!     seed: Some(1),
//!     ..Default::default()
//! };
//!
//! let outcomes = ScenarioSweep::new(config)?.run()?;
//! assert_eq!(outcomes.len(), 4);
//! assert_eq!(outcomes[1].staff_count, 85);
//! # Ok::<(), warehouse_relocation_sim::simulation::SimulationError>(())
//! ```

pub mod catalog;
pub mod sweep;

pub use catalog::*;
pub use sweep::*;
