//! Core types and identifiers for the warehouse operations simulator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Identifiers**: run UUIDs plus per-run order and truck sequence numbers
//! - **Enums**: truck directions, resource pools, scenario classifications
//! - **Configuration**: horizon, volume, and dock traffic settings with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use warehouse_relocation_sim::types::*;
//!
//! let config = SimulationConfig {
//!     target_orders: 2_000,
//!     working_days: 5,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(config.truck_count(TruckKind::Inbound), 80);
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
