//! Error types and handling
//!
//! This module contains error types and error handling for the simulation. Runs
//! themselves never fail; every error here is raised while loading configuration or
//! constructing a simulator, before any virtual time has advanced.

use thiserror::Error;
use tracing::{debug, error};

use crate::types::{ConfigError, ConfigValidationError, TruckKind};

/// Errors that can occur while setting up a simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ConfigurationError(#[from] ConfigValidationError),

    /// Configuration could not be loaded
    #[error("Configuration loading failed: {0}")]
    ConfigLoadError(#[from] ConfigError),

    /// The staff pool would have no operators
    #[error("Invalid staff count: {0} (must be at least 1)")]
    InvalidStaffCount(usize),

    /// The efficiency multiplier is not a positive finite number
    #[error("Invalid efficiency multiplier: {0} (must be positive and finite)")]
    InvalidEfficiency(f64),

    /// Base service time divided by efficiency overflows
    #[error("Invalid service time: {0} minutes per order (base service time / efficiency must be finite)")]
    InvalidServiceTime(f64),

    /// A dock pool would have no docks while dock simulation is enabled
    #[error("Invalid {kind} dock count: {count} (must be at least 1 when dock simulation is enabled)")]
    InvalidDockCount {
        /// Dock pool that was misconfigured
        kind: TruckKind,
        /// Rejected value
        count: usize,
    },

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl SimulationError {
    /// Create a dock count error
    pub fn invalid_dock_count(kind: TruckKind, count: usize) -> Self {
        Self::InvalidDockCount { kind, count }
    }

    /// Whether the error comes from caller-supplied parameters rather than the environment
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, SimulationError::IoError(_) | SimulationError::SerializationError(_))
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::ConfigLoadError(_) => "Configuration",
            SimulationError::InvalidStaffCount(_) => "Staffing",
            SimulationError::InvalidEfficiency(_) => "Staffing",
            SimulationError::InvalidServiceTime(_) => "Staffing",
            SimulationError::InvalidDockCount { .. } => "Docks",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }

    /// Log the error with its category
    pub fn log(&self) {
        error!("{} error: {}", self.category(), self);
        if let SimulationError::ConfigurationError(inner) = self {
            debug!("Validation detail: {:?}", inner);
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;
