//! Configuration structures for the warehouse operations simulator
//!
//! This module contains the simulation configuration structure and validation logic
//! used to control the horizon, target volume, and dock traffic of every run.

use super::TruckKind;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default operating constants for a monthly relocation study
pub mod defaults {
    /// Orders the warehouse must ship per simulated month
    pub const TARGET_ORDERS: u32 = 10_000;

    /// Working days in the simulated month
    pub const WORKING_DAYS: u32 = 20;

    /// Length of one working day in minutes (8-hour shift)
    pub const MINUTES_PER_DAY: f64 = 8.0 * 60.0;

    /// Minutes one operator needs for one order without automation
    pub const BASE_SERVICE_TIME_MIN: f64 = 15.0;

    /// Multiplier applied to the nominal horizon so the backlog can drain
    pub const HORIZON_BUFFER: f64 = 1.5;

    /// Operators employed before the relocation
    pub const INITIAL_STAFF: usize = 100;

    /// Docks per direction when no sizing study says otherwise
    pub const DOCK_COUNT: usize = 4;

    /// Average truck wait above which a dock type is reported as congested
    pub const DOCK_WAIT_ALERT_MIN: f64 = 60.0;

    /// Share of monthly order volume received through inbound trucks
    pub const INBOUND_SHARE: f64 = 0.4;

    /// Share of monthly order volume shipped through outbound trucks
    pub const OUTBOUND_SHARE: f64 = 0.6;

    /// Orders consolidated onto one truck
    pub const ORDERS_PER_TRUCK: u32 = 10;
}

/// Closed interval `[low, high]` sampled uniformly
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UniformRange {
    /// Lower bound (inclusive)
    pub low: f64,
    /// Upper bound (inclusive)
    pub high: f64,
}

impl UniformRange {
    /// Create a new range
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Midpoint of the range
    pub fn mean(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// Whether `value` lies inside the range
    pub fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }

    fn is_well_formed(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low <= self.high
    }
}

/// Truck traffic parameters for the dock flow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DockFlowConfig {
    /// Fraction of the order target that arrives on inbound trucks (0.0-1.0)
    pub inbound_share: f64,
    /// Fraction of the order target that leaves on outbound trucks (0.0-1.0)
    pub outbound_share: f64,
    /// Orders consolidated onto one truck
    pub orders_per_truck: u32,
    /// Multiplicative jitter applied to every nominal inter-arrival interval
    pub arrival_jitter: UniformRange,
    /// Unloading time of an inbound truck in minutes
    pub inbound_service_min: UniformRange,
    /// Loading time of an outbound truck in minutes
    pub outbound_service_min: UniformRange,
}

impl Default for DockFlowConfig {
    fn default() -> Self {
        Self {
            inbound_share: defaults::INBOUND_SHARE,
            outbound_share: defaults::OUTBOUND_SHARE,
            orders_per_truck: defaults::ORDERS_PER_TRUCK,
            arrival_jitter: UniformRange::new(0.8, 1.2),
            inbound_service_min: UniformRange::new(90.0, 150.0),
            outbound_service_min: UniformRange::new(60.0, 120.0),
        }
    }
}

impl DockFlowConfig {
    /// Share of the order target carried by trucks of `kind`
    pub fn share(&self, kind: TruckKind) -> f64 {
        match kind {
            TruckKind::Inbound => self.inbound_share,
            TruckKind::Outbound => self.outbound_share,
        }
    }

    /// Service-time range for trucks of `kind`
    pub fn service_range(&self, kind: TruckKind) -> UniformRange {
        match kind {
            TruckKind::Inbound => self.inbound_service_min,
            TruckKind::Outbound => self.outbound_service_min,
        }
    }
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "warehouse-sim",
    version = "0.1.0",
    about = "Warehouse Relocation Simulator - Estimates throughput and dock congestion per staffing scenario",
    long_about = "Runs a discrete-event simulation of order picking and dock traffic for a relocated warehouse. Each relocation scenario fixes a staff count and a processing-speed multiplier; the simulator reports throughput, cycle time, and truck wait times.

EXAMPLES:
    # Run the four relocation scenarios with default settings
    warehouse-sim

    # Use a configuration file
    warehouse-sim --config config.json

    # Simulate a single staffing level
    warehouse-sim --staff-count 75 --efficiency 1.2

    # Check for an inbound dock bottleneck
    warehouse-sim --staff-count 75 --inbound-docks 2 --seed 7

    # Generate configuration template
    warehouse-sim --print-config > my-config.json

    # Write scenario outcomes as JSON lines
    warehouse-sim --output outcomes.jsonl

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Orders to generate per run
    #[arg(
        long,
        help = "Orders generated per run",
        long_help = "Monthly order target. Exactly this many orders are generated in every run. Must be greater than 0. Default: 10000"
    )]
    pub target_orders: Option<u32>,

    /// Working days in the nominal horizon
    #[arg(long, help = "Working days in the simulated month")]
    pub working_days: Option<u32>,

    /// Minutes in one working day
    #[arg(long, help = "Minutes per working day")]
    pub minutes_per_day: Option<f64>,

    /// Base per-order service time in minutes
    #[arg(long, help = "Minutes per order without automation")]
    pub base_service_time: Option<f64>,

    /// Multiplier applied to the nominal horizon
    #[arg(
        long,
        help = "Horizon buffer multiplier (>= 1.0)",
        long_help = "The run lasts horizon_buffer x working_days x minutes_per_day minutes so queued work can drain. Default: 1.5"
    )]
    pub horizon_buffer: Option<f64>,

    /// Operators employed before relocation
    #[arg(long, help = "Operators employed before relocation")]
    pub initial_staff: Option<usize>,

    /// Run a single simulation with this staff count instead of the scenario set
    #[arg(long, help = "Simulate one staffing level instead of the relocation scenarios")]
    pub staff_count: Option<usize>,

    /// Processing-speed multiplier for a single simulation
    #[arg(long, help = "Efficiency multiplier for --staff-count runs (default 1.0)")]
    pub efficiency: Option<f64>,

    /// Inbound docks
    #[arg(long, help = "Inbound dock count")]
    pub inbound_docks: Option<usize>,

    /// Outbound docks
    #[arg(long, help = "Outbound dock count")]
    pub outbound_docks: Option<usize>,

    /// Disable truck and dock simulation
    #[arg(long, help = "Simulate order picking only")]
    pub no_dock_simulation: bool,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Output path for scenario outcomes
    #[arg(long, help = "Output path for scenario outcomes JSONL file")]
    pub output: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Directory for daily rolling JSON log files
    #[arg(long, help = "Also write JSON logs to daily files in this directory")]
    pub log_dir: Option<String>,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Orders generated per run
    pub target_orders: Option<u32>,
    /// Working days in the nominal horizon
    pub working_days: Option<u32>,
    /// Minutes in one working day
    pub minutes_per_day: Option<f64>,
    /// Base per-order service time in minutes
    pub base_service_time_min: Option<f64>,
    /// Multiplier applied to the nominal horizon
    pub horizon_buffer: Option<f64>,
    /// Operators employed before relocation
    pub initial_staff: Option<usize>,
    /// Inbound docks
    pub inbound_dock_count: Option<usize>,
    /// Outbound docks
    pub outbound_dock_count: Option<usize>,
    /// Whether truck traffic is simulated
    pub enable_dock_simulation: Option<bool>,
    /// Truck traffic parameters
    pub dock: Option<DockFlowConfig>,
    /// Congestion threshold for average truck wait
    pub dock_wait_alert_min: Option<f64>,
    /// Random seed for reproducible results
    pub seed: Option<u64>,
}

/// Configuration for the warehouse operations simulation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    /// Orders generated per run
    pub target_orders: u32,

    /// Working days in the nominal horizon
    pub working_days: u32,

    /// Minutes in one working day
    pub minutes_per_day: f64,

    /// Minutes one operator needs for one order at efficiency 1.0
    pub base_service_time_min: f64,

    /// Multiplier applied to the nominal horizon so the backlog can drain
    pub horizon_buffer: f64,

    /// Operators employed before relocation (scenario staff counts derive from it)
    pub initial_staff: usize,

    /// Inbound docks
    pub inbound_dock_count: usize,

    /// Outbound docks
    pub outbound_dock_count: usize,

    /// Whether truck traffic is simulated
    pub enable_dock_simulation: bool,

    /// Truck traffic parameters
    pub dock: DockFlowConfig,

    /// Average truck wait above which a dock type is reported as congested
    pub dock_wait_alert_min: f64,

    /// Random seed for reproducible results
    pub seed: Option<u64>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Target order count is invalid
    #[error("Target orders must be greater than 0, got {0}")]
    InvalidTargetOrders(u32),

    /// Working days count is invalid
    #[error("Working days must be greater than 0, got {0}")]
    InvalidWorkingDays(u32),

    /// A duration in minutes is not a positive finite number
    #[error("Invalid duration for {field}: {value} (must be a positive number of minutes)")]
    InvalidDuration {
        /// Name of the offending field
        field: String,
        /// The rejected value
        value: f64,
    },

    /// Horizon buffer would cut the nominal horizon short
    #[error("Horizon buffer must be at least 1.0, got {0}")]
    InvalidHorizonBuffer(f64),

    /// Initial staff is invalid
    #[error("Initial staff must be greater than 0, got {0}")]
    InvalidInitialStaff(usize),

    /// Run horizon overflows to a non-finite number of minutes
    #[error("Run horizon must be finite, got {0} minutes")]
    InvalidHorizon(f64),

    /// Share value is out of range
    #[error("Invalid share for {field}: {value} (must be between 0.0 and 1.0)")]
    InvalidShare {
        /// Name of the offending field
        field: String,
        /// The rejected value
        value: f64,
    },

    /// Orders per truck is invalid
    #[error("Orders per truck must be greater than 0, got {0}")]
    InvalidOrdersPerTruck(u32),

    /// Sampling range is empty, inverted, or negative
    #[error("Invalid range for {field}: [{low}, {high}]")]
    InvalidRange {
        /// Name of the offending field
        field: String,
        /// Lower bound
        low: f64,
        /// Upper bound
        high: f64,
    },
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            target_orders: defaults::TARGET_ORDERS,
            working_days: defaults::WORKING_DAYS,
            minutes_per_day: defaults::MINUTES_PER_DAY,
            base_service_time_min: defaults::BASE_SERVICE_TIME_MIN,
            horizon_buffer: defaults::HORIZON_BUFFER,
            initial_staff: defaults::INITIAL_STAFF,
            inbound_dock_count: defaults::DOCK_COUNT,
            outbound_dock_count: defaults::DOCK_COUNT,
            enable_dock_simulation: true,
            dock: DockFlowConfig::default(),
            dock_wait_alert_min: defaults::DOCK_WAIT_ALERT_MIN,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // CLI takes precedence over the file
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            target_orders: config_file.target_orders.unwrap_or(defaults.target_orders),
            working_days: config_file.working_days.unwrap_or(defaults.working_days),
            minutes_per_day: config_file.minutes_per_day.unwrap_or(defaults.minutes_per_day),
            base_service_time_min: config_file
                .base_service_time_min
                .unwrap_or(defaults.base_service_time_min),
            horizon_buffer: config_file.horizon_buffer.unwrap_or(defaults.horizon_buffer),
            initial_staff: config_file.initial_staff.unwrap_or(defaults.initial_staff),
            inbound_dock_count: config_file
                .inbound_dock_count
                .unwrap_or(defaults.inbound_dock_count),
            outbound_dock_count: config_file
                .outbound_dock_count
                .unwrap_or(defaults.outbound_dock_count),
            enable_dock_simulation: config_file
                .enable_dock_simulation
                .unwrap_or(defaults.enable_dock_simulation),
            dock: config_file.dock.unwrap_or(defaults.dock),
            dock_wait_alert_min: config_file
                .dock_wait_alert_min
                .unwrap_or(defaults.dock_wait_alert_min),
            seed: config_file.seed.or(defaults.seed),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.target_orders {
            config.target_orders = value;
        }
        if let Some(value) = args.working_days {
            config.working_days = value;
        }
        if let Some(value) = args.minutes_per_day {
            config.minutes_per_day = value;
        }
        if let Some(value) = args.base_service_time {
            config.base_service_time_min = value;
        }
        if let Some(value) = args.horizon_buffer {
            config.horizon_buffer = value;
        }
        if let Some(value) = args.initial_staff {
            config.initial_staff = value;
        }
        if let Some(value) = args.inbound_docks {
            config.inbound_dock_count = value;
        }
        if let Some(value) = args.outbound_docks {
            config.outbound_dock_count = value;
        }
        if args.no_dock_simulation {
            config.enable_dock_simulation = false;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.target_orders == 0 {
            return Err(ConfigValidationError::InvalidTargetOrders(self.target_orders));
        }

        if self.working_days == 0 {
            return Err(ConfigValidationError::InvalidWorkingDays(self.working_days));
        }

        self.validate_duration("minutes_per_day", self.minutes_per_day)?;
        self.validate_duration("base_service_time_min", self.base_service_time_min)?;

        if !self.horizon_buffer.is_finite() || self.horizon_buffer < 1.0 {
            return Err(ConfigValidationError::InvalidHorizonBuffer(self.horizon_buffer));
        }

        if self.initial_staff == 0 {
            return Err(ConfigValidationError::InvalidInitialStaff(self.initial_staff));
        }

        self.validate_duration("dock_wait_alert_min", self.dock_wait_alert_min)?;

        if !self.run_horizon_min().is_finite() {
            return Err(ConfigValidationError::InvalidHorizon(self.run_horizon_min()));
        }

        self.validate_share("dock.inbound_share", self.dock.inbound_share)?;
        self.validate_share("dock.outbound_share", self.dock.outbound_share)?;

        if self.dock.orders_per_truck == 0 {
            return Err(ConfigValidationError::InvalidOrdersPerTruck(self.dock.orders_per_truck));
        }

        self.validate_range("dock.arrival_jitter", self.dock.arrival_jitter)?;
        self.validate_range("dock.inbound_service_min", self.dock.inbound_service_min)?;
        self.validate_range("dock.outbound_service_min", self.dock.outbound_service_min)?;

        Ok(())
    }

    fn validate_duration(&self, field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigValidationError::InvalidDuration { field: field.to_string(), value });
        }
        Ok(())
    }

    fn validate_share(&self, field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigValidationError::InvalidShare { field: field.to_string(), value });
        }
        Ok(())
    }

    fn validate_range(&self, field: &str, range: UniformRange) -> Result<(), ConfigValidationError> {
        // Zero-width ranges are allowed and make the draw deterministic
        if !range.is_well_formed() || range.low <= 0.0 {
            return Err(ConfigValidationError::InvalidRange {
                field: field.to_string(),
                low: range.low,
                high: range.high,
            });
        }
        Ok(())
    }

    /// Nominal horizon in minutes (`working_days x minutes_per_day`)
    pub fn nominal_horizon_min(&self) -> f64 {
        self.working_days as f64 * self.minutes_per_day
    }

    /// Virtual time at which every run stops
    pub fn run_horizon_min(&self) -> f64 {
        self.nominal_horizon_min() * self.horizon_buffer
    }

    /// Constant gap between consecutive orders
    pub fn order_interval_min(&self) -> f64 {
        self.nominal_horizon_min() / self.target_orders as f64
    }

    /// Minutes one order occupies an operator at the given efficiency
    pub fn service_time_min(&self, efficiency_multiplier: f64) -> f64 {
        self.base_service_time_min / efficiency_multiplier
    }

    /// Trucks of `kind` generated in one run
    pub fn truck_count(&self, kind: TruckKind) -> u64 {
        let volume = self.target_orders as f64 * self.dock.share(kind);
        (volume / self.dock.orders_per_truck as f64).floor() as u64
    }

    /// Nominal gap between trucks of `kind`, before jitter
    pub fn truck_interval_min(&self, kind: TruckKind) -> Option<f64> {
        match self.truck_count(kind) {
            0 => None,
            count => Some(self.nominal_horizon_min() / count as f64),
        }
    }
}
