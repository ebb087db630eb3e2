//! Enumeration types for the warehouse operations simulator
//!
//! This module contains the enumeration types used throughout the simulation system,
//! including truck directions, resource pools, and scenario classifications.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a truck relative to the warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruckKind {
    /// Supplier delivery that is unloaded at an inbound dock
    Inbound,
    /// Customer shipment that is loaded at an outbound dock
    Outbound,
}

impl TruckKind {
    /// Both truck kinds in scheduling order
    pub const ALL: [TruckKind; 2] = [TruckKind::Inbound, TruckKind::Outbound];

    /// Dock pool that serves this kind of truck
    pub fn pool(self) -> PoolKind {
        match self {
            TruckKind::Inbound => PoolKind::InboundDock,
            TruckKind::Outbound => PoolKind::OutboundDock,
        }
    }
}

impl fmt::Display for TruckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TruckKind::Inbound => write!(f, "inbound"),
            TruckKind::Outbound => write!(f, "outbound"),
        }
    }
}

impl FromStr for TruckKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inbound" | "in" => Ok(TruckKind::Inbound),
            "outbound" | "out" => Ok(TruckKind::Outbound),
            _ => Err(format!("Unknown truck kind: {}", s)),
        }
    }
}

/// Counting resources contended for during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    /// Interchangeable picking operators
    Staff,
    /// Unloading bays for inbound trucks
    InboundDock,
    /// Loading bays for outbound trucks
    OutboundDock,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKind::Staff => write!(f, "Staff"),
            PoolKind::InboundDock => write!(f, "Inbound Dock"),
            PoolKind::OutboundDock => write!(f, "Outbound Dock"),
        }
    }
}

/// Whether a run completed the order target before the horizon cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThroughputStatus {
    /// Every generated order completed
    TargetMet,
    /// Orders were still queued or in service at the cutoff
    Bottlenecked,
}

impl ThroughputStatus {
    /// Classify an achieved throughput against the order target
    pub fn classify(achieved: u64, target: u64) -> Self {
        if achieved >= target {
            ThroughputStatus::TargetMet
        } else {
            ThroughputStatus::Bottlenecked
        }
    }
}

impl fmt::Display for ThroughputStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThroughputStatus::TargetMet => write!(f, "Target Met"),
            ThroughputStatus::Bottlenecked => write!(f, "Bottlenecked"),
        }
    }
}

/// Dock type whose trucks wait longest, when above the congestion threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockBottleneck {
    /// Both dock types stay under the threshold, or docks were not simulated
    None,
    /// Inbound trucks wait longest and exceed the threshold
    Inbound,
    /// Outbound trucks wait longest and exceed the threshold
    Outbound,
}

impl DockBottleneck {
    /// Pick the congested dock type from average waits
    pub fn classify(avg_inbound_wait_min: f64, avg_outbound_wait_min: f64, alert_min: f64) -> Self {
        let worst = avg_inbound_wait_min.max(avg_outbound_wait_min);
        if worst <= alert_min {
            DockBottleneck::None
        } else if avg_inbound_wait_min >= avg_outbound_wait_min {
            DockBottleneck::Inbound
        } else {
            DockBottleneck::Outbound
        }
    }
}

impl fmt::Display for DockBottleneck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DockBottleneck::None => write!(f, "None"),
            DockBottleneck::Inbound => write!(f, "Inbound Docks"),
            DockBottleneck::Outbound => write!(f, "Outbound Docks"),
        }
    }
}
