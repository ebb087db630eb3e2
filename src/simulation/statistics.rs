//! Statistics collection and reporting
//!
//! This module contains the per-flow counters accumulated during a run, the
//! consolidated `RunStatistics` produced once a run ends, and the flat KPI report
//! derived from it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::types::{RunId, TruckKind};

/// Key of the completed-order count in the KPI mapping
pub const ACHIEVED_THROUGHPUT: &str = "achieved_throughput";
/// Key of the mean order cycle time in the KPI mapping
pub const AVG_CYCLE_TIME_MIN: &str = "avg_cycle_time_min";
/// Key of the served inbound truck count
pub const INBOUND_TRUCKS_SERVED: &str = "inbound_trucks_served";
/// Key of the served outbound truck count
pub const OUTBOUND_TRUCKS_SERVED: &str = "outbound_trucks_served";
/// Key of the mean inbound dock wait
pub const AVG_INBOUND_WAIT_MIN: &str = "avg_inbound_wait_min";
/// Key of the mean outbound dock wait
pub const AVG_OUTBOUND_WAIT_MIN: &str = "avg_outbound_wait_min";
/// Key of the longest inbound dock wait
pub const MAX_INBOUND_WAIT_MIN: &str = "max_inbound_wait_min";
/// Key of the longest outbound dock wait
pub const MAX_OUTBOUND_WAIT_MIN: &str = "max_outbound_wait_min";

/// Round a minute figure to two decimals for reporting
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(total: f64, samples: u64) -> f64 {
    if samples == 0 {
        0.0
    } else {
        total / samples as f64
    }
}

/// Counters for the order flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderStatistics {
    /// Orders released by the generator
    pub generated: u64,
    /// Orders that completed service before the cutoff
    pub processed: u64,
    /// Sum of cycle times of processed orders
    pub total_cycle_time_min: f64,
    /// Longest cycle time of a processed order
    pub max_cycle_time_min: f64,
    /// Sum of staff queue waits of processed orders
    pub total_queue_wait_min: f64,
    /// Orders still waiting for an operator at the cutoff
    pub queued_at_cutoff: u64,
    /// Orders held by an operator at the cutoff
    pub in_service_at_cutoff: u64,
    /// Longest staff queue observed
    pub peak_queue: u64,
    /// Share of operator time spent busy over the horizon
    pub staff_utilization: f64,
}

impl OrderStatistics {
    /// Count one completed order
    pub fn record_completion(&mut self, cycle_time_min: f64, queue_wait_min: f64) {
        self.processed += 1;
        self.total_cycle_time_min += cycle_time_min;
        self.max_cycle_time_min = self.max_cycle_time_min.max(cycle_time_min);
        self.total_queue_wait_min += queue_wait_min;
    }

    /// Mean cycle time over processed orders (0 when none completed)
    pub fn average_cycle_time_min(&self) -> f64 {
        mean(self.total_cycle_time_min, self.processed)
    }

    /// Mean staff queue wait over processed orders (0 when none completed)
    pub fn average_queue_wait_min(&self) -> f64 {
        mean(self.total_queue_wait_min, self.processed)
    }

    /// Orders generated but not completed when the run was cut off
    pub fn left_at_cutoff(&self) -> u64 {
        self.queued_at_cutoff + self.in_service_at_cutoff
    }

    /// Processed orders as a percentage of generated ones
    pub fn completion_percentage(&self) -> f64 {
        if self.generated == 0 {
            0.0
        } else {
            (self.processed as f64 / self.generated as f64) * 100.0
        }
    }
}

/// Counters for one truck lane
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TruckStatistics {
    /// Docks in the lane's pool
    pub dock_count: usize,
    /// Trucks released by the generator
    pub generated: u64,
    /// Trucks granted a dock (one wait sample each)
    pub docked: u64,
    /// Trucks that finished loading or unloading before the cutoff
    pub served: u64,
    /// Sum of dock waits
    pub total_wait_min: f64,
    /// Longest dock wait
    pub max_wait_min: f64,
    /// Trucks still waiting for a dock at the cutoff
    pub queued_at_cutoff: u64,
    /// Trucks still at a dock at the cutoff
    pub at_dock_at_cutoff: u64,
    /// Longest dock queue observed
    pub peak_queue: u64,
    /// Share of dock time spent busy over the horizon
    pub dock_utilization: f64,
}

impl TruckStatistics {
    /// Record the wait of a truck that was just granted a dock
    pub fn record_wait(&mut self, wait_min: f64) {
        self.docked += 1;
        self.total_wait_min += wait_min;
        self.max_wait_min = self.max_wait_min.max(wait_min);
    }

    /// Mean dock wait over docked trucks (0 when none docked)
    pub fn average_wait_min(&self) -> f64 {
        mean(self.total_wait_min, self.docked)
    }
}

/// Dock section of the KPI report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DockKpis {
    /// Inbound trucks that finished unloading
    pub inbound_trucks_served: u64,
    /// Outbound trucks that finished loading
    pub outbound_trucks_served: u64,
    /// Mean inbound wait, 2 decimals
    pub avg_inbound_wait_min: f64,
    /// Mean outbound wait, 2 decimals
    pub avg_outbound_wait_min: f64,
    /// Longest inbound wait, 2 decimals
    pub max_inbound_wait_min: f64,
    /// Longest outbound wait, 2 decimals
    pub max_outbound_wait_min: f64,
}

impl DockKpis {
    fn from_lanes(inbound: &TruckStatistics, outbound: &TruckStatistics) -> Self {
        Self {
            inbound_trucks_served: inbound.served,
            outbound_trucks_served: outbound.served,
            avg_inbound_wait_min: round_to_hundredths(inbound.average_wait_min()),
            avg_outbound_wait_min: round_to_hundredths(outbound.average_wait_min()),
            max_inbound_wait_min: round_to_hundredths(inbound.max_wait_min),
            max_outbound_wait_min: round_to_hundredths(outbound.max_wait_min),
        }
    }

    /// Average wait for one truck kind
    pub fn average_wait_min(&self, kind: TruckKind) -> f64 {
        match kind {
            TruckKind::Inbound => self.avg_inbound_wait_min,
            TruckKind::Outbound => self.avg_outbound_wait_min,
        }
    }
}

/// One value of the flat KPI mapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KpiValue {
    /// A count of orders or trucks
    Count(u64),
    /// A duration in minutes, rounded to 2 decimals
    Minutes(f64),
}

impl KpiValue {
    /// Numeric value regardless of variant
    pub fn as_f64(&self) -> f64 {
        match self {
            KpiValue::Count(count) => *count as f64,
            KpiValue::Minutes(minutes) => *minutes,
        }
    }
}

impl fmt::Display for KpiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KpiValue::Count(count) => write!(f, "{}", count),
            KpiValue::Minutes(minutes) => write!(f, "{:.2}", minutes),
        }
    }
}

/// Result of one `run()`: order KPIs plus dock KPIs when docks were simulated
///
/// Serializes to a flat JSON object whose keys match [`KpiReport::to_map`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiReport {
    /// Orders completed before the cutoff
    pub achieved_throughput: u64,
    /// Mean cycle time of completed orders, 2 decimals
    pub avg_cycle_time_min: f64,
    /// Truck metrics, absent when dock simulation is disabled
    #[serde(flatten)]
    pub docks: Option<DockKpis>,
}

impl KpiReport {
    /// Flat key/value view of the report
    pub fn to_map(&self) -> BTreeMap<&'static str, KpiValue> {
        let mut map = BTreeMap::new();
        map.insert(ACHIEVED_THROUGHPUT, KpiValue::Count(self.achieved_throughput));
        map.insert(AVG_CYCLE_TIME_MIN, KpiValue::Minutes(self.avg_cycle_time_min));

        if let Some(docks) = &self.docks {
            map.insert(INBOUND_TRUCKS_SERVED, KpiValue::Count(docks.inbound_trucks_served));
            map.insert(OUTBOUND_TRUCKS_SERVED, KpiValue::Count(docks.outbound_trucks_served));
            map.insert(AVG_INBOUND_WAIT_MIN, KpiValue::Minutes(docks.avg_inbound_wait_min));
            map.insert(AVG_OUTBOUND_WAIT_MIN, KpiValue::Minutes(docks.avg_outbound_wait_min));
            map.insert(MAX_INBOUND_WAIT_MIN, KpiValue::Minutes(docks.max_inbound_wait_min));
            map.insert(MAX_OUTBOUND_WAIT_MIN, KpiValue::Minutes(docks.max_outbound_wait_min));
        }
        map
    }

    /// One-line summary for logs
    pub fn compact_summary(&self) -> String {
        let mut line = format!(
            "throughput {} | avg cycle {:.2} min",
            self.achieved_throughput, self.avg_cycle_time_min
        );
        if let Some(docks) = &self.docks {
            line.push_str(&format!(
                " | inbound {} served, avg wait {:.2} min | outbound {} served, avg wait {:.2} min",
                docks.inbound_trucks_served,
                docks.avg_inbound_wait_min,
                docks.outbound_trucks_served,
                docks.avg_outbound_wait_min
            ));
        }
        line
    }
}

/// Sequence numbers in grant order per pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrantTrace {
    /// Order ids in the order operators were granted
    pub staff: Vec<u64>,
    /// Inbound truck ids in dock grant order
    pub inbound: Option<Vec<u64>>,
    /// Outbound truck ids in dock grant order
    pub outbound: Option<Vec<u64>>,
}

impl GrantTrace {
    /// Whether every pool granted in non-decreasing sequence order
    pub fn is_fifo(&self) -> bool {
        let ordered = |ids: &[u64]| ids.windows(2).all(|pair| pair[0] <= pair[1]);
        ordered(self.staff.as_slice())
            && self.inbound.as_deref().map_or(true, ordered)
            && self.outbound.as_deref().map_or(true, ordered)
    }
}

/// Consolidated counters of one finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Identifier tagging this run in logs and exports
    pub run_id: RunId,
    /// Operators in the staff pool
    pub staff_count: usize,
    /// Processing-speed multiplier
    pub efficiency_multiplier: f64,
    /// Orders the generator was asked to release
    pub target_orders: u64,
    /// Virtual time at which the run stopped
    pub horizon_min: f64,
    /// Seed of the random source, when pinned
    pub seed: Option<u64>,
    /// Order flow counters
    pub orders: OrderStatistics,
    /// Inbound lane counters, when docks were simulated
    pub inbound: Option<TruckStatistics>,
    /// Outbound lane counters, when docks were simulated
    pub outbound: Option<TruckStatistics>,
    /// Events handled by the scheduler
    pub events_dispatched: u64,
    /// Wall-clock time spent in the engine
    pub simulation_duration: Duration,
    /// Grant order per pool, when tracing was requested
    pub grant_trace: Option<GrantTrace>,
}

impl RunStatistics {
    /// Whether dock traffic was part of this run
    pub fn docks_simulated(&self) -> bool {
        self.inbound.is_some() && self.outbound.is_some()
    }

    /// Counters of one truck lane
    pub fn trucks(&self, kind: TruckKind) -> Option<&TruckStatistics> {
        match kind {
            TruckKind::Inbound => self.inbound.as_ref(),
            TruckKind::Outbound => self.outbound.as_ref(),
        }
    }

    /// Whether orders were still queued or in service when the run was cut off
    pub fn truncated(&self) -> bool {
        self.orders.left_at_cutoff() > 0
    }

    /// Set the wall-clock duration of the run
    pub fn set_simulation_duration(&mut self, duration: Duration) {
        self.simulation_duration = duration;
    }

    /// Flat KPI report of this run
    pub fn kpis(&self) -> KpiReport {
        let docks = match (&self.inbound, &self.outbound) {
            (Some(inbound), Some(outbound)) => Some(DockKpis::from_lanes(inbound, outbound)),
            _ => None,
        };

        KpiReport {
            achieved_throughput: self.orders.processed,
            avg_cycle_time_min: round_to_hundredths(self.orders.average_cycle_time_min()),
            docks,
        }
    }

    /// Generate a multi-line human readable report
    pub fn generate_summary_report(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!("=== Run {} ===\n\n", self.run_id));
        report.push_str(&format!(
            "Simulation Duration: {:.3} seconds ({} events, horizon {:.0} min)\n",
            self.simulation_duration.as_secs_f64(),
            self.events_dispatched,
            self.horizon_min
        ));
        if let Some(seed) = self.seed {
            report.push_str(&format!("Seed: {}\n", seed));
        }
        report.push('\n');

        report.push_str("Orders:\n");
        report.push_str(&format!(
            "  • Staff: {} at efficiency {:.2}x ({:.1}% utilized)\n",
            self.staff_count,
            self.efficiency_multiplier,
            self.orders.staff_utilization * 100.0
        ));
        report.push_str(&format!(
            "  • Processed: {} of {} generated ({:.1}%)\n",
            self.orders.processed,
            self.orders.generated,
            self.orders.completion_percentage()
        ));
        report.push_str(&format!(
            "  • Cycle Time: avg {:.2} min, max {:.2} min\n",
            self.orders.average_cycle_time_min(),
            self.orders.max_cycle_time_min
        ));
        report.push_str(&format!(
            "  • Left at cutoff: {} queued, {} in service\n",
            self.orders.queued_at_cutoff, self.orders.in_service_at_cutoff
        ));

        for kind in TruckKind::ALL {
            if let Some(trucks) = self.trucks(kind) {
                report.push_str(&format!("\n{} Docks ({}):\n", capitalize(kind), trucks.dock_count));
                report.push_str(&format!(
                    "  • Served: {} of {} generated ({:.1}% utilized)\n",
                    trucks.served,
                    trucks.generated,
                    trucks.dock_utilization * 100.0
                ));
                report.push_str(&format!(
                    "  • Wait: avg {:.2} min, max {:.2} min, peak queue {}\n",
                    trucks.average_wait_min(),
                    trucks.max_wait_min,
                    trucks.peak_queue
                ));
            }
        }

        report
    }
}

fn capitalize(kind: TruckKind) -> &'static str {
    match kind {
        TruckKind::Inbound => "Inbound",
        TruckKind::Outbound => "Outbound",
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generate_summary_report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_statistics(inbound: Option<TruckStatistics>, outbound: Option<TruckStatistics>) -> RunStatistics {
        let mut orders = OrderStatistics { generated: 3, ..Default::default() };
        orders.record_completion(15.0, 0.0);
        orders.record_completion(16.004, 1.004);

        RunStatistics {
            run_id: RunId::new(),
            staff_count: 75,
            efficiency_multiplier: 1.0,
            target_orders: 3,
            horizon_min: 14_400.0,
            seed: Some(42),
            orders,
            inbound,
            outbound,
            events_dispatched: 10,
            simulation_duration: Duration::from_millis(3),
            grant_trace: None,
        }
    }

    #[test]
    fn test_round_to_hundredths() {
        assert_eq!(round_to_hundredths(15.0), 15.0);
        assert_eq!(round_to_hundredths(15.502), 15.5);
        assert_eq!(round_to_hundredths(0.004), 0.0);
        assert_eq!(round_to_hundredths(2.0 / 3.0), 0.67);
    }

    #[test]
    fn test_averages_are_zero_without_samples() {
        let orders = OrderStatistics::default();
        assert_eq!(orders.average_cycle_time_min(), 0.0);
        assert_eq!(orders.average_queue_wait_min(), 0.0);
        assert_eq!(orders.completion_percentage(), 0.0);

        let trucks = TruckStatistics::default();
        assert_eq!(trucks.average_wait_min(), 0.0);
    }

    #[test]
    fn test_truck_wait_recording() {
        let mut trucks = TruckStatistics::default();
        trucks.record_wait(0.0);
        trucks.record_wait(30.0);
        trucks.record_wait(12.0);

        assert_eq!(trucks.docked, 3);
        assert_eq!(trucks.max_wait_min, 30.0);
        assert!((trucks.average_wait_min() - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_kpis_without_docks_have_base_keys_only() {
        let stats = run_statistics(None, None);
        let kpis = stats.kpis();

        assert_eq!(kpis.achieved_throughput, 2);
        assert_eq!(kpis.avg_cycle_time_min, 15.5);
        assert!(kpis.docks.is_none());

        let keys: Vec<_> = kpis.to_map().keys().copied().collect();
        assert_eq!(keys, vec![ACHIEVED_THROUGHPUT, AVG_CYCLE_TIME_MIN]);
        assert!(stats.truncated());
    }

    #[test]
    fn test_kpis_with_docks_round_waits() {
        let mut inbound = TruckStatistics::default();
        inbound.record_wait(10.126);
        inbound.served = 1;
        let outbound = TruckStatistics::default();

        let kpis = run_statistics(Some(inbound), Some(outbound)).kpis();
        let map = kpis.to_map();

        assert_eq!(map.len(), 8);
        assert_eq!(map[INBOUND_TRUCKS_SERVED], KpiValue::Count(1));
        assert_eq!(map[AVG_INBOUND_WAIT_MIN], KpiValue::Minutes(10.13));
        assert_eq!(map[MAX_INBOUND_WAIT_MIN], KpiValue::Minutes(10.13));
        assert_eq!(map[AVG_OUTBOUND_WAIT_MIN], KpiValue::Minutes(0.0));
        assert_eq!(map[INBOUND_TRUCKS_SERVED].as_f64(), 1.0);
    }

    #[test]
    fn test_kpi_report_json_is_flat() {
        let without = run_statistics(None, None).kpis();
        let json = serde_json::to_value(without).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.contains_key(ACHIEVED_THROUGHPUT));

        let with = run_statistics(Some(TruckStatistics::default()), Some(TruckStatistics::default())).kpis();
        let json = serde_json::to_value(with).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 8);
        assert_eq!(json[OUTBOUND_TRUCKS_SERVED], 0);

        let back: KpiReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, with);
    }

    #[test]
    fn test_grant_trace_fifo_check() {
        let trace = GrantTrace {
            staff: vec![0, 1, 2, 3],
            inbound: Some(vec![0, 1]),
            outbound: None,
        };
        assert!(trace.is_fifo());

        let shuffled = GrantTrace { staff: vec![0, 2, 1], ..Default::default() };
        assert!(!shuffled.is_fifo());
    }

    #[test]
    fn test_summary_report_mentions_docks_only_when_simulated() {
        let report = run_statistics(None, None).generate_summary_report();
        assert!(report.contains("Processed: 2 of 3 generated"));
        assert!(!report.contains("Inbound Docks"));

        let report = run_statistics(Some(TruckStatistics::default()), Some(TruckStatistics::default()))
            .to_string();
        assert!(report.contains("Inbound Docks"));
        assert!(report.contains("Outbound Docks"));
        assert!(report.contains("Seed: 42"));
    }
}
