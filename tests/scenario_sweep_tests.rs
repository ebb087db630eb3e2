//! Tests for the relocation scenario sweep
//!
//! These tests run the four scenarios end to end and check the classified outcomes and
//! their JSON Lines export.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use tempfile::TempDir;
use warehouse_relocation_sim::scenario::{relocation_scenarios, ScenarioOutcome, ScenarioSweep};
use warehouse_relocation_sim::types::{DockBottleneck, SimulationConfig, ThroughputStatus};

/// 800 orders over two days against a 40-person team
fn sweep_config() -> SimulationConfig {
    SimulationConfig {
        target_orders: 800,
        working_days: 2,
        initial_staff: 40,
        seed: Some(31),
        ..Default::default()
    }
}

#[test]
fn test_scenarios_map_to_staffing_runs() {
    let outcomes = ScenarioSweep::new(sweep_config()).unwrap().run().unwrap();
    let scenarios = relocation_scenarios();

    assert_eq!(outcomes.len(), scenarios.len());
    for (outcome, scenario) in outcomes.iter().zip(&scenarios) {
        assert_eq!(outcome.scenario, scenario.name);
        assert_eq!(outcome.staff_count, scenario.staff_count(40));
        assert_eq!(outcome.efficiency_multiplier, scenario.efficiency_multiplier);
    }

    let staff: Vec<usize> = outcomes.iter().map(|o| o.staff_count).collect();
    assert_eq!(staff, vec![30, 34, 30, 30]);
}

#[test]
fn test_automation_never_hurts_throughput() {
    let outcomes = ScenarioSweep::new(sweep_config()).unwrap().run().unwrap();

    // Same headcount, rising efficiency
    let no_mitigation = &outcomes[0].kpis;
    let basic = &outcomes[2].kpis;
    let advanced = &outcomes[3].kpis;

    assert!(basic.achieved_throughput >= no_mitigation.achieved_throughput);
    assert!(advanced.achieved_throughput >= basic.achieved_throughput);
    assert!(advanced.avg_cycle_time_min <= basic.avg_cycle_time_min);
    assert!(basic.avg_cycle_time_min <= no_mitigation.avg_cycle_time_min);
}

#[test]
fn test_classification_matches_kpis() {
    let outcomes = ScenarioSweep::new(sweep_config()).unwrap().run().unwrap();

    for outcome in &outcomes {
        let expected = if outcome.kpis.achieved_throughput >= 800 {
            ThroughputStatus::TargetMet
        } else {
            ThroughputStatus::Bottlenecked
        };
        assert_eq!(outcome.throughput_status, expected);
        assert_eq!(
            outcome.kpis.achieved_throughput + outcome.orders_left_at_cutoff,
            800
        );
    }
}

#[test]
fn test_order_only_sweep_has_no_dock_bottleneck() {
    let config = SimulationConfig {
        enable_dock_simulation: false,
        ..sweep_config()
    };
    let outcomes = ScenarioSweep::new(config).unwrap().run().unwrap();

    for outcome in &outcomes {
        assert!(outcome.kpis.docks.is_none());
        assert_eq!(outcome.dock_bottleneck, DockBottleneck::None);
        assert_eq!(outcome.kpis.to_map().len(), 2);
    }
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SimulationConfig {
        working_days: 0,
        ..sweep_config()
    };
    assert!(ScenarioSweep::new(config).is_err());
}

#[test]
fn test_outcomes_round_trip_through_jsonl() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("outcomes.jsonl");

    let outcomes = ScenarioSweep::new(sweep_config()).unwrap().run().unwrap();

    let mut file = File::create(&path).unwrap();
    for outcome in &outcomes {
        writeln!(file, "{}", serde_json::to_string(outcome).unwrap()).unwrap();
    }
    drop(file);

    let reader = BufReader::new(File::open(&path).unwrap());
    let loaded: Vec<ScenarioOutcome> = reader
        .lines()
        .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
        .collect();

    assert_eq!(loaded.len(), outcomes.len());
    for (read_back, original) in loaded.iter().zip(&outcomes) {
        assert_eq!(read_back.run_id, original.run_id);
        assert_eq!(read_back.scenario, original.scenario);
        assert_eq!(read_back.kpis.achieved_throughput, original.kpis.achieved_throughput);
        assert_eq!(read_back.throughput_status, original.throughput_status);
    }

    let raw = fs::read_to_string(&path).unwrap();
    let first: serde_json::Value = serde_json::from_str(raw.lines().next().unwrap()).unwrap();
    assert_eq!(first["scenario"], "1. Move No Mitigation");
    assert!(first.get("avg_inbound_wait_min").is_some());
    assert!(first.get("docks").is_none());
}
