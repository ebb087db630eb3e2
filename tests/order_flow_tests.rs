//! Tests for the order-only simulator
//!
//! These tests check throughput and cycle-time behaviour as staffing and efficiency
//! change, including the degenerate runs where nothing completes.

use warehouse_relocation_sim::simulation::OrderFulfillmentSimulator;
use warehouse_relocation_sim::types::SimulationConfig;

/// 300 orders over one 480-minute day (one every 1.6 min), cut off at 720 minutes
fn one_day_config() -> SimulationConfig {
    SimulationConfig {
        target_orders: 300,
        working_days: 1,
        ..Default::default()
    }
}

/// More operators never reduce completed orders
#[test]
fn test_throughput_is_monotone_in_staff() {
    let mut previous = 0;
    for staff in 1..=14 {
        let kpis = OrderFulfillmentSimulator::new(one_day_config(), staff, 1.0).unwrap().run();
        assert!(
            kpis.achieved_throughput >= previous,
            "{} staff completed {} orders, fewer than {}",
            staff,
            kpis.achieved_throughput,
            previous
        );
        previous = kpis.achieved_throughput;
    }
    assert_eq!(previous, 300);
}

/// Faster processing never reduces throughput or lengthens cycle time
#[test]
fn test_efficiency_is_monotone() {
    let mut previous_throughput = 0;
    let mut previous_cycle = f64::INFINITY;

    for efficiency in [0.5, 0.75, 1.0, 1.25, 2.0, 4.0] {
        let kpis = OrderFulfillmentSimulator::new(one_day_config(), 10, efficiency).unwrap().run();

        assert!(kpis.achieved_throughput >= previous_throughput);
        assert!(
            kpis.avg_cycle_time_min <= previous_cycle + 1e-9,
            "cycle time rose to {} at efficiency {}",
            kpis.avg_cycle_time_min,
            efficiency
        );
        previous_throughput = kpis.achieved_throughput;
        previous_cycle = kpis.avg_cycle_time_min;
    }
}

/// The generator never creates more orders than the target
#[test]
fn test_throughput_never_exceeds_target() {
    for (staff, efficiency) in [(1, 1.0), (10, 1.0), (50, 2.0), (500, 10.0)] {
        let stats = OrderFulfillmentSimulator::new(one_day_config(), staff, efficiency)
            .unwrap()
            .run_detailed();

        assert!(stats.orders.processed <= 300);
        assert_eq!(stats.orders.generated, 300);
        assert_eq!(
            stats.orders.processed + stats.orders.left_at_cutoff(),
            stats.orders.generated
        );
    }
}

/// A service time longer than the horizon completes nothing and reports zeros
#[test]
fn test_zero_completion_reports_zero_cycle_time() {
    let config = SimulationConfig {
        base_service_time_min: 1_000_000.0,
        ..one_day_config()
    };
    let simulator = OrderFulfillmentSimulator::new(config, 1, 1.0).unwrap();
    let stats = simulator.run_detailed();
    let kpis = stats.kpis();

    assert_eq!(kpis.achieved_throughput, 0);
    assert_eq!(kpis.avg_cycle_time_min, 0.0);
    assert_eq!(stats.orders.in_service_at_cutoff, 1);
    assert_eq!(stats.orders.queued_at_cutoff, 299);
    assert!(stats.truncated());
}

/// An uncongested run reports exactly the service time as cycle time
#[test]
fn test_uncongested_cycle_time_equals_service_time() {
    let kpis = OrderFulfillmentSimulator::new(one_day_config(), 20, 1.25).unwrap().run();

    assert_eq!(kpis.achieved_throughput, 300);
    assert_eq!(kpis.avg_cycle_time_min, 12.0);
}

/// A single operator completes one order per service time
#[test]
fn test_single_operator_capacity() {
    // 720 min / 15 min = 48 orders; the 48th would finish exactly at the cutoff
    let kpis = OrderFulfillmentSimulator::new(one_day_config(), 1, 1.0).unwrap().run();
    assert_eq!(kpis.achieved_throughput, 47);
}

/// Staff grants follow order arrival exactly
#[test]
fn test_staff_grants_are_fifo() {
    let stats = OrderFulfillmentSimulator::new(one_day_config(), 4, 1.0)
        .unwrap()
        .with_grant_trace()
        .run_detailed();

    let trace = stats.grant_trace.expect("trace requested");
    assert!(trace.is_fifo());
    let expected: Vec<u64> = (0..trace.staff.len() as u64).collect();
    assert_eq!(trace.staff, expected);
}

/// The default month meets its target with the post-move headcount
#[test]
fn test_default_month_with_seventy_five_staff() {
    let kpis = OrderFulfillmentSimulator::new(SimulationConfig::default(), 75, 1.0)
        .unwrap()
        .run();

    assert_eq!(kpis.achieved_throughput, 10_000);
    assert_eq!(kpis.avg_cycle_time_min, 15.0);
}
