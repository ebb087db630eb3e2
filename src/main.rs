// Warehouse Relocation Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/warehouse-sim
// ```
//
// Or for a single staffing level:
//
// ```console
// $ ./target/release/warehouse-sim --staff-count 75 --efficiency 1.2 --seed 7 --verbose
// ```

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;
use tracing::{error, info};
use warehouse_relocation_sim::scenario::{ScenarioOutcome, ScenarioSweep};
use warehouse_relocation_sim::simulation::{LoggingConfig, SimulationResult};
use warehouse_relocation_sim::types::{CliArgs, SimulationConfig, TruckKind};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let _logging_guard = match LoggingConfig::from_cli_args(&args).init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting Warehouse Relocation Simulator");

    let config = match SimulationConfig::from_cli_args(args.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    let sweep = match ScenarioSweep::new(config.clone()) {
        Ok(sweep) => sweep,
        Err(e) => {
            e.log();
            process::exit(1);
        }
    };

    info!("Configuration loaded and validated successfully");

    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return;
    }

    print_startup_banner(&config);

    let outcomes = match run_simulations(&sweep, &args) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            e.log();
            process::exit(1);
        }
    };

    print_outcomes(&outcomes);

    if let Some(path) = &args.output {
        if let Err(e) = write_outcomes(&outcomes, path) {
            error!("Failed to write outcomes: {:#}", e);
            process::exit(1);
        }
        eprintln!("Outcomes written to: {}", path);
    }

    info!("Warehouse Relocation Simulator completed successfully");
}

/// Run either the scenario set or the single staffing level given on the command line
fn run_simulations(
    sweep: &ScenarioSweep,
    args: &CliArgs,
) -> SimulationResult<Vec<ScenarioOutcome>> {
    match args.staff_count {
        Some(staff_count) => {
            let efficiency = args.efficiency.unwrap_or(1.0);
            eprintln!("Simulating {} staff at {:.2}x efficiency...", staff_count, efficiency);
            let outcome = sweep.run_single("Custom Staffing", staff_count, efficiency)?;
            Ok(vec![outcome])
        }
        None => {
            eprintln!("Simulating {} relocation scenarios...", sweep.scenarios().len());
            sweep.run()
        }
    }
}

/// Write one JSON object per outcome
fn write_outcomes(outcomes: &[ScenarioOutcome], path: &str) -> anyhow::Result<()> {
    info!("Writing {} outcomes to: {}", outcomes.len(), path);

    let file = File::create(path)
        .with_context(|| format!("Failed to create outcome file '{}'", path))?;
    let mut writer = BufWriter::new(file);

    for outcome in outcomes {
        let line = serde_json::to_string(outcome)
            .with_context(|| format!("Failed to serialize outcome for '{}'", outcome.scenario))?;
        writeln!(writer, "{}", line).context("Failed to write outcome line")?;
    }

    writer.flush().context("Failed to flush outcome file")?;
    Ok(())
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Warehouse Relocation Simulator");
    eprintln!("==============================");
    eprintln!("Order picking and dock traffic under relocation staffing scenarios");
    eprintln!();

    print_configuration_summary(config);
}

fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Target Orders: {}", config.target_orders);
    eprintln!(
        "  Horizon: {} days x {:.0} min, run for {:.0} min ({:.2}x buffer)",
        config.working_days,
        config.minutes_per_day,
        config.run_horizon_min(),
        config.horizon_buffer
    );
    eprintln!("  Order Interval: {:.3} min", config.order_interval_min());
    eprintln!("  Base Service Time: {:.2} min", config.base_service_time_min);
    eprintln!("  Initial Staff: {}", config.initial_staff);
    if config.enable_dock_simulation {
        for kind in TruckKind::ALL {
            let docks = match kind {
                TruckKind::Inbound => config.inbound_dock_count,
                TruckKind::Outbound => config.outbound_dock_count,
            };
            eprintln!(
                "  {} Trucks: {} on {} docks, service {:.0}-{:.0} min",
                kind,
                config.truck_count(kind),
                docks,
                config.dock.service_range(kind).low,
                config.dock.service_range(kind).high
            );
        }
        eprintln!("  Dock Wait Alert: {:.0} min", config.dock_wait_alert_min);
    } else {
        eprintln!("  Dock Simulation: disabled");
    }
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}

fn print_outcomes(outcomes: &[ScenarioOutcome]) {
    eprintln!("\nScenario Results:");
    eprintln!("=================");
    for outcome in outcomes {
        eprintln!("{}", outcome);
    }
    eprintln!();
}
