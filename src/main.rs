use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use fleet_sim::simulation::{
    CounterStrategy, EngineConfig, SimulationEngine, StatusSnapshot, VehicleId, WorkerState,
};

#[derive(Parser)]
#[command(name = "fleet_sim")]
#[command(about = "Concurrent highway simulation for a vehicle fleet")]
struct Cli {
    /// Serialize highway counter updates behind a mutex
    #[arg(long)]
    sync: bool,

    /// Number of ticks each vehicle drives before finishing
    #[arg(long, default_value = "10")]
    ticks: u64,

    /// Wall-clock milliseconds per tick
    #[arg(long, default_value = "1000")]
    tick_ms: u64,

    /// Pause the whole fleet for one report interval after this many reports
    #[arg(long)]
    pause_after: Option<u32>,

    /// Refuel vehicles that run dry with this amount
    #[arg(long)]
    refuel: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn,fleet_sim=info"))
        .init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Run the simulation in headless mode, printing a status table per report interval
fn run_headless(cli: &Cli) -> Result<()> {
    let strategy = if cli.sync {
        CounterStrategy::Serialized
    } else {
        CounterStrategy::Unserialized
    };
    let interval = Duration::from_millis(cli.tick_ms.max(1));
    let config = EngineConfig::default()
        .with_tick_interval(Duration::from_millis(cli.tick_ms))
        .with_tick_limit(Some(cli.ticks));

    println!("Running fleet simulation in headless mode...");
    println!("Ticks: {}, Tick interval: {}ms, Counter: {}", cli.ticks, cli.tick_ms, strategy);
    println!();

    let mut engine = SimulationEngine::new(config);
    engine.start(strategy);

    let mut reports = 0;
    let final_rows = loop {
        let settled = engine.wait_settled(interval);
        reports += 1;

        let rows = engine.snapshot();
        print_table(&engine, &rows);

        if cli.pause_after == Some(reports) {
            engine.pause();
            println!("--- Fleet paused ---");
            print_table(&engine, &engine.snapshot());
            thread::sleep(interval);
            engine.resume();
            println!("--- Fleet resumed ---");
            continue;
        }

        if !settled {
            continue;
        }

        let empty: Vec<VehicleId> = rows
            .iter()
            .filter(|r| r.state == WorkerState::OutOfFuel)
            .map(|r| r.id.clone())
            .collect();
        match cli.refuel {
            Some(amount) if !empty.is_empty() => {
                for id in &empty {
                    engine
                        .refuel(id.as_str(), amount)
                        .with_context(|| format!("Failed to refuel {}", id))?;
                }
            }
            _ => break rows,
        }
    };

    engine.stop();

    let travelled: f64 = final_rows.iter().map(|r| r.mileage).sum();
    info!("=== SIMULATION COMPLETE ===");
    info!("Counter strategy: {}", engine.strategy());
    info!("Highway distance: {}", engine.highway_distance());
    info!("Distance travelled by vehicles: {:.1}", travelled);
    info!(
        "Lost updates: {}",
        (travelled as u64).saturating_sub(engine.highway_distance())
    );
    info!("Elapsed seconds: {}", engine.elapsed_seconds());

    Ok(())
}

fn print_table(engine: &SimulationEngine, rows: &[StatusSnapshot]) {
    println!(
        "--- Highway distance: {} | Elapsed: {}s ---",
        engine.highway_distance(),
        engine.elapsed_seconds()
    );
    println!("{:<10} {:>10} {:>8}  {}", "ID", "Mileage", "Fuel", "Status");
    for row in rows {
        let [id, mileage, fuel, status] = row.row();
        println!("{:<10} {:>10} {:>8}  {}", id, mileage, fuel, status);
    }
    println!();
}
