//! Concurrent fleet simulation
//!
//! This module contains the vehicle model, the fleet registry and the
//! multi-threaded highway engine. Each vehicle is driven by its own worker
//! thread; the engine controls the workers and reports on them.

mod clock;
mod counter;
mod engine;
mod error;
mod fleet;
mod types;
mod vehicle;
mod worker;

pub use clock::ElapsedClock;
pub use counter::{CounterStrategy, SharedCounter};
pub use engine::{EngineConfig, SimulationEngine};
pub use error::{EngineError, FleetError, VehicleError};
pub use fleet::{default_fleet, FleetManager, VehicleSpec};
pub use types::{
    Terrain, VehicleId, VehicleKind, DEFAULT_TICK_INTERVAL_MS, DISTANCE_UNIT,
    MAINTENANCE_INTERVAL, TRUCK_HEAVY_LOAD_PENALTY, TRUCK_HEAVY_LOAD_RATIO,
};
pub use vehicle::Vehicle;
pub use worker::{StatusSnapshot, TickSettings, VehicleWorker, WorkerState};
