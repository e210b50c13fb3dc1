//! Simulation engine that ties everything together
//!
//! The engine owns the shared highway counter, the elapsed clock and one
//! [`VehicleWorker`] per vehicle. It is the single entry point for lifecycle
//! control (start, pause, resume, stop, reset), for per-vehicle requests and
//! for status snapshots. Lifecycle methods take `&mut self`: the roster and
//! the clock are only ever changed from the caller's thread, never by the
//! workers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};

use super::clock::ElapsedClock;
use super::counter::{CounterStrategy, SharedCounter};
use super::error::EngineError;
use super::fleet::{default_fleet, FleetManager, VehicleSpec};
use super::types::{VehicleId, DEFAULT_TICK_INTERVAL_MS, DISTANCE_UNIT};
use super::worker::{StatusSnapshot, TickSettings, VehicleWorker, WorkerState};

/// Settings for every run of an engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Wall-clock time between two ticks of a worker
    pub tick_interval: Duration,
    /// Distance each tick tries to cover
    pub distance_unit: f64,
    /// Amount added to the highway counter per successful tick
    pub counter_delta: u64,
    /// Successful ticks after which each worker finishes; `None` runs until stopped
    pub tick_limit: Option<u64>,
    /// Vehicles built for every run
    pub fleet: Vec<VehicleSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            distance_unit: DISTANCE_UNIT,
            counter_delta: 1,
            tick_limit: None,
            fleet: default_fleet(),
        }
    }
}

impl EngineConfig {
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_tick_limit(mut self, limit: Option<u64>) -> Self {
        self.tick_limit = limit;
        self
    }

    pub fn with_fleet(mut self, fleet: Vec<VehicleSpec>) -> Self {
        self.fleet = fleet;
        self
    }

    pub fn with_counter_delta(mut self, delta: u64) -> Self {
        self.counter_delta = delta;
        self
    }

    fn tick_settings(&self) -> TickSettings {
        TickSettings {
            interval: self.tick_interval,
            distance: self.distance_unit,
            delta: self.counter_delta,
            limit: self.tick_limit,
        }
    }
}

/// Orchestrates the vehicle workers and the shared run state
#[derive(Debug)]
pub struct SimulationEngine {
    config: EngineConfig,
    counter: Arc<SharedCounter>,
    clock: ElapsedClock,
    workers: Vec<VehicleWorker>,
    /// A run is in progress
    active: bool,
    /// The whole fleet is paused
    paused: bool,
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SimulationEngine {
    /// Create an engine with a Ready fleet that is not yet running
    pub fn new(config: EngineConfig) -> Self {
        let mut engine = Self {
            config,
            counter: Arc::new(SharedCounter::default()),
            clock: ElapsedClock::new(),
            workers: Vec::new(),
            active: false,
            paused: false,
        };
        engine.prepare_vehicles();
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a fresh Ready fleet from the configured plan
    fn prepare_vehicles(&mut self) {
        self.workers = FleetManager::from_specs(&self.config.fleet)
            .into_vehicles()
            .into_iter()
            .map(VehicleWorker::new)
            .collect();
    }

    /// Start a new run, stopping any run already in progress
    pub fn start(&mut self, strategy: CounterStrategy) {
        self.stop();

        self.counter = Arc::new(SharedCounter::new(strategy));
        self.clock.reset();
        self.paused = false;
        self.prepare_vehicles();

        self.active = true;
        self.clock.start();

        let settings = self.config.tick_settings();
        for worker in &mut self.workers {
            if let Err(e) = worker.spawn(Arc::clone(&self.counter), settings) {
                warn!("Failed to start worker for {}: {}", worker.id(), e);
            }
        }

        info!(
            "Simulation started with {} vehicles ({} counter)",
            self.workers.len(),
            strategy
        );
    }

    /// Pause every worker and stop the clock
    pub fn pause(&mut self) {
        if !self.active {
            warn!("Pause requested with no simulation running");
            return;
        }
        if !self.paused {
            self.clock.pause();
            self.paused = true;
            info!("Simulation paused");
        }
        for worker in &self.workers {
            worker.pause();
        }
    }

    /// Resume every worker and restart the clock
    pub fn resume(&mut self) {
        if !self.active {
            warn!("Resume requested with no simulation running");
            return;
        }
        if self.paused {
            self.clock.resume();
            self.paused = false;
            info!("Simulation resumed");
        }
        for worker in &self.workers {
            worker.resume();
        }
    }

    /// End the current run and discard its workers
    ///
    /// Safe to call at any time; without an active run it only finalizes the clock.
    pub fn stop(&mut self) {
        self.clock.stop();
        if !self.active {
            return;
        }
        self.active = false;
        self.paused = false;

        for worker in &self.workers {
            worker.signal_stop();
        }
        for worker in &mut self.workers {
            worker.join();
        }
        self.workers.clear();

        info!(
            "Simulation stopped: highway distance {} after {}s",
            self.counter.read(),
            self.clock.elapsed_seconds()
        );
    }

    /// Stop, zero the counter and clock, and prepare a Ready fleet without starting it
    pub fn reset(&mut self) {
        self.stop();
        self.counter.reset();
        self.clock.reset();
        self.paused = false;
        self.prepare_vehicles();
        info!("Simulation reset with {} vehicles ready", self.workers.len());
    }

    fn worker(&self, id: &str) -> Result<&VehicleWorker, EngineError> {
        self.workers.iter().find(|w| w.id() == id).ok_or_else(|| {
            warn!("No vehicle with id {}", id);
            EngineError::UnknownVehicle(VehicleId::from(id))
        })
    }

    /// Pause one vehicle, leaving global state and other vehicles alone
    pub fn pause_vehicle(&self, id: &str) -> Result<(), EngineError> {
        if self.worker(id)?.pause() {
            info!("Vehicle {} paused", id);
        } else {
            warn!("Vehicle {} is not running; pause has no effect", id);
        }
        Ok(())
    }

    /// Resume one vehicle, leaving global state and other vehicles alone
    pub fn resume_vehicle(&self, id: &str) -> Result<(), EngineError> {
        if self.worker(id)?.resume() {
            info!("Vehicle {} resumed", id);
        } else {
            warn!("Vehicle {} is not running; resume has no effect", id);
        }
        Ok(())
    }

    /// Add fuel to one vehicle; never changes pause or run state
    pub fn refuel(&self, id: &str, amount: f64) -> Result<(), EngineError> {
        self.worker(id)?.refuel(amount).map_err(|e| {
            warn!("Refuel of {} rejected: {}", id, e);
            EngineError::from(e)
        })?;
        info!("Vehicle {} refueled with {:.1}", id, amount);
        Ok(())
    }

    /// Perform maintenance on one vehicle; a stalled worker resumes ticking
    pub fn service_vehicle(&self, id: &str) -> Result<(), EngineError> {
        self.worker(id)?.service();
        info!("Vehicle {} serviced", id);
        Ok(())
    }

    pub fn load_cargo(&self, id: &str, weight: f64) -> Result<(), EngineError> {
        self.worker(id)?
            .with_vehicle(|v| v.load_cargo(weight))
            .map_err(|e| {
                warn!("Loading cargo on {} rejected: {}", id, e);
                EngineError::from(e)
            })
    }

    pub fn board_passengers(&self, id: &str, count: u32) -> Result<(), EngineError> {
        self.worker(id)?
            .with_vehicle(|v| v.board_passengers(count))
            .map_err(|e| {
                warn!("Boarding passengers on {} rejected: {}", id, e);
                EngineError::from(e)
            })
    }

    /// Point-in-time status of every live worker
    pub fn snapshot(&self) -> Vec<StatusSnapshot> {
        self.workers.iter().map(VehicleWorker::snapshot).collect()
    }

    pub fn worker_state(&self, id: &str) -> Option<WorkerState> {
        self.workers
            .iter()
            .find(|w| w.id() == id)
            .map(VehicleWorker::state)
    }

    pub fn vehicle_ids(&self) -> Vec<VehicleId> {
        self.workers.iter().map(|w| w.id().clone()).collect()
    }

    /// Block until no worker is Running, or until `timeout` elapses
    ///
    /// Returns true when the whole fleet settled.
    pub fn wait_settled(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.workers.iter().all(|w| w.wait_settled(deadline))
    }

    pub fn highway_distance(&self) -> u64 {
        self.counter.read()
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.clock.elapsed_seconds()
    }

    pub fn strategy(&self) -> CounterStrategy {
        self.counter.strategy()
    }

    pub fn is_running(&self) -> bool {
        self.active
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Drop for SimulationEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
