//! Per-vehicle worker threads
//!
//! Each [`VehicleWorker`] owns one vehicle and drives it from a dedicated
//! thread. The worker's control block (running flag, pause latch, blocked
//! reasons and status text) sits behind a mutex paired with a condition
//! variable. The thread waits on that condition while it is paused, out of
//! fuel or stalled, and between ticks; stop clears the running flag and
//! notifies, so every wait ends promptly.
//!
//! Lock order is always vehicle, then control.

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::counter::SharedCounter;
use super::error::VehicleError;
use super::types::VehicleId;
use super::vehicle::Vehicle;

/// Lifecycle state of a vehicle worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Prepared but not yet scheduled
    Ready,
    /// Ticking
    Running,
    /// Paused by a global or per-vehicle request
    Paused,
    /// Last advance failed for lack of fuel; waiting for a refuel
    OutOfFuel,
    /// Last advance was refused because maintenance is due; waiting for service
    Stalled,
    /// Reached the run's tick limit
    Finished,
    /// Stopped by the engine
    Stopped,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            WorkerState::Ready => "Ready",
            WorkerState::Running => "Running",
            WorkerState::Paused => "Paused",
            WorkerState::OutOfFuel => "OutOfFuel",
            WorkerState::Stalled => "Stalled (needs maintenance)",
            WorkerState::Finished => "Finished",
            WorkerState::Stopped => "Stopped",
        };
        f.write_str(text)
    }
}

/// Per-run tick parameters shared by every worker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSettings {
    /// Wall-clock pause between two ticks
    pub interval: Duration,
    /// Distance each tick tries to cover
    pub distance: f64,
    /// Amount added to the highway counter per successful tick
    pub delta: u64,
    /// Successful ticks after which the worker finishes
    pub limit: Option<u64>,
}

/// Immutable copy of one worker's status
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub id: VehicleId,
    pub mileage: f64,
    pub fuel: Option<f64>,
    pub state: WorkerState,
    pub status: String,
}

impl StatusSnapshot {
    pub fn mileage_text(&self) -> String {
        format!("{:.1}", self.mileage)
    }

    /// Fuel level, or `-` for vehicles without a tank
    pub fn fuel_text(&self) -> String {
        self.fuel
            .map(|f| format!("{:.1}", f))
            .unwrap_or_else(|| "-".to_string())
    }

    /// Table row: id, mileage, fuel, status
    pub fn row(&self) -> [String; 4] {
        [
            self.id.to_string(),
            self.mileage_text(),
            self.fuel_text(),
            self.status.clone(),
        ]
    }
}

#[derive(Debug)]
struct Control {
    state: WorkerState,
    running: bool,
    paused: bool,
    out_of_fuel: bool,
    stalled: bool,
    status: String,
    /// Last known mileage and fuel, shown alongside `Running`
    line: String,
}

impl Control {
    fn new() -> Self {
        Self {
            state: WorkerState::Ready,
            running: false,
            paused: false,
            out_of_fuel: false,
            stalled: false,
            status: WorkerState::Ready.to_string(),
            line: String::new(),
        }
    }

    fn blocked(&self) -> bool {
        self.paused || self.out_of_fuel || self.stalled
    }

    /// Recompute the state of a running worker from its flags
    fn refresh(&mut self) {
        if !self.running {
            return;
        }
        let next = if self.paused {
            WorkerState::Paused
        } else if self.out_of_fuel {
            WorkerState::OutOfFuel
        } else if self.stalled {
            WorkerState::Stalled
        } else {
            WorkerState::Running
        };
        if next != self.state {
            self.state = next;
            self.status = match next {
                WorkerState::Running if !self.line.is_empty() => format!("Running {}", self.line),
                other => other.to_string(),
            };
        }
    }

    fn settle(&mut self, state: WorkerState, status: String) {
        self.running = false;
        self.state = state;
        self.status = status;
    }
}

struct Shared {
    vehicle: Mutex<Vehicle>,
    control: Mutex<Control>,
    wake: Condvar,
    advances: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Settles the control block when the thread body exits, including by panic
struct ExitGuard<'a>(&'a Shared);

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        let mut control = self.0.control();
        if control.running {
            if thread::panicking() {
                warn!("Worker thread exited by panic");
            }
            control.settle(WorkerState::Stopped, "Stopped (worker exited)".to_string());
        }
        self.0.wake.notify_all();
    }
}

enum TickOutcome {
    Advanced,
    Blocked,
    Finished,
}

impl Shared {
    fn control(&self) -> MutexGuard<'_, Control> {
        lock(&self.control)
    }

    fn run(&self, counter: &SharedCounter, settings: TickSettings) {
        let _guard = ExitGuard(self);
        loop {
            {
                let control = self.control();
                let control = self
                    .wake
                    .wait_while(control, |c| c.running && c.blocked())
                    .unwrap_or_else(PoisonError::into_inner);
                if !control.running {
                    break;
                }
            }

            if settings.limit.is_some_and(|limit| self.advances.load(Ordering::Relaxed) >= limit) {
                self.finish();
                break;
            }

            if let TickOutcome::Finished = self.tick(counter, &settings) {
                break;
            }

            let control = self.control();
            let (control, _) = self
                .wake
                .wait_timeout_while(control, settings.interval, |c| c.running)
                .unwrap_or_else(PoisonError::into_inner);
            if !control.running {
                break;
            }
        }
    }

    fn tick(&self, counter: &SharedCounter, settings: &TickSettings) -> TickOutcome {
        let mut vehicle = lock(&self.vehicle);
        let line = match vehicle.advance(settings.distance) {
            Ok(_) => describe(&vehicle),
            Err(e) => {
                // Flag the failure while still holding the vehicle so a
                // concurrent refuel or service cannot slip in between.
                let mut control = self.control();
                match e {
                    VehicleError::InsufficientFuel { .. } => {
                        info!("{} is out of fuel", vehicle.id());
                        control.out_of_fuel = true;
                    }
                    other => {
                        warn!("{} stalled: {}", vehicle.id(), other);
                        control.stalled = true;
                    }
                }
                control.refresh();
                self.wake.notify_all();
                return TickOutcome::Blocked;
            }
        };
        let id = vehicle.id().clone();
        drop(vehicle);

        counter.increment(settings.delta);
        let advances = self.advances.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("{} tick {}: {}", id, advances, line);

        if settings.limit.is_some_and(|limit| advances >= limit) {
            self.finish();
            return TickOutcome::Finished;
        }

        let mut control = self.control();
        if control.state == WorkerState::Running {
            control.status = format!("Running {}", line);
        }
        control.line = line;
        TickOutcome::Advanced
    }

    /// Settle a running worker as Finished
    fn finish(&self) {
        let vehicle = lock(&self.vehicle);
        let mut control = self.control();
        if !control.running {
            return;
        }
        info!(
            "{} finished after {} ticks",
            vehicle.id(),
            self.advances.load(Ordering::Relaxed)
        );
        control.settle(WorkerState::Finished, format!("Finished {}", describe(&vehicle)));
        self.wake.notify_all();
    }
}

fn describe(vehicle: &Vehicle) -> String {
    match vehicle.fuel_level() {
        Some(fuel) => format!("(mileage={:.1}, fuel={:.1})", vehicle.mileage(), fuel),
        None => format!("(mileage={:.1})", vehicle.mileage()),
    }
}

/// One vehicle and the thread that drives it
pub struct VehicleWorker {
    id: VehicleId,
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl VehicleWorker {
    pub fn new(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id().clone(),
            shared: Arc::new(Shared {
                vehicle: Mutex::new(vehicle),
                control: Mutex::new(Control::new()),
                wake: Condvar::new(),
                advances: AtomicU64::new(0),
            }),
            handle: None,
        }
    }

    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn state(&self) -> WorkerState {
        self.shared.control().state
    }

    /// Successful ticks so far
    pub fn advances(&self) -> u64 {
        self.shared.advances.load(Ordering::Relaxed)
    }

    /// Move a Ready worker to Running on its own thread
    pub fn spawn(&mut self, counter: Arc<SharedCounter>, settings: TickSettings) -> io::Result<()> {
        {
            let vehicle = lock(&self.shared.vehicle);
            let mut control = self.shared.control();
            if control.state != WorkerState::Ready {
                return Ok(());
            }
            control.line = describe(&vehicle);
            control.running = true;
            control.refresh();
        }

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name(format!("vehicle-{}", self.id))
            .spawn(move || shared.run(&counter, settings));

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.shared
                    .control()
                    .settle(WorkerState::Stopped, format!("Failed to start: {}", e));
                Err(e)
            }
        }
    }

    /// Latch a pause; returns false when the worker is not running
    pub fn pause(&self) -> bool {
        let mut control = self.shared.control();
        control.paused = true;
        control.refresh();
        self.shared.wake.notify_all();
        control.running
    }

    /// Release a pause; returns false when the worker is not running
    pub fn resume(&self) -> bool {
        let vehicle = lock(&self.shared.vehicle);
        let mut control = self.shared.control();
        control.line = describe(&vehicle);
        control.paused = false;
        control.refresh();
        self.shared.wake.notify_all();
        control.running
    }

    /// Refuel the vehicle; an OutOfFuel worker goes back to ticking
    pub fn refuel(&self, amount: f64) -> Result<(), VehicleError> {
        let mut vehicle = lock(&self.shared.vehicle);
        vehicle.refuel(amount)?;
        let mut control = self.shared.control();
        control.line = describe(&vehicle);
        if control.out_of_fuel {
            control.out_of_fuel = false;
            control.refresh();
            self.shared.wake.notify_all();
        }
        Ok(())
    }

    /// Service the vehicle; a Stalled worker goes back to ticking
    pub fn service(&self) {
        let mut vehicle = lock(&self.shared.vehicle);
        vehicle.perform_maintenance();
        let mut control = self.shared.control();
        control.line = describe(&vehicle);
        if control.stalled {
            control.stalled = false;
            control.refresh();
            self.shared.wake.notify_all();
        }
    }

    /// Run `f` against the vehicle, excluding the worker's own ticks
    pub fn with_vehicle<R>(&self, f: impl FnOnce(&mut Vehicle) -> R) -> R {
        f(&mut lock(&self.shared.vehicle))
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let vehicle = lock(&self.shared.vehicle);
        let control = self.shared.control();
        StatusSnapshot {
            id: self.id.clone(),
            mileage: vehicle.mileage(),
            fuel: vehicle.fuel_level(),
            state: control.state,
            status: control.status.clone(),
        }
    }

    /// Block until the worker is no longer Running or `deadline` passes
    ///
    /// Returns true when the worker settled.
    pub fn wait_settled(&self, deadline: Instant) -> bool {
        let control = self.shared.control();
        let timeout = deadline.saturating_duration_since(Instant::now());
        let (control, _) = self
            .shared
            .wake
            .wait_timeout_while(control, timeout, |c| {
                c.running && c.state == WorkerState::Running
            })
            .unwrap_or_else(PoisonError::into_inner);
        !(control.running && control.state == WorkerState::Running)
    }

    /// Ask the thread to exit and wake it from any wait
    pub fn signal_stop(&self) {
        let mut control = self.shared.control();
        if control.running || control.state != WorkerState::Finished {
            control.settle(WorkerState::Stopped, WorkerState::Stopped.to_string());
        }
        self.shared.wake.notify_all();
    }

    /// Wait for the thread to exit
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Worker thread for {} panicked", self.id);
            }
        }
    }

    pub fn stop(&mut self) {
        self.signal_stop();
        self.join();
    }
}

impl Drop for VehicleWorker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop();
        }
    }
}

impl fmt::Debug for VehicleWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VehicleWorker")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("advances", &self.advances())
            .finish()
    }
}
