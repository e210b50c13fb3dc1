//! Fleet registry and fleet plans
//!
//! [`FleetManager`] is a flat, linear-scan registry of vehicles.
//! [`VehicleSpec`] describes a vehicle to build when the engine prepares a run.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use anyhow::{Context, Result};
use log::{info, warn};

use super::error::{FleetError, VehicleError};
use super::types::{Terrain, VehicleId, VehicleKind};
use super::vehicle::Vehicle;

/// Blueprint for one vehicle of a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSpec {
    pub kind: VehicleKind,
    pub id: String,
    pub model: String,
    pub max_speed: f64,
    /// Fuel put in the tank before the run starts
    pub fuel: f64,
    /// Starting odometer reading
    pub mileage: f64,
}

impl VehicleSpec {
    pub fn new(
        kind: VehicleKind,
        id: impl Into<String>,
        model: impl Into<String>,
        max_speed: f64,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            model: model.into(),
            max_speed,
            fuel: 0.0,
            mileage: 0.0,
        }
    }

    pub fn with_fuel(mut self, fuel: f64) -> Self {
        self.fuel = fuel;
        self
    }

    pub fn with_mileage(mut self, mileage: f64) -> Self {
        self.mileage = mileage;
        self
    }

    pub fn build(&self) -> Result<Vehicle, VehicleError> {
        let mut vehicle = Vehicle::new(self.kind, self.id.clone(), self.model.clone(), self.max_speed)?;
        vehicle.add_mileage(self.mileage);
        if self.fuel > 0.0 {
            vehicle.refuel(self.fuel)?;
        }
        Ok(vehicle)
    }
}

/// The demo fleet: one car, one bus and one truck with sensible fuel levels
pub fn default_fleet() -> Vec<VehicleSpec> {
    vec![
        VehicleSpec::new(VehicleKind::Car, "Car-A", "Sedan", 120.0).with_fuel(50.0),
        VehicleSpec::new(VehicleKind::Bus, "Bus-A", "CityBus", 80.0).with_fuel(100.0),
        VehicleSpec::new(VehicleKind::Truck, "Truck-A", "Hauler", 100.0).with_fuel(200.0),
    ]
}

/// Registry of vehicles keyed by their unique id
#[derive(Debug, Clone, Default)]
pub struct FleetManager {
    vehicles: Vec<Vehicle>,
}

impl FleetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fleet from a plan, skipping (and logging) vehicles that fail to build
    /// or reuse an id already taken
    pub fn from_specs(specs: &[VehicleSpec]) -> Self {
        let mut fleet = Self::new();
        for spec in specs {
            if let Err(e) = fleet.add_spec(spec) {
                warn!("Skipping vehicle: {:#}", e);
            }
        }
        fleet
    }

    fn add_spec(&mut self, spec: &VehicleSpec) -> Result<()> {
        let vehicle = spec
            .build()
            .with_context(|| format!("Failed to build vehicle {:?}", spec.id))?;
        self.add_vehicle(vehicle)
            .with_context(|| format!("Failed to register vehicle {:?}", spec.id))?;
        Ok(())
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<(), FleetError> {
        if self.get(vehicle.id().as_str()).is_some() {
            return Err(FleetError::DuplicateId(vehicle.id().clone()));
        }
        self.vehicles.push(vehicle);
        Ok(())
    }

    pub fn remove_vehicle(&mut self, id: &str) -> Result<Vehicle, FleetError> {
        let index = self
            .vehicles
            .iter()
            .position(|v| v.id() == id)
            .ok_or_else(|| FleetError::NotFound(VehicleId::from(id)))?;
        info!("Vehicle with ID {} removed", id);
        Ok(self.vehicles.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.id() == id)
    }

    fn require_mut(&mut self, id: &str) -> Result<&mut Vehicle, FleetError> {
        self.get_mut(id)
            .ok_or_else(|| FleetError::NotFound(VehicleId::from(id)))
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    pub fn into_vehicles(self) -> Vec<Vehicle> {
        self.vehicles
    }

    /// Move one vehicle, returning the fuel it used
    pub fn start_journey(&mut self, id: &str, distance: f64) -> Result<f64, FleetError> {
        Ok(self.require_mut(id)?.advance(distance)?)
    }

    /// Move every vehicle the same distance; one outcome per vehicle
    pub fn start_all_journeys(&mut self, distance: f64) -> Vec<(VehicleId, Result<f64, VehicleError>)> {
        self.vehicles
            .iter_mut()
            .map(|v| {
                let outcome = v.advance(distance);
                if let Err(e) = &outcome {
                    warn!("Journey failed for {}: {}", v.id(), e);
                }
                (v.id().clone(), outcome)
            })
            .collect()
    }

    pub fn refuel_vehicle(&mut self, id: &str, amount: f64) -> Result<(), FleetError> {
        Ok(self.require_mut(id)?.refuel(amount)?)
    }

    /// Refuel every vehicle that has a tank; returns how many were refueled
    pub fn refuel_all(&mut self, amount: f64) -> usize {
        let mut refueled = 0;
        for vehicle in self.vehicles.iter_mut().filter(|v| v.fuel_level().is_some()) {
            match vehicle.refuel(amount) {
                Ok(()) => refueled += 1,
                Err(e) => warn!("Refuel failed for {}: {}", vehicle.id(), e),
            }
        }
        refueled
    }

    pub fn load_cargo(&mut self, id: &str, weight: f64) -> Result<(), FleetError> {
        Ok(self.require_mut(id)?.load_cargo(weight)?)
    }

    pub fn unload_cargo(&mut self, id: &str, weight: f64) -> Result<(), FleetError> {
        Ok(self.require_mut(id)?.unload_cargo(weight)?)
    }

    pub fn board_passengers(&mut self, id: &str, count: u32) -> Result<(), FleetError> {
        Ok(self.require_mut(id)?.board_passengers(count)?)
    }

    pub fn disembark_passengers(&mut self, id: &str, count: u32) -> Result<(), FleetError> {
        Ok(self.require_mut(id)?.disembark_passengers(count)?)
    }

    /// Service every vehicle that is due; returns how many were serviced
    pub fn maintain_all(&mut self) -> usize {
        let mut serviced = 0;
        for vehicle in self.vehicles.iter_mut().filter(|v| v.needs_maintenance()) {
            vehicle.perform_maintenance();
            serviced += 1;
        }
        serviced
    }

    pub fn needing_maintenance(&self) -> Vec<&Vehicle> {
        self.vehicles.iter().filter(|v| v.needs_maintenance()).collect()
    }

    pub fn search_by_kind(&self, kind: VehicleKind) -> Vec<&Vehicle> {
        self.vehicles.iter().filter(|v| v.kind() == kind).collect()
    }

    pub fn search_by_terrain(&self, terrain: Terrain) -> Vec<&Vehicle> {
        self.vehicles
            .iter()
            .filter(|v| v.kind().terrain() == terrain)
            .collect()
    }

    /// Least efficient first
    pub fn sort_by_efficiency(&mut self) {
        self.vehicles
            .sort_by(|a, b| a.fuel_efficiency().total_cmp(&b.fuel_efficiency()));
    }

    pub fn sort_by_model(&mut self) {
        self.vehicles.sort_by(|a, b| a.model().cmp(b.model()));
    }

    /// Fuel the whole fleet would burn covering `distance`
    pub fn total_fuel_consumption(&self, distance: f64) -> f64 {
        self.vehicles
            .iter()
            .filter(|v| v.fuel_level().is_some())
            .map(|v| v.fuel_required(distance))
            .sum()
    }

    pub fn distinct_models_sorted(&self) -> Vec<String> {
        self.vehicles
            .iter()
            .map(|v| v.model().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn fastest(&self) -> Option<&Vehicle> {
        self.vehicles.iter().max_by(|a, b| compare_speed(a, b))
    }

    pub fn slowest(&self) -> Option<&Vehicle> {
        self.vehicles.iter().min_by(|a, b| compare_speed(a, b))
    }

    /// Human-readable fleet summary, one line per vehicle
    pub fn report(&self) -> String {
        let mut out = format!("=== Fleet Report ({} vehicles) ===\n", self.vehicles.len());
        for v in &self.vehicles {
            let fuel = v
                .fuel_level()
                .map(|f| format!("{:.1}", f))
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "{:<10} {:<10} {:<10} mileage={:.1} fuel={} maintenance={}\n",
                v.id(),
                v.kind(),
                v.model(),
                v.mileage(),
                fuel,
                if v.needs_maintenance() { "due" } else { "ok" }
            ));
        }
        out
    }
}

fn compare_speed(a: &Vehicle, b: &Vehicle) -> Ordering {
    a.max_speed().total_cmp(&b.max_speed())
}
