//! Core types for the fleet simulation
//!
//! Identifiers, vehicle kinds and the constants shared by the vehicle model
//! and the engine.

use std::fmt;

/// A stable, fleet-unique vehicle identifier such as `"Car-A"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub String);

impl VehicleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl PartialEq<str> for VehicleId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for VehicleId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Where a vehicle travels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    Land,
    Air,
    Water,
}

impl Terrain {
    /// Multiplier applied to `distance / max_speed` when estimating a journey
    pub fn journey_factor(&self) -> f64 {
        match self {
            Terrain::Land => 1.1,
            Terrain::Air => 0.95,
            Terrain::Water => 1.15,
        }
    }
}

/// Type of vehicle in the fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleKind {
    /// Passenger car
    Car,
    /// City bus carrying passengers and a little cargo
    Bus,
    /// Freight truck, less efficient when loaded past half capacity
    Truck,
    /// Passenger and cargo airplane
    Airplane,
    /// Cargo ship; sail-powered ships burn no fuel
    CargoShip { sail: bool },
}

impl VehicleKind {
    pub fn terrain(&self) -> Terrain {
        match self {
            VehicleKind::Car | VehicleKind::Bus | VehicleKind::Truck => Terrain::Land,
            VehicleKind::Airplane => Terrain::Air,
            VehicleKind::CargoShip { .. } => Terrain::Water,
        }
    }

    /// Distance units per unit of fuel when unloaded. Zero means no fuel is burned.
    pub fn base_efficiency(&self) -> f64 {
        match self {
            VehicleKind::Car => 15.0,
            VehicleKind::Bus => 10.0,
            VehicleKind::Truck => 8.0,
            VehicleKind::Airplane => 5.0,
            VehicleKind::CargoShip { sail: true } => 0.0,
            VehicleKind::CargoShip { sail: false } => 4.0,
        }
    }

    pub fn burns_fuel(&self) -> bool {
        self.base_efficiency() > 0.0
    }

    pub fn passenger_capacity(&self) -> Option<u32> {
        match self {
            VehicleKind::Car => Some(5),
            VehicleKind::Bus => Some(50),
            VehicleKind::Airplane => Some(200),
            VehicleKind::Truck | VehicleKind::CargoShip { .. } => None,
        }
    }

    /// Cargo capacity in kilograms
    pub fn cargo_capacity(&self) -> Option<f64> {
        match self {
            VehicleKind::Car => None,
            VehicleKind::Bus => Some(500.0),
            VehicleKind::Truck => Some(5_000.0),
            VehicleKind::Airplane => Some(10_000.0),
            VehicleKind::CargoShip { .. } => Some(50_000.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VehicleKind::Car => "Car",
            VehicleKind::Bus => "Bus",
            VehicleKind::Truck => "Truck",
            VehicleKind::Airplane => "Airplane",
            VehicleKind::CargoShip { .. } => "CargoShip",
        }
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Distance a vehicle may cover after its last service before it must be maintained
pub const MAINTENANCE_INTERVAL: f64 = 10_000.0;

/// Distance covered by one tick of a vehicle worker
pub const DISTANCE_UNIT: f64 = 1.0;

/// Wall-clock time between two ticks of a vehicle worker, in milliseconds
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

/// Fraction of cargo capacity above which a truck loses efficiency
pub const TRUCK_HEAVY_LOAD_RATIO: f64 = 0.5;

/// Efficiency multiplier for a heavily loaded truck
pub const TRUCK_HEAVY_LOAD_PENALTY: f64 = 0.9;
