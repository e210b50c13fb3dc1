//! Vehicle capability and state model
//!
//! A [`Vehicle`] tracks mileage, fuel, cargo, passengers and maintenance for
//! one member of the fleet. It is not synchronized; the engine keeps each
//! vehicle behind its worker's mutex.

use log::debug;

use super::error::VehicleError;
use super::types::{
    VehicleId, VehicleKind, MAINTENANCE_INTERVAL, TRUCK_HEAVY_LOAD_PENALTY,
    TRUCK_HEAVY_LOAD_RATIO,
};

/// A single vehicle in the fleet
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: VehicleId,
    model: String,
    kind: VehicleKind,
    max_speed: f64,
    mileage: f64,
    /// `None` for vehicles that burn no fuel
    fuel_level: Option<f64>,
    passengers: u32,
    cargo: f64,
    maintenance_flag: bool,
    last_service_mileage: f64,
}

impl Vehicle {
    pub fn new(
        kind: VehicleKind,
        id: impl Into<String>,
        model: impl Into<String>,
        max_speed: f64,
    ) -> Result<Self, VehicleError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(VehicleError::EmptyId);
        }

        Ok(Self {
            id: VehicleId(id),
            model: model.into(),
            kind,
            max_speed,
            mileage: 0.0,
            fuel_level: kind.burns_fuel().then_some(0.0),
            passengers: 0,
            cargo: 0.0,
            maintenance_flag: false,
            last_service_mileage: 0.0,
        })
    }

    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn mileage(&self) -> f64 {
        self.mileage
    }

    pub fn fuel_level(&self) -> Option<f64> {
        self.fuel_level
    }

    pub fn passengers(&self) -> u32 {
        self.passengers
    }

    pub fn cargo(&self) -> f64 {
        self.cargo
    }

    pub fn passenger_capacity(&self) -> Option<u32> {
        self.kind.passenger_capacity()
    }

    pub fn cargo_capacity(&self) -> Option<f64> {
        self.kind.cargo_capacity()
    }

    /// Distance per unit of fuel at the current load
    pub fn fuel_efficiency(&self) -> f64 {
        let base = self.kind.base_efficiency();
        match (self.kind, self.kind.cargo_capacity()) {
            (VehicleKind::Truck, Some(capacity))
                if self.cargo > capacity * TRUCK_HEAVY_LOAD_RATIO =>
            {
                base * TRUCK_HEAVY_LOAD_PENALTY
            }
            _ => base,
        }
    }

    /// Fuel needed to cover `distance` at the current load
    pub fn fuel_required(&self, distance: f64) -> f64 {
        let efficiency = self.fuel_efficiency();
        if efficiency > 0.0 {
            distance / efficiency
        } else {
            0.0
        }
    }

    /// Move the vehicle forward, burning fuel if it has a tank
    ///
    /// Returns the fuel used. Nothing changes when the move is refused.
    pub fn advance(&mut self, distance: f64) -> Result<f64, VehicleError> {
        if self.needs_maintenance() {
            return Err(VehicleError::NeedsMaintenance(self.id.clone()));
        }
        if !distance.is_finite() || distance < 0.0 {
            return Err(VehicleError::InvalidDistance(distance));
        }

        let required = self.fuel_required(distance);
        if let Some(level) = self.fuel_level {
            if required > level {
                return Err(VehicleError::InsufficientFuel {
                    id: self.id.clone(),
                    required,
                    available: level,
                });
            }
            self.fuel_level = Some(level - required);
        }

        self.add_mileage(distance);
        debug!(
            "{} {} moved {:.2} (fuel used {:.2})",
            self.kind, self.id, distance, required
        );
        Ok(required)
    }

    /// Add to the odometer. Non-positive deltas are ignored.
    pub fn add_mileage(&mut self, distance: f64) {
        if distance > 0.0 {
            self.mileage += distance;
        }
    }

    pub fn refuel(&mut self, amount: f64) -> Result<(), VehicleError> {
        let Some(level) = self.fuel_level else {
            return Err(VehicleError::NoFuelTank(self.id.clone()));
        };
        if !(amount > 0.0 && amount.is_finite()) {
            return Err(VehicleError::InvalidFuelAmount(amount));
        }
        self.fuel_level = Some(level + amount);
        Ok(())
    }

    pub fn board_passengers(&mut self, count: u32) -> Result<(), VehicleError> {
        let capacity = self
            .passenger_capacity()
            .ok_or_else(|| VehicleError::NoCabin(self.id.clone()))?;
        let remaining = capacity - self.passengers;
        if count > remaining {
            return Err(VehicleError::Overload {
                id: self.id.clone(),
                requested: count as f64,
                remaining: remaining as f64,
            });
        }
        self.passengers += count;
        Ok(())
    }

    pub fn disembark_passengers(&mut self, count: u32) -> Result<(), VehicleError> {
        if self.passenger_capacity().is_none() {
            return Err(VehicleError::NoCabin(self.id.clone()));
        }
        if count > self.passengers {
            return Err(VehicleError::NotOnBoard {
                id: self.id.clone(),
                requested: count as f64,
                on_board: self.passengers as f64,
            });
        }
        self.passengers -= count;
        Ok(())
    }

    pub fn load_cargo(&mut self, weight: f64) -> Result<(), VehicleError> {
        let capacity = self
            .cargo_capacity()
            .ok_or_else(|| VehicleError::NoCargoHold(self.id.clone()))?;
        if !(weight > 0.0 && weight.is_finite()) {
            return Err(VehicleError::InvalidWeight(weight));
        }
        let remaining = capacity - self.cargo;
        if weight > remaining {
            return Err(VehicleError::Overload {
                id: self.id.clone(),
                requested: weight,
                remaining,
            });
        }
        self.cargo += weight;
        Ok(())
    }

    pub fn unload_cargo(&mut self, weight: f64) -> Result<(), VehicleError> {
        if self.cargo_capacity().is_none() {
            return Err(VehicleError::NoCargoHold(self.id.clone()));
        }
        if !(weight > 0.0 && weight.is_finite()) {
            return Err(VehicleError::InvalidWeight(weight));
        }
        if weight > self.cargo {
            return Err(VehicleError::NotOnBoard {
                id: self.id.clone(),
                requested: weight,
                on_board: self.cargo,
            });
        }
        self.cargo -= weight;
        Ok(())
    }

    /// Flag the vehicle for service regardless of mileage
    pub fn schedule_maintenance(&mut self) {
        self.maintenance_flag = true;
    }

    pub fn needs_maintenance(&self) -> bool {
        self.maintenance_flag || self.mileage - self.last_service_mileage >= MAINTENANCE_INTERVAL
    }

    pub fn perform_maintenance(&mut self) {
        self.last_service_mileage = self.mileage;
        self.maintenance_flag = false;
        debug!("{} {} maintenance performed", self.kind, self.id);
    }

    /// Hours needed to cover `distance` at top speed, adjusted for terrain
    pub fn estimate_journey_time(&self, distance: f64) -> Result<f64, VehicleError> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(VehicleError::InvalidDistance(distance));
        }
        if self.max_speed <= 0.0 {
            return Err(VehicleError::InvalidSpeed(self.max_speed));
        }
        Ok(distance / self.max_speed * self.kind.terrain().journey_factor())
    }
}
