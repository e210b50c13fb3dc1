//! Error types for the fleet simulation
//!
//! None of these are fatal: callers log them and carry on.

use thiserror::Error;

use super::types::VehicleId;

/// A vehicle refused an operation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VehicleError {
    #[error("vehicle id must not be empty")]
    EmptyId,

    #[error("vehicle {0} requires maintenance and cannot move")]
    NeedsMaintenance(VehicleId),

    #[error("distance must be a non-negative number (got {0})")]
    InvalidDistance(f64),

    #[error("not enough fuel for {id}: need {required:.2}, have {available:.2}")]
    InsufficientFuel {
        id: VehicleId,
        required: f64,
        available: f64,
    },

    #[error("refuel amount must be positive (got {0})")]
    InvalidFuelAmount(f64),

    #[error("vehicle {0} does not take fuel")]
    NoFuelTank(VehicleId),

    #[error("vehicle {0} does not carry cargo")]
    NoCargoHold(VehicleId),

    #[error("vehicle {0} does not carry passengers")]
    NoCabin(VehicleId),

    #[error("cargo weight must be positive (got {0})")]
    InvalidWeight(f64),

    #[error("{id} overloaded: {requested} requested, {remaining} remaining")]
    Overload {
        id: VehicleId,
        requested: f64,
        remaining: f64,
    },

    #[error("{id} cannot give up {requested}, only {on_board} on board")]
    NotOnBoard {
        id: VehicleId,
        requested: f64,
        on_board: f64,
    },

    #[error("max speed must be positive (got {0})")]
    InvalidSpeed(f64),
}

/// A registry operation failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FleetError {
    #[error("vehicle id {0} is already in the fleet")]
    DuplicateId(VehicleId),

    #[error("vehicle {0} not found")]
    NotFound(VehicleId),

    #[error(transparent)]
    Vehicle(#[from] VehicleError),
}

/// A per-vehicle engine request was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("no vehicle with id {0} in the simulation")]
    UnknownVehicle(VehicleId),

    #[error(transparent)]
    Vehicle(#[from] VehicleError),
}
