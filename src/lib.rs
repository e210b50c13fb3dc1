//! Fleet Simulation Library
//!
//! Models a fleet of land, air and water vehicles and drives them
//! concurrently along a shared highway.

pub mod simulation;
