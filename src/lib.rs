//! Discrete-time simulator for a hydrogen-based hybrid energy-storage system.
//!
//! An energy-management dispatch loop asks a pluggable operation strategy for
//! a power setpoint each timestep, pushes it through the power-electronics
//! chain, and resolves the hydrogen subsystem (electrolyzer stack, gas
//! pressure regulation, thermal control, storage) before the next step begins.

pub mod config;
/// Energy management: dispatch entry point and operation strategies.
pub mod ems;
pub mod hydrogen;
pub mod io;
/// AC/DC and DC/DC converter models.
pub mod power;
pub mod profile;
/// Simulation engine, clock, step records, and run report.
pub mod sim;
