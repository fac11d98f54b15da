//! Core simulation types: timing configuration and step records.

use std::fmt;

use crate::config::SimulationConfig;

/// Resolved simulation timing shared by the engine and the report.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Timestep length in seconds.
    pub timestep_s: f64,
    /// Total number of timesteps.
    pub steps: usize,
    /// Simulation start time in seconds.
    pub start_time_s: f64,
    /// Master random seed used by the synthetic profiles.
    pub seed: u64,
}

impl SimConfig {
    /// Creates a new timing configuration.
    ///
    /// # Panics
    ///
    /// Panics if `timestep_s` is not positive or `steps` is zero.
    pub fn new(timestep_s: f64, steps: usize, start_time_s: f64, seed: u64) -> Self {
        assert!(timestep_s > 0.0, "timestep_s must be > 0");
        assert!(steps > 0, "steps must be > 0");
        Self {
            timestep_s,
            steps,
            start_time_s,
            seed,
        }
    }

    /// Builds the timing from the validated scenario configuration.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            config.timestep_s,
            config.steps,
            config.start_time_s,
            config.seed,
        )
    }

    /// Simulated duration across all steps (s).
    pub fn total_duration_s(&self) -> f64 {
        self.timestep_s * self.steps as f64
    }

    /// Simulation time at the beginning of step `t` (s).
    pub fn time_at(&self, t: usize) -> f64 {
        self.start_time_s + t as f64 * self.timestep_s
    }
}

/// Complete record of one simulation timestep.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Timestep index.
    pub timestep: usize,
    /// Simulation time (s).
    pub time_s: f64,
    /// AC power requested by the strategy (W, charge-positive).
    pub power_requested_w: f64,
    /// DC power realized at the stack (W).
    pub power_dc_w: f64,
    /// AC power realized on the grid side (W).
    pub power_ac_w: f64,
    /// Delivered vs. requested power ratio in [0, 1].
    pub fulfillment: f64,
    /// Stack current (A).
    pub current_a: f64,
    /// Stack terminal voltage (V).
    pub voltage_v: f64,
    /// Cell current density (A/m^2).
    pub current_density_a_m2: f64,
    /// Stack temperature after the step (K).
    pub temperature_k: f64,
    /// Anode pressure (bar gauge).
    pub pressure_anode_bar: f64,
    /// Cathode pressure (bar gauge).
    pub pressure_cathode_bar: f64,
    /// Net hydrogen production (mol/s).
    pub hydrogen_production_mol_s: f64,
    /// Net oxygen production (mol/s).
    pub oxygen_production_mol_s: f64,
    /// Hydrogen drawn by the fuel cell (mol/s).
    pub hydrogen_use_mol_s: f64,
    /// Coolant water flow (mol/s).
    pub water_flow_mol_s: f64,
    /// Storage state of charge in [0, 1].
    pub soc: f64,
    /// Stack state of health in [0, 1].
    pub soh: f64,
    /// Dissipated power: stack heat plus conversion losses (W).
    pub power_loss_w: f64,
    /// `true` while the electrolyzer was consuming power.
    pub is_charge: bool,
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>6} ({:>9.1}s) | req={:>9.1} W  ac={:>9.1} W  dc={:>9.1} W  \
             ff={:.2} | I={:>6.1} A  U={:>6.1} V  T={:>6.2} K | \
             p_an={:>5.2} bar  p_cat={:>5.2} bar | H2={:+.5e} mol/s  \
             SoC={:>5.1}%",
            self.timestep,
            self.time_s,
            self.power_requested_w,
            self.power_ac_w,
            self.power_dc_w,
            self.fulfillment,
            self.current_a,
            self.voltage_v,
            self.temperature_k,
            self.pressure_anode_bar,
            self.pressure_cathode_bar,
            self.hydrogen_production_mol_s,
            self.soc * 100.0,
        )
    }
}
