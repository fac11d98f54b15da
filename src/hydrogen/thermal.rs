//! Stack temperature regulation via coolant water temperature and flow.

use tracing::trace;

use crate::config::{ConfigError, ThermalConfig};
use crate::hydrogen::{MOLAR_MASS_WATER, SPECIFIC_HEAT_WATER};

/// Control outputs for one timestep.
#[derive(Debug, Clone, Copy)]
pub struct ThermalOutput {
    /// Water temperature fed into the stack (K).
    pub water_inlet_temperature_k: f64,
    /// Coolant water flow (mol/s), never below the configured minimum.
    pub water_flow_mol_s: f64,
    /// Applied cooling rate (K/s), clamped to the configured maximum.
    pub cooling_rate_k_s: f64,
    /// Saturating small-signal control factor in [-1, 1].
    pub control_factor: f64,
}

/// Temperature controller for the electrolyzer stack.
///
/// Stateless between calls: every output is a pure function of the current
/// stack temperature, the setpoint, and the timestep length. Flow is held at
/// the configured minimum whenever the stack is at or below the setpoint so
/// electrolyte circulation never stops; the at-setpoint case is routed into
/// that branch, which keeps the flow conversion free of a zero division.
#[derive(Debug, Clone)]
pub struct ThermalController {
    desired_temperature_k: f64,
    min_water_flow_mol_s: f64,
    max_cooling_rate_k_s: f64,
    delta_water_temperature_k: f64,
    control_slope_per_k: f64,
    stack_heat_capacity_j_per_k: f64,
}

impl ThermalController {
    /// Creates the controller from the thermal configuration and the lumped
    /// stack heat capacity.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for non-positive setpoint, minimum flow,
    /// cooling-rate bound, water temperature delta, slope, or heat capacity.
    pub fn new(
        config: &ThermalConfig,
        stack_heat_capacity_j_per_k: f64,
    ) -> Result<Self, ConfigError> {
        if config.desired_temperature_k <= 0.0 {
            return Err(ConfigError::new("thermal.desired_temperature_k", "must be > 0"));
        }
        if config.min_water_flow_mol_s <= 0.0 {
            return Err(ConfigError::new("thermal.min_water_flow_mol_s", "must be > 0"));
        }
        if config.max_cooling_rate_k_s <= 0.0 {
            return Err(ConfigError::new("thermal.max_cooling_rate_k_s", "must be > 0"));
        }
        if config.delta_water_temperature_k <= 0.0 {
            return Err(ConfigError::new(
                "thermal.delta_water_temperature_k",
                "must be > 0",
            ));
        }
        if config.control_slope_per_k <= 0.0 {
            return Err(ConfigError::new("thermal.control_slope_per_k", "must be > 0"));
        }
        if stack_heat_capacity_j_per_k <= 0.0 {
            return Err(ConfigError::new(
                "electrolyzer.heat_capacity_j_per_k",
                "must be > 0",
            ));
        }
        Ok(Self {
            desired_temperature_k: config.desired_temperature_k,
            min_water_flow_mol_s: config.min_water_flow_mol_s,
            max_cooling_rate_k_s: config.max_cooling_rate_k_s,
            delta_water_temperature_k: config.delta_water_temperature_k,
            control_slope_per_k: config.control_slope_per_k,
            stack_heat_capacity_j_per_k,
        })
    }

    /// Temperature setpoint (K).
    pub fn desired_temperature_k(&self) -> f64 {
        self.desired_temperature_k
    }

    /// Computes water inlet temperature and flow for one timestep.
    pub fn calculate(
        &self,
        stack_temperature_k: f64,
        heat_generated_w: f64,
        timestep_s: f64,
        current_density_a_m2: f64,
    ) -> ThermalOutput {
        let temp_diff = self.desired_temperature_k - stack_temperature_k;

        // Linear inside the +/-5 K band, saturating to +/-1 outside it.
        let control_factor = (self.control_slope_per_k * temp_diff).clamp(-1.0, 1.0);
        let water_inlet_temperature_k =
            stack_temperature_k - control_factor * self.delta_water_temperature_k;

        let (water_flow_mol_s, cooling_rate_k_s) =
            if stack_temperature_k <= self.desired_temperature_k {
                (self.min_water_flow_mol_s, 0.0)
            } else {
                // temp_diff is strictly negative here; the ideal rate removes
                // the whole excess within one timestep, bounded by the
                // thermal-shock limit of the stack materials.
                let ideal_rate = -temp_diff / timestep_s;
                let cooling_rate = ideal_rate.min(self.max_cooling_rate_k_s);
                let temp_excess = stack_temperature_k - self.desired_temperature_k;
                let flow = self.stack_heat_capacity_j_per_k * cooling_rate
                    / (SPECIFIC_HEAT_WATER * MOLAR_MASS_WATER * temp_excess);
                (flow.max(self.min_water_flow_mol_s), cooling_rate)
            };

        trace!(
            stack_temperature_k,
            heat_generated_w,
            current_density_a_m2,
            cooling_rate_k_s,
            "thermal control step"
        );

        ThermalOutput {
            water_inlet_temperature_k,
            water_flow_mol_s,
            cooling_rate_k_s,
            control_factor,
        }
    }
}

/// Lumped zero-dimensional thermal model of the stack body.
#[derive(Debug, Clone)]
pub struct StackThermalModel {
    heat_capacity_j_per_k: f64,
}

impl StackThermalModel {
    /// Creates the model with the given lumped heat capacity.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a non-positive heat capacity.
    pub fn new(heat_capacity_j_per_k: f64) -> Result<Self, ConfigError> {
        if heat_capacity_j_per_k <= 0.0 {
            return Err(ConfigError::new(
                "electrolyzer.heat_capacity_j_per_k",
                "must be > 0",
            ));
        }
        Ok(Self { heat_capacity_j_per_k })
    }

    /// Advances the stack temperature by one explicit Euler step.
    pub fn step(
        &self,
        temperature_k: f64,
        heat_generated_w: f64,
        cooling_rate_k_s: f64,
        timestep_s: f64,
    ) -> f64 {
        temperature_k + heat_generated_w / self.heat_capacity_j_per_k * timestep_s
            - cooling_rate_k_s * timestep_s
    }
}
