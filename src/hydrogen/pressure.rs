//! Gas-side pressure regulation for the alkaline stack.
//!
//! The pressure model integrates net molar flow into the separator gas
//! volumes and derives outflow rates toward the storage. Controllers are
//! pure functions of the values passed in; the model only stores the
//! derived scalars of the latest `calculate` call behind accessors.

use crate::config::ConfigError;
use crate::hydrogen::{BAR_TO_PASCAL, IDEAL_GAS};

/// Replaceable outflow policy reconciling produced gas against the desired
/// pressure.
///
/// `previous_outflow_mol_s` is a seed value for iterative policies; the
/// provided implementations derive their output from the other arguments
/// alone, so repeated calls with identical inputs are idempotent.
pub trait PressureController: std::fmt::Debug {
    /// Returns the outflow rate (mol/s) toward the storage.
    fn outflow(
        &self,
        desired_bar: f64,
        current_bar: f64,
        production_mol_s: f64,
        previous_outflow_mol_s: f64,
    ) -> f64;
}

/// Pass-through policy for pipeline storage: everything produced leaves the
/// separator immediately, pressure deviations are not corrected.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCorrection;

impl PressureController for NoCorrection {
    fn outflow(
        &self,
        _desired_bar: f64,
        _current_bar: f64,
        production_mol_s: f64,
        _previous_outflow_mol_s: f64,
    ) -> f64 {
        production_mol_s.max(0.0)
    }
}

/// Proportional correction toward the desired pressure, used with tank
/// storage where the separator pressure must track the setpoint.
#[derive(Debug, Clone, Copy)]
pub struct ProportionalCorrection {
    /// Controller gain (mol/s of extra outflow per bar of overpressure).
    pub gain_mol_s_bar: f64,
}

impl PressureController for ProportionalCorrection {
    fn outflow(
        &self,
        desired_bar: f64,
        current_bar: f64,
        production_mol_s: f64,
        _previous_outflow_mol_s: f64,
    ) -> f64 {
        (production_mol_s + self.gain_mol_s_bar * (current_bar - desired_bar)).max(0.0)
    }
}

/// Alkaline pressure model over both electrode gas separators.
///
/// Pressures are gauge (bar). The alkaline design shares one electrolyte
/// loop, so both desired pressures must be configured equal; this is a
/// construction-time invariant. Review note: measured per-electrode
/// pressures still diverge from the configured target during operation, the
/// invariant constrains setpoints only.
#[derive(Debug, Clone)]
pub struct PressureModel {
    desired_anode_bar: f64,
    desired_cathode_bar: f64,
    gas_volume_m3: f64,
    pressure_anode_el: f64,
    pressure_cathode_el: f64,
    hydrogen_outflow: f64,
    oxygen_outflow: f64,
}

impl PressureModel {
    /// Creates the model with both separators at their desired pressure.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the desired pressures differ, are negative,
    /// or the separator volume is not positive.
    pub fn new(
        desired_anode_bar: f64,
        desired_cathode_bar: f64,
        gas_volume_m3: f64,
    ) -> Result<Self, ConfigError> {
        if desired_anode_bar != desired_cathode_bar {
            return Err(ConfigError::new(
                "pressure.desired_anode_bar",
                "must equal pressure.desired_cathode_bar for the alkaline stack",
            ));
        }
        if desired_anode_bar < 0.0 {
            return Err(ConfigError::new("pressure.desired_anode_bar", "must be >= 0"));
        }
        if gas_volume_m3 <= 0.0 {
            return Err(ConfigError::new("pressure.separator_volume_m3", "must be > 0"));
        }
        Ok(Self {
            desired_anode_bar,
            desired_cathode_bar,
            gas_volume_m3,
            pressure_anode_el: desired_anode_bar,
            pressure_cathode_el: desired_cathode_bar,
            hydrogen_outflow: 0.0,
            oxygen_outflow: 0.0,
        })
    }

    /// Recomputes pressures and outflows for one timestep.
    ///
    /// Hydrogen collects on the cathode side, oxygen on the anode side.
    /// All outputs are fully derived from the arguments; calling twice with
    /// identical inputs yields identical outputs.
    pub fn calculate(
        &mut self,
        controller: &dyn PressureController,
        pressure_anode_bar: f64,
        pressure_cathode_bar: f64,
        hydrogen_production_mol_s: f64,
        oxygen_production_mol_s: f64,
        temperature_k: f64,
        timestep_s: f64,
    ) {
        self.hydrogen_outflow = controller.outflow(
            self.desired_cathode_bar,
            pressure_cathode_bar,
            hydrogen_production_mol_s,
            self.hydrogen_outflow,
        );
        self.oxygen_outflow = controller.outflow(
            self.desired_anode_bar,
            pressure_anode_bar,
            oxygen_production_mol_s,
            self.oxygen_outflow,
        );

        let bar_per_mol = IDEAL_GAS * temperature_k / self.gas_volume_m3 / BAR_TO_PASCAL;
        let dp_cathode =
            (hydrogen_production_mol_s - self.hydrogen_outflow) * bar_per_mol * timestep_s;
        let dp_anode = (oxygen_production_mol_s - self.oxygen_outflow) * bar_per_mol * timestep_s;

        // Gauge pressure cannot drop below full vacuum.
        self.pressure_cathode_el = (pressure_cathode_bar + dp_cathode).max(-1.0);
        self.pressure_anode_el = (pressure_anode_bar + dp_anode).max(-1.0);
    }

    /// Anode-side pressure after the last `calculate` call (bar gauge).
    pub fn pressure_anode(&self) -> f64 {
        self.pressure_anode_el
    }

    /// Cathode-side pressure after the last `calculate` call (bar gauge).
    pub fn pressure_cathode(&self) -> f64 {
        self.pressure_cathode_el
    }

    /// Hydrogen outflow toward the storage (mol/s).
    pub fn h2_outflow(&self) -> f64 {
        self.hydrogen_outflow
    }

    /// Oxygen outflow toward the oxygen offtake (mol/s).
    pub fn o2_outflow(&self) -> f64 {
        self.oxygen_outflow
    }

    /// Liquid water leaving with the anode gas stream (mol/s).
    ///
    /// Zero for this design: no liquid water crossover on either side.
    pub fn water_outflow_anode(&self) -> f64 {
        0.0
    }

    /// Liquid water leaving with the cathode gas stream (mol/s).
    pub fn water_outflow_cathode(&self) -> f64 {
        0.0
    }
}
