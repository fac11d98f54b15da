//! Post-hoc aggregate report over a completed simulation run.

use std::fmt;

use crate::hydrogen::MOLAR_MASS_H2;
use crate::sim::types::StepResult;

/// Aggregates derived from a complete run.
///
/// Computed post-hoc from the step record vector so the report is always
/// consistent with the exported per-step data.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Number of simulated timesteps.
    pub steps: usize,
    /// Mean fulfillment ratio over the run.
    pub mean_fulfillment: f64,
    /// AC energy consumed while charging (kWh).
    pub energy_consumed_kwh: f64,
    /// AC energy delivered while discharging (kWh).
    pub energy_delivered_kwh: f64,
    /// Hydrogen produced, integrated net production (kg).
    pub hydrogen_produced_kg: f64,
    /// Hydrogen consumed by the fuel cell (kg).
    pub hydrogen_consumed_kg: f64,
    /// Total dissipated energy: stack heat plus conversion losses (kWh).
    pub losses_kwh: f64,
    /// Highest stack temperature seen (K).
    pub peak_temperature_k: f64,
    /// Highest cathode pressure seen (bar gauge).
    pub peak_pressure_bar: f64,
    /// Storage state of charge after the last step.
    pub final_soc: f64,
}

impl RunReport {
    /// Computes the report from the complete step record vector.
    pub fn from_results(results: &[StepResult], timestep_s: f64) -> Self {
        if results.is_empty() {
            return Self {
                steps: 0,
                mean_fulfillment: 0.0,
                energy_consumed_kwh: 0.0,
                energy_delivered_kwh: 0.0,
                hydrogen_produced_kg: 0.0,
                hydrogen_consumed_kg: 0.0,
                losses_kwh: 0.0,
                peak_temperature_k: 0.0,
                peak_pressure_bar: 0.0,
                final_soc: 0.0,
            };
        }

        let to_kwh = timestep_s / 3.6e6;
        let mut fulfillment_sum = 0.0;
        let mut consumed = 0.0;
        let mut delivered = 0.0;
        let mut produced_mol = 0.0;
        let mut consumed_mol = 0.0;
        let mut losses = 0.0;
        let mut peak_temperature = f64::MIN;
        let mut peak_pressure = f64::MIN;

        for r in results {
            fulfillment_sum += r.fulfillment;
            consumed += r.power_ac_w.max(0.0) * to_kwh;
            delivered += (-r.power_ac_w).max(0.0) * to_kwh;
            produced_mol += r.hydrogen_production_mol_s * timestep_s;
            consumed_mol += r.hydrogen_use_mol_s * timestep_s;
            losses += r.power_loss_w * to_kwh;
            peak_temperature = peak_temperature.max(r.temperature_k);
            peak_pressure = peak_pressure.max(r.pressure_cathode_bar);
        }

        Self {
            steps: results.len(),
            mean_fulfillment: fulfillment_sum / results.len() as f64,
            energy_consumed_kwh: consumed,
            energy_delivered_kwh: delivered,
            hydrogen_produced_kg: produced_mol * MOLAR_MASS_H2,
            hydrogen_consumed_kg: consumed_mol * MOLAR_MASS_H2,
            losses_kwh: losses,
            peak_temperature_k: peak_temperature,
            peak_pressure_bar: peak_pressure,
            final_soc: results.last().map_or(0.0, |r| r.soc),
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run report ({} steps)", self.steps)?;
        writeln!(f, "  mean fulfillment     {:>10.3}", self.mean_fulfillment)?;
        writeln!(f, "  energy consumed      {:>10.2} kWh", self.energy_consumed_kwh)?;
        writeln!(f, "  energy delivered     {:>10.2} kWh", self.energy_delivered_kwh)?;
        writeln!(f, "  hydrogen produced    {:>10.4} kg", self.hydrogen_produced_kg)?;
        writeln!(f, "  hydrogen consumed    {:>10.4} kg", self.hydrogen_consumed_kg)?;
        writeln!(f, "  losses               {:>10.2} kWh", self.losses_kwh)?;
        writeln!(f, "  peak temperature     {:>10.2} K", self.peak_temperature_k)?;
        writeln!(f, "  peak pressure        {:>10.2} bar", self.peak_pressure_bar)?;
        write!(f, "  final SoC            {:>10.3}", self.final_soc)
    }
}
