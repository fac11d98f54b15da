//! Fuel cell model for the discharge path.

use crate::config::ConfigError;
use crate::hydrogen::FARADAY;

/// Operating point of the fuel cell for one timestep.
#[derive(Debug, Clone, Copy)]
pub struct FuelCellOutput {
    /// Stack current (A).
    pub current_a: f64,
    /// Stack terminal voltage (V).
    pub voltage_v: f64,
    /// Hydrogen consumed (mol/s).
    pub hydrogen_use_mol_s: f64,
    /// DC power actually produced (W, negative in the charge-positive
    /// convention).
    pub power_dc_w: f64,
}

impl FuelCellOutput {
    fn idle(voltage_v: f64) -> Self {
        Self {
            current_a: 0.0,
            voltage_v,
            hydrogen_use_mol_s: 0.0,
            power_dc_w: 0.0,
        }
    }
}

/// Fixed-operating-voltage fuel cell stack.
///
/// Converts a DC discharge request into stack current and hydrogen draw via
/// Faraday's law, bounded by the hydrogen the storage can supply.
#[derive(Debug, Clone)]
pub struct FuelCell {
    cells: usize,
    cell_voltage_v: f64,
}

impl FuelCell {
    /// Creates the fuel cell stack.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a zero cell count or non-positive cell
    /// voltage.
    pub fn new(cells: usize, cell_voltage_v: f64) -> Result<Self, ConfigError> {
        if cells == 0 {
            return Err(ConfigError::new("fuel_cell.cells", "must be > 0"));
        }
        if cell_voltage_v <= 0.0 {
            return Err(ConfigError::new("fuel_cell.cell_voltage_v", "must be > 0"));
        }
        Ok(Self {
            cells,
            cell_voltage_v,
        })
    }

    /// Stack terminal voltage (V).
    pub fn stack_voltage(&self) -> f64 {
        self.cells as f64 * self.cell_voltage_v
    }

    /// Resolves the discharge operating point.
    ///
    /// `dc_power_w` is the requested discharge power (non-positive);
    /// `available_mol_s` bounds the hydrogen draw. A non-negative request
    /// resolves to the idle point.
    pub fn calculate(&self, dc_power_w: f64, available_mol_s: f64) -> FuelCellOutput {
        let stack_voltage = self.stack_voltage();
        if dc_power_w >= 0.0 {
            return FuelCellOutput::idle(stack_voltage);
        }

        let mut current = -dc_power_w / stack_voltage;
        let mut hydrogen_use = self.cells as f64 * current / (2.0 * FARADAY);

        if hydrogen_use > available_mol_s {
            // Hydrogen-starved: the stack delivers what the storage can feed.
            let scale = if hydrogen_use > 0.0 {
                (available_mol_s / hydrogen_use).max(0.0)
            } else {
                0.0
            };
            current *= scale;
            hydrogen_use = available_mol_s.max(0.0);
        }

        FuelCellOutput {
            current_a: current,
            voltage_v: stack_voltage,
            hydrogen_use_mol_s: hydrogen_use,
            power_dc_w: -(current * stack_voltage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> FuelCell {
        FuelCell::new(80, 0.7).unwrap()
    }

    #[test]
    fn idle_for_non_negative_request() {
        let fc = cell();
        let out = fc.calculate(0.0, 1.0);
        assert_eq!(out.current_a, 0.0);
        assert_eq!(out.power_dc_w, 0.0);
        let out = fc.calculate(500.0, 1.0);
        assert_eq!(out.hydrogen_use_mol_s, 0.0);
    }

    #[test]
    fn discharge_follows_faraday() {
        let fc = cell();
        let out = fc.calculate(-5600.0, 1.0);
        // 5600 W over 80 cells at 0.7 V is 100 A.
        assert!((out.current_a - 100.0).abs() < 1e-9);
        let expected_use = 80.0 * 100.0 / (2.0 * FARADAY);
        assert!((out.hydrogen_use_mol_s - expected_use).abs() / expected_use < 1e-9);
        assert!((out.power_dc_w - (-5600.0)).abs() < 1e-9);
    }

    #[test]
    fn starved_stack_scales_down_to_available_hydrogen() {
        let fc = cell();
        let unconstrained = fc.calculate(-5600.0, f64::INFINITY);
        let available = unconstrained.hydrogen_use_mol_s / 2.0;
        let out = fc.calculate(-5600.0, available);
        assert!((out.hydrogen_use_mol_s - available).abs() < 1e-12);
        assert!((out.power_dc_w - (-2800.0)).abs() < 1e-6);
    }

    #[test]
    fn empty_storage_means_no_discharge() {
        let fc = cell();
        let out = fc.calculate(-5600.0, 0.0);
        assert_eq!(out.power_dc_w, 0.0);
        assert_eq!(out.hydrogen_use_mol_s, 0.0);
    }

    #[test]
    fn rejects_degenerate_stack() {
        assert!(FuelCell::new(0, 0.7).is_err());
        assert!(FuelCell::new(80, 0.0).is_err());
    }
}
