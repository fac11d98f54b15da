//! Alkaline electrolyzer stack: polarization curve and operating point.
//!
//! Cell voltage follows the usual decomposition into reversible voltage,
//! activation overvoltage (asinh form of the Butler-Volmer kinetics), and a
//! lumped ohmic contribution from electrolyte, electrodes, and separator.

use crate::config::ConfigError;
use crate::hydrogen::{FARADAY, IDEAL_GAS};

/// Thermoneutral cell voltage of water electrolysis (V).
const THERMONEUTRAL_VOLTAGE: f64 = 1.481;

/// Lumped area-specific ohmic resistance of one cell (Ohm m^2).
const AREA_RESISTANCE_OHM_M2: f64 = 5.0e-5;

/// Limiting current density of the cell (A/m^2); upper bound for the
/// operating-point search.
const LIMITING_CURRENT_DENSITY_A_M2: f64 = 3.0e4;

/// Floor for the temperature-dependent exchange current densities (A/m^2).
const MIN_EXCHANGE_CURRENT_DENSITY_A_M2: f64 = 0.1;

/// DC operating point of the stack for one timestep.
#[derive(Debug, Clone, Copy)]
pub struct OperatingPoint {
    /// Stack current (A).
    pub current_a: f64,
    /// Stack terminal voltage (V), cells in series.
    pub voltage_v: f64,
    /// Cell current density (A/m^2).
    pub current_density_a_m2: f64,
}

/// Alkaline electrolyzer stack of series-connected cells.
#[derive(Debug, Clone)]
pub struct ElectrolyzerStack {
    cells: usize,
    cell_area_m2: f64,
}

impl ElectrolyzerStack {
    /// Creates a stack from its geometry.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a zero cell count or non-positive area.
    pub fn new(cells: usize, cell_area_m2: f64) -> Result<Self, ConfigError> {
        if cells == 0 {
            return Err(ConfigError::new("electrolyzer.cells", "must be > 0"));
        }
        if cell_area_m2 <= 0.0 {
            return Err(ConfigError::new("electrolyzer.cell_area_m2", "must be > 0"));
        }
        Ok(Self { cells, cell_area_m2 })
    }

    /// Number of series-connected cells.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Geometric area of one cell (m^2).
    pub fn cell_area_m2(&self) -> f64 {
        self.cell_area_m2
    }

    /// Reversible cell voltage at `temperature_k` (V).
    ///
    /// Quadratic fit of the thermodynamic reversible voltage at standard
    /// pressure; pressure corrections are negligible against the activation
    /// and ohmic terms at the operating window modeled here.
    pub fn reversible_voltage(&self, temperature_k: f64) -> f64 {
        1.50342 - 9.956e-4 * temperature_k + 2.5e-7 * temperature_k * temperature_k
    }

    /// Single-cell voltage at `current_a` and `temperature_k` (V).
    ///
    /// Strictly increasing in current, which the operating-point bisection
    /// relies on.
    pub fn cell_voltage(&self, current_a: f64, temperature_k: f64) -> f64 {
        let mut voltage = self.reversible_voltage(temperature_k);
        if current_a <= 0.0 {
            return voltage;
        }

        let j = current_a / self.cell_area_m2;

        // Charge-transfer coefficients and exchange current densities for
        // nickel electrodes, linear/quadratic fits over temperature.
        let alpha_anode = 0.0675 + 9.5e-4 * temperature_k;
        let alpha_cathode = 0.1175 + 9.5e-4 * temperature_k;
        let j0_anode = ((30.4 - 0.206 * temperature_k + 3.5e-4 * temperature_k * temperature_k)
            * 10.0)
            .max(MIN_EXCHANGE_CURRENT_DENSITY_A_M2);
        let j0_cathode = ((13.72491 - 0.09055 * temperature_k
            + 1.9e-4 * temperature_k * temperature_k)
            * 10.0)
            .max(MIN_EXCHANGE_CURRENT_DENSITY_A_M2);

        let tafel_anode = IDEAL_GAS * temperature_k / (2.0 * FARADAY * alpha_anode);
        let tafel_cathode = IDEAL_GAS * temperature_k / (2.0 * FARADAY * alpha_cathode);
        voltage += tafel_anode * (j / (2.0 * j0_anode)).asinh();
        voltage += tafel_cathode * (j / (2.0 * j0_cathode)).asinh();

        voltage += AREA_RESISTANCE_OHM_M2 * j;
        voltage
    }

    /// Stack terminal voltage (V).
    pub fn stack_voltage(&self, current_a: f64, temperature_k: f64) -> f64 {
        self.cells as f64 * self.cell_voltage(current_a, temperature_k)
    }

    /// Maximum stack current from the limiting current density (A).
    pub fn limiting_current(&self) -> f64 {
        LIMITING_CURRENT_DENSITY_A_M2 * self.cell_area_m2
    }

    /// Solves the DC operating point for a given stack power (W).
    ///
    /// Deterministic bisection on `power = cells * u_cell(i) * i`, which is
    /// strictly increasing in current. Non-positive power resolves to the
    /// open-circuit point.
    pub fn operating_point(&self, dc_power_w: f64, temperature_k: f64) -> OperatingPoint {
        if dc_power_w <= 0.0 {
            return OperatingPoint {
                current_a: 0.0,
                voltage_v: self.stack_voltage(0.0, temperature_k),
                current_density_a_m2: 0.0,
            };
        }

        let mut low = 0.0_f64;
        let mut high = self.limiting_current();
        for _ in 0..200 {
            let mid = 0.5 * (low + high);
            let power = self.stack_voltage(mid, temperature_k) * mid;
            if power < dc_power_w {
                low = mid;
            } else {
                high = mid;
            }
            if (high - low) < 1e-12 * self.limiting_current() {
                break;
            }
        }
        let current = 0.5 * (low + high);

        OperatingPoint {
            current_a: current,
            voltage_v: self.stack_voltage(current, temperature_k),
            current_density_a_m2: current / self.cell_area_m2,
        }
    }

    /// Heat generated by the stack (W): the excess of the cell voltage over
    /// the thermoneutral voltage, summed over all cells. Negative below the
    /// thermoneutral point (endothermic operation).
    pub fn heat_generation_w(&self, current_a: f64, cell_voltage_v: f64) -> f64 {
        (cell_voltage_v - THERMONEUTRAL_VOLTAGE) * current_a * self.cells as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> ElectrolyzerStack {
        ElectrolyzerStack::new(100, 0.03).unwrap()
    }

    #[test]
    fn rejects_degenerate_geometry() {
        assert!(ElectrolyzerStack::new(0, 0.03).is_err());
        assert!(ElectrolyzerStack::new(10, 0.0).is_err());
    }

    #[test]
    fn open_circuit_voltage_is_reversible_voltage() {
        let s = stack();
        let t = 353.15;
        assert_eq!(s.cell_voltage(0.0, t), s.reversible_voltage(t));
    }

    #[test]
    fn cell_voltage_is_monotonic_in_current() {
        let s = stack();
        let t = 353.15;
        let mut previous = s.cell_voltage(0.0, t);
        for i in 1..=60 {
            let v = s.cell_voltage(i as f64 * 10.0, t);
            assert!(v > previous, "voltage must rise with current");
            previous = v;
        }
    }

    #[test]
    fn cell_voltage_in_plausible_alkaline_range() {
        let s = stack();
        let v = s.cell_voltage(250.0, 353.15);
        assert!((1.6..=2.4).contains(&v), "cell voltage {v} V out of range");
    }

    #[test]
    fn warmer_stack_runs_at_lower_voltage() {
        let s = stack();
        assert!(s.cell_voltage(250.0, 353.15) < s.cell_voltage(250.0, 313.15));
    }

    #[test]
    fn operating_point_solves_the_requested_power() {
        let s = stack();
        let power = 30_000.0;
        let op = s.operating_point(power, 353.15);
        let realized = op.voltage_v * op.current_a;
        assert!(
            (realized - power).abs() / power < 1e-6,
            "realized {realized} W vs requested {power} W"
        );
        assert!((op.current_density_a_m2 - op.current_a / 0.03).abs() < 1e-9);
    }

    #[test]
    fn zero_power_resolves_to_open_circuit() {
        let s = stack();
        let op = s.operating_point(0.0, 353.15);
        assert_eq!(op.current_a, 0.0);
        assert_eq!(op.current_density_a_m2, 0.0);
        assert!(op.voltage_v > 0.0);
    }

    #[test]
    fn operating_point_is_deterministic() {
        let s = stack();
        let a = s.operating_point(12_345.0, 340.0);
        let b = s.operating_point(12_345.0, 340.0);
        assert_eq!(a.current_a, b.current_a);
        assert_eq!(a.voltage_v, b.voltage_v);
    }

    #[test]
    fn heat_is_zero_at_zero_current() {
        let s = stack();
        assert_eq!(s.heat_generation_w(0.0, 1.2), 0.0);
    }

    #[test]
    fn heat_is_positive_above_thermoneutral() {
        let s = stack();
        let op = s.operating_point(40_000.0, 353.15);
        let heat = s.heat_generation_w(op.current_a, op.voltage_v / 100.0);
        assert!(heat > 0.0);
        // All electrical power beyond the thermoneutral demand becomes heat.
        assert!(heat < 40_000.0);
    }
}
