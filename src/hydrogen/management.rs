//! Power-window management between electrolyzer and fuel cell.

use crate::config::ConfigError;

/// Routes a DC power request into the feasible window of the hydrogen
/// subsystem.
///
/// Charging requests below the electrolyzer minimum put the stack into
/// standby instead of operating it outside its stable band; requests beyond
/// the maxima are clipped.
#[derive(Debug, Clone)]
pub struct HydrogenManagementSystem {
    min_electrolyzer_power_w: f64,
    max_electrolyzer_power_w: f64,
    max_fuel_cell_power_w: f64,
}

impl HydrogenManagementSystem {
    /// Creates the management system from the electrolyzer power window and
    /// the fuel-cell power bound.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a negative minimum, a maximum not above
    /// the minimum, or a negative fuel-cell bound.
    pub fn new(
        min_electrolyzer_power_w: f64,
        max_electrolyzer_power_w: f64,
        max_fuel_cell_power_w: f64,
    ) -> Result<Self, ConfigError> {
        if min_electrolyzer_power_w < 0.0 {
            return Err(ConfigError::new("electrolyzer.min_power_w", "must be >= 0"));
        }
        if max_electrolyzer_power_w <= min_electrolyzer_power_w {
            return Err(ConfigError::new(
                "electrolyzer.max_power_w",
                "must be > electrolyzer.min_power_w",
            ));
        }
        if max_fuel_cell_power_w < 0.0 {
            return Err(ConfigError::new("fuel_cell.max_power_w", "must be >= 0"));
        }
        Ok(Self {
            min_electrolyzer_power_w,
            max_electrolyzer_power_w,
            max_fuel_cell_power_w,
        })
    }

    /// Minimum stable electrolyzer power (W).
    pub fn min_electrolyzer_power_w(&self) -> f64 {
        self.min_electrolyzer_power_w
    }

    /// Maximum electrolyzer power (W).
    pub fn max_electrolyzer_power_w(&self) -> f64 {
        self.max_electrolyzer_power_w
    }

    /// Maximum fuel-cell power (W).
    pub fn max_fuel_cell_power_w(&self) -> f64 {
        self.max_fuel_cell_power_w
    }

    /// Clamps a DC power request into the feasible window.
    ///
    /// Positive requests go to the electrolyzer, negative requests to the
    /// fuel cell, zero stays zero.
    pub fn clamp_power(&self, requested_dc_w: f64) -> f64 {
        if requested_dc_w > 0.0 {
            if requested_dc_w < self.min_electrolyzer_power_w {
                0.0
            } else {
                requested_dc_w.min(self.max_electrolyzer_power_w)
            }
        } else if requested_dc_w < 0.0 {
            requested_dc_w.max(-self.max_fuel_cell_power_w)
        } else {
            0.0
        }
    }
}
