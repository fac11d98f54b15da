//! AC/DC converter model with fixed or measured efficiency.

use crate::config::ConfigError;
use crate::power::PowerError;
use crate::power::efficiency::EfficiencyCurve;

/// Efficiency model backing a converter.
#[derive(Debug, Clone)]
enum EfficiencyModel {
    Fixed(f64),
    /// Curve over load fraction `|power| / rated_power`.
    Table(EfficiencyCurve),
}

/// AC/DC converter between the grid and the intermediate DC circuit.
///
/// Stateless per call. Sign convention on both ports is charge-positive:
/// `to_dc` handles the charging direction (AC power in, DC power out),
/// `to_ac` the discharging direction (negative DC power in, negative AC
/// power out). Each transform applies the conversion efficiency once.
#[derive(Debug, Clone)]
pub struct AcDcConverter {
    model: EfficiencyModel,
    rated_power_w: f64,
}

impl AcDcConverter {
    /// Creates a converter with a fixed efficiency.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `efficiency` is outside (0, 1] or
    /// `rated_power_w` is not positive.
    pub fn with_fixed_efficiency(efficiency: f64, rated_power_w: f64) -> Result<Self, ConfigError> {
        if !(efficiency > 0.0 && efficiency <= 1.0) {
            return Err(ConfigError::new(
                "power_electronics.acdc_efficiency",
                "must be in (0, 1]",
            ));
        }
        if rated_power_w <= 0.0 {
            return Err(ConfigError::new(
                "power_electronics.rated_power_w",
                "must be > 0",
            ));
        }
        Ok(Self {
            model: EfficiencyModel::Fixed(efficiency),
            rated_power_w,
        })
    }

    /// Creates a converter with a measured efficiency-vs-load-fraction table.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the table is invalid (see
    /// [`EfficiencyCurve::new`]) or `rated_power_w` is not positive.
    pub fn with_efficiency_table(
        points: &[[f64; 2]],
        rated_power_w: f64,
    ) -> Result<Self, ConfigError> {
        if rated_power_w <= 0.0 {
            return Err(ConfigError::new(
                "power_electronics.rated_power_w",
                "must be > 0",
            ));
        }
        Ok(Self {
            model: EfficiencyModel::Table(EfficiencyCurve::new(points)?),
            rated_power_w,
        })
    }

    fn efficiency_at(&self, power_w: f64) -> f64 {
        match &self.model {
            EfficiencyModel::Fixed(eta) => *eta,
            EfficiencyModel::Table(curve) => curve.at(power_w.abs() / self.rated_power_w),
        }
    }

    /// Converts AC charging power to DC power.
    ///
    /// Returns 0.0 for non-positive input (discharge direction on this port).
    pub fn to_dc(&self, power_w: f64) -> f64 {
        if power_w <= 0.0 {
            return 0.0;
        }
        power_w * self.efficiency_at(power_w)
    }

    /// Converts DC discharging power (negative) to AC power delivered.
    ///
    /// Returns 0.0 for non-negative input (charge direction on this port).
    pub fn to_ac(&self, power_w: f64) -> f64 {
        if power_w >= 0.0 {
            return 0.0;
        }
        power_w * self.efficiency_at(power_w)
    }

    /// Inverts [`Self::to_dc`]: AC power that must be drawn for a given DC
    /// charging power.
    ///
    /// # Errors
    ///
    /// Returns [`PowerError::WrongSignReverse`] for negative input; a DC
    /// discharge power on the charging accessor signals a caller bug.
    pub fn to_dc_reverse(&self, power_w: f64) -> Result<f64, PowerError> {
        if power_w < 0.0 {
            return Err(PowerError::WrongSignReverse {
                converter: "AcDcConverter",
                accessor: "to_dc_reverse",
                expected: "positive",
                power_w,
            });
        }
        Ok(power_w / self.efficiency_at(power_w))
    }

    /// Inverts [`Self::to_ac`]: DC power that must be produced for a given AC
    /// power delivered (negative).
    ///
    /// # Errors
    ///
    /// Returns [`PowerError::WrongSignReverse`] for positive input.
    pub fn to_ac_reverse(&self, power_w: f64) -> Result<f64, PowerError> {
        if power_w > 0.0 {
            return Err(PowerError::WrongSignReverse {
                converter: "AcDcConverter",
                accessor: "to_ac_reverse",
                expected: "negative",
                power_w,
            });
        }
        Ok(power_w / self.efficiency_at(power_w))
    }
}
