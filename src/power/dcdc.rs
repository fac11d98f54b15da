//! DC/DC converter between the intermediate circuit and the stack.

use crate::config::ConfigError;
use crate::power::PowerError;

/// Fixed-efficiency DC/DC converter. Stateless per call; same charge-positive
/// sign convention as [`crate::power::AcDcConverter`].
#[derive(Debug, Clone)]
pub struct DcDcConverter {
    efficiency: f64,
}

impl DcDcConverter {
    /// Creates a converter with the given fixed efficiency.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `efficiency` is outside (0, 1].
    pub fn new(efficiency: f64) -> Result<Self, ConfigError> {
        if !(efficiency > 0.0 && efficiency <= 1.0) {
            return Err(ConfigError::new(
                "power_electronics.dcdc_efficiency",
                "must be in (0, 1]",
            ));
        }
        Ok(Self { efficiency })
    }

    /// Converts charging power toward the stack; 0.0 for non-positive input.
    pub fn to_dc(&self, power_w: f64) -> f64 {
        if power_w <= 0.0 {
            return 0.0;
        }
        power_w * self.efficiency
    }

    /// Converts discharging power (negative) away from the stack; 0.0 for
    /// non-negative input.
    pub fn to_ac(&self, power_w: f64) -> f64 {
        if power_w >= 0.0 {
            return 0.0;
        }
        power_w * self.efficiency
    }

    /// Inverts [`Self::to_dc`].
    ///
    /// # Errors
    ///
    /// Returns [`PowerError::WrongSignReverse`] for negative input.
    pub fn to_dc_reverse(&self, power_w: f64) -> Result<f64, PowerError> {
        if power_w < 0.0 {
            return Err(PowerError::WrongSignReverse {
                converter: "DcDcConverter",
                accessor: "to_dc_reverse",
                expected: "positive",
                power_w,
            });
        }
        Ok(power_w / self.efficiency)
    }

    /// Inverts [`Self::to_ac`].
    ///
    /// # Errors
    ///
    /// Returns [`PowerError::WrongSignReverse`] for positive input.
    pub fn to_ac_reverse(&self, power_w: f64) -> Result<f64, PowerError> {
        if power_w > 0.0 {
            return Err(PowerError::WrongSignReverse {
                converter: "DcDcConverter",
                accessor: "to_ac_reverse",
                expected: "negative",
                power_w,
            });
        }
        Ok(power_w / self.efficiency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transforms_apply_efficiency() {
        let c = DcDcConverter::new(0.98).unwrap();
        assert!((c.to_dc(100.0) - 98.0).abs() < 1e-9);
        assert!((c.to_ac(-100.0) - (-98.0)).abs() < 1e-9);
    }

    #[test]
    fn wrong_direction_maps_to_zero() {
        let c = DcDcConverter::new(0.98).unwrap();
        assert_eq!(c.to_dc(-5.0), 0.0);
        assert_eq!(c.to_ac(5.0), 0.0);
    }

    #[test]
    fn reverse_rejects_wrong_sign() {
        let c = DcDcConverter::new(0.98).unwrap();
        assert!(c.to_dc_reverse(-1.0).is_err());
        assert!(c.to_ac_reverse(1.0).is_err());
        assert!(c.to_dc_reverse(1.0).is_ok());
        assert!(c.to_ac_reverse(-1.0).is_ok());
    }

    #[test]
    fn rejects_invalid_efficiency() {
        assert!(DcDcConverter::new(0.0).is_err());
        assert!(DcDcConverter::new(1.5).is_err());
    }
}
