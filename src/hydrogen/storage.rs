//! Hydrogen storage variants behind one interface.
//!
//! The stack-side pressure models use gauge pressure; storage uses absolute
//! pressure. Every crossing of that boundary goes through the conversion
//! pair below so the offset is applied exactly once.

use tracing::warn;

use crate::config::ConfigError;
use crate::hydrogen::{BAR_TO_PASCAL, H2_LHV_J_PER_MOL, IDEAL_GAS};

/// Ambient temperature assumed for stored gas (K).
const AMBIENT_TEMPERATURE_K: f64 = 293.15;

/// Converts gauge pressure to absolute pressure (bar): adds the 1 bar
/// atmospheric offset.
pub fn gauge_to_absolute_bar(gauge_bar: f64) -> f64 {
    gauge_bar + 1.0
}

/// Converts absolute pressure to gauge pressure (bar): subtracts the 1 bar
/// atmospheric offset.
pub fn absolute_to_gauge_bar(absolute_bar: f64) -> f64 {
    absolute_bar - 1.0
}

/// External hydrogen storage attached to the electrolyzer/fuel-cell system.
///
/// All pressures on this interface are absolute (bar).
pub trait HydrogenStorage: std::fmt::Debug {
    /// Adds (positive) or removes (negative) hydrogen for one timestep.
    fn charge(&mut self, flow_mol_s: f64, timestep_s: f64);

    /// Largest withdrawal rate the storage can sustain this timestep (mol/s).
    fn max_discharge_rate_mol_s(&self, timestep_s: f64) -> f64;

    /// Fill level in [0, 1].
    fn soc(&self) -> f64;

    /// Usable energy content between empty and full (Wh).
    fn capacity_wh(&self) -> f64;

    /// Current storage pressure (bar absolute).
    fn pressure_bar(&self) -> f64;

    /// Technology name as used by the factory registry.
    fn technology(&self) -> &'static str;
}

/// Fixed-volume pressure tank.
#[derive(Debug, Clone)]
pub struct PressureTank {
    volume_m3: f64,
    min_content_mol: f64,
    max_content_mol: f64,
    content_mol: f64,
}

impl PressureTank {
    /// Creates a tank from its volume and absolute pressure window.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a non-positive volume, an inverted
    /// pressure window, or an initial pressure outside the window.
    pub fn new(
        volume_m3: f64,
        min_pressure_bar: f64,
        max_pressure_bar: f64,
        initial_pressure_bar: f64,
    ) -> Result<Self, ConfigError> {
        if volume_m3 <= 0.0 {
            return Err(ConfigError::new("storage.tank_volume_m3", "must be > 0"));
        }
        if max_pressure_bar <= min_pressure_bar {
            return Err(ConfigError::new(
                "storage.max_pressure_bar",
                "must be > storage.min_pressure_bar",
            ));
        }
        if initial_pressure_bar < min_pressure_bar || initial_pressure_bar > max_pressure_bar {
            return Err(ConfigError::new(
                "storage.initial_pressure_bar",
                "must be within [min_pressure_bar, max_pressure_bar]",
            ));
        }

        let moles_at = |pressure_bar: f64| {
            pressure_bar * BAR_TO_PASCAL * volume_m3 / (IDEAL_GAS * AMBIENT_TEMPERATURE_K)
        };
        Ok(Self {
            volume_m3,
            min_content_mol: moles_at(min_pressure_bar),
            max_content_mol: moles_at(max_pressure_bar),
            content_mol: moles_at(initial_pressure_bar),
        })
    }

    /// Current hydrogen content (mol).
    pub fn content_mol(&self) -> f64 {
        self.content_mol
    }
}

impl HydrogenStorage for PressureTank {
    fn charge(&mut self, flow_mol_s: f64, timestep_s: f64) {
        let target = self.content_mol + flow_mol_s * timestep_s;
        if target > self.max_content_mol {
            warn!(
                excess_mol = target - self.max_content_mol,
                "pressure tank full, venting excess hydrogen"
            );
        } else if target < self.min_content_mol {
            warn!(
                deficit_mol = self.min_content_mol - target,
                "pressure tank at minimum pressure, withdrawal truncated"
            );
        }
        self.content_mol = target.clamp(self.min_content_mol, self.max_content_mol);
    }

    fn max_discharge_rate_mol_s(&self, timestep_s: f64) -> f64 {
        (self.content_mol - self.min_content_mol) / timestep_s
    }

    fn soc(&self) -> f64 {
        ((self.content_mol - self.min_content_mol)
            / (self.max_content_mol - self.min_content_mol))
            .clamp(0.0, 1.0)
    }

    fn capacity_wh(&self) -> f64 {
        (self.max_content_mol - self.min_content_mol) * H2_LHV_J_PER_MOL / 3600.0
    }

    fn pressure_bar(&self) -> f64 {
        self.content_mol * IDEAL_GAS * AMBIENT_TEMPERATURE_K / self.volume_m3 / BAR_TO_PASCAL
    }

    fn technology(&self) -> &'static str {
        "pressure-tank"
    }
}

/// Constant-pressure pipeline connection: an unbounded sink and source.
///
/// A pipeline is neither fillable nor drainable in any meaningful sense, so
/// its fill level is pinned to 0.5 to keep charge and discharge available.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pressure_bar: f64,
}

impl Pipeline {
    /// Creates a pipeline connection at the given absolute grid pressure.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a negative pressure.
    pub fn new(pressure_bar: f64) -> Result<Self, ConfigError> {
        if pressure_bar < 0.0 {
            return Err(ConfigError::new("storage.pipeline_pressure_bar", "must be >= 0"));
        }
        Ok(Self { pressure_bar })
    }
}

impl HydrogenStorage for Pipeline {
    fn charge(&mut self, _flow_mol_s: f64, _timestep_s: f64) {}

    fn max_discharge_rate_mol_s(&self, _timestep_s: f64) -> f64 {
        f64::INFINITY
    }

    fn soc(&self) -> f64 {
        0.5
    }

    fn capacity_wh(&self) -> f64 {
        f64::INFINITY
    }

    fn pressure_bar(&self) -> f64 {
        self.pressure_bar
    }

    fn technology(&self) -> &'static str {
        "pipeline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressure_conversions_are_inverse_and_offset_by_one() {
        assert_eq!(gauge_to_absolute_bar(30.0), 31.0);
        assert_eq!(absolute_to_gauge_bar(31.0), 30.0);
        assert_eq!(absolute_to_gauge_bar(gauge_to_absolute_bar(12.5)), 12.5);
    }

    #[test]
    fn tank_starts_at_initial_pressure() {
        let tank = PressureTank::new(5.0, 1.0, 45.0, 5.0).unwrap();
        assert!((tank.pressure_bar() - 5.0).abs() < 1e-9);
        let expected_soc = (5.0 - 1.0) / (45.0 - 1.0);
        assert!((tank.soc() - expected_soc).abs() < 1e-9);
    }

    #[test]
    fn charging_raises_pressure_and_soc() {
        let mut tank = PressureTank::new(5.0, 1.0, 45.0, 5.0).unwrap();
        let soc_before = tank.soc();
        tank.charge(0.1, 3600.0);
        assert!(tank.soc() > soc_before);
        assert!(tank.pressure_bar() > 5.0);
    }

    #[test]
    fn tank_clamps_at_full() {
        let mut tank = PressureTank::new(0.1, 1.0, 2.0, 1.9).unwrap();
        tank.charge(1.0, 1.0e6);
        assert_eq!(tank.soc(), 1.0);
        assert!((tank.pressure_bar() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn tank_clamps_at_empty() {
        let mut tank = PressureTank::new(0.1, 1.0, 2.0, 1.1).unwrap();
        tank.charge(-1.0, 1.0e6);
        assert_eq!(tank.soc(), 0.0);
        assert!((tank.pressure_bar() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn tank_discharge_rate_is_bounded_by_content() {
        let tank = PressureTank::new(5.0, 1.0, 45.0, 5.0).unwrap();
        let rate = tank.max_discharge_rate_mol_s(60.0);
        assert!(rate > 0.0);
        assert!(rate.is_finite());

        let empty = PressureTank::new(5.0, 1.0, 45.0, 1.0).unwrap();
        assert_eq!(empty.max_discharge_rate_mol_s(60.0), 0.0);
    }

    #[test]
    fn tank_capacity_follows_lower_heating_value() {
        let tank = PressureTank::new(5.0, 1.0, 45.0, 5.0).unwrap();
        let span_mol = 44.0 * BAR_TO_PASCAL * 5.0 / (IDEAL_GAS * AMBIENT_TEMPERATURE_K);
        let expected = span_mol * H2_LHV_J_PER_MOL / 3600.0;
        assert!((tank.capacity_wh() - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn tank_rejects_bad_window() {
        assert!(PressureTank::new(5.0, 45.0, 1.0, 5.0).is_err());
        assert!(PressureTank::new(5.0, 1.0, 45.0, 50.0).is_err());
        assert!(PressureTank::new(0.0, 1.0, 45.0, 5.0).is_err());
    }

    #[test]
    fn pipeline_is_inexhaustible_and_half_full() {
        let mut pipe = Pipeline::new(31.0).unwrap();
        assert_eq!(pipe.soc(), 0.5);
        pipe.charge(10.0, 3600.0);
        pipe.charge(-10.0, 3600.0);
        assert_eq!(pipe.soc(), 0.5);
        assert_eq!(pipe.pressure_bar(), 31.0);
        assert!(pipe.max_discharge_rate_mol_s(1.0).is_infinite());
    }
}
