//! Operation strategies: pluggable policies turning exogenous signals into
//! power setpoints.

use crate::config::{ConfigError, ScenarioConfig};
use crate::ems::state::{EnergyManagementState, SystemState};
use crate::profile::{Profile, SyntheticFrequencyProfile, SyntheticLoadProfile};

/// Decision policy of the energy management.
///
/// `next` may read the system state but never mutates it; `update` writes
/// the decision just made into the management state. The rest of the
/// pipeline does not inspect which policy is active.
pub trait OperationStrategy: std::fmt::Debug {
    /// Computes the power request for this timestep (W, charge-positive).
    ///
    /// `power_offset_w` is an additive contribution from a stacked secondary
    /// strategy, applied after the policy decision.
    fn next(&mut self, time_s: f64, system_state: &SystemState, power_offset_w: f64) -> f64;

    /// Writes the last computed request into the management state.
    fn update(&self, state: &mut EnergyManagementState);

    /// Human-readable policy name.
    fn name(&self) -> &'static str;
}

/// Follows a power profile verbatim.
#[derive(Debug)]
pub struct PowerFollower {
    profile: Box<dyn Profile>,
    last_power_w: f64,
}

impl PowerFollower {
    /// Creates a follower over the given power profile (W).
    pub fn new(profile: Box<dyn Profile>) -> Self {
        Self {
            profile,
            last_power_w: 0.0,
        }
    }
}

impl OperationStrategy for PowerFollower {
    fn next(&mut self, time_s: f64, _system_state: &SystemState, power_offset_w: f64) -> f64 {
        self.last_power_w = self.profile.next(time_s) + power_offset_w;
        self.last_power_w
    }

    fn update(&self, state: &mut EnergyManagementState) {
        state.power = self.last_power_w;
    }

    fn name(&self) -> &'static str {
        "PowerFollower"
    }
}

/// Frequency containment reserve: droop control on a grid-frequency profile.
///
/// No activation inside the dead band; linear rise to the rated power at the
/// full-activation deviation; saturation beyond it. Over-frequency charges
/// (consumes surplus energy), under-frequency discharges.
#[derive(Debug)]
pub struct FrequencyContainment {
    profile: Box<dyn Profile>,
    rated_power_w: f64,
    nominal_frequency_hz: f64,
    deadband_hz: f64,
    full_activation_hz: f64,
    last_power_w: f64,
}

impl FrequencyContainment {
    /// Creates the droop policy over a frequency profile (Hz).
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a non-positive rated power, a negative
    /// dead band, or a full-activation deviation not above the dead band.
    pub fn new(
        profile: Box<dyn Profile>,
        rated_power_w: f64,
        nominal_frequency_hz: f64,
        deadband_hz: f64,
        full_activation_hz: f64,
    ) -> Result<Self, ConfigError> {
        if rated_power_w <= 0.0 {
            return Err(ConfigError::new("strategy.rated_power_w", "must be > 0"));
        }
        if deadband_hz < 0.0 {
            return Err(ConfigError::new("strategy.deadband_hz", "must be >= 0"));
        }
        if full_activation_hz <= deadband_hz {
            return Err(ConfigError::new(
                "strategy.full_activation_hz",
                "must be > strategy.deadband_hz",
            ));
        }
        Ok(Self {
            profile,
            rated_power_w,
            nominal_frequency_hz,
            deadband_hz,
            full_activation_hz,
            last_power_w: 0.0,
        })
    }
}

impl OperationStrategy for FrequencyContainment {
    fn next(&mut self, time_s: f64, _system_state: &SystemState, power_offset_w: f64) -> f64 {
        let deviation = self.profile.next(time_s) - self.nominal_frequency_hz;
        let droop = if deviation.abs() <= self.deadband_hz {
            0.0
        } else {
            self.rated_power_w * (deviation / self.full_activation_hz).clamp(-1.0, 1.0)
        };
        self.last_power_w = droop + power_offset_w;
        self.last_power_w
    }

    fn update(&self, state: &mut EnergyManagementState) {
        state.power = self.last_power_w;
    }

    fn name(&self) -> &'static str {
        "FrequencyContainment"
    }
}

/// Peak shaving against a load profile: discharges above the threshold,
/// recharges below it.
#[derive(Debug)]
pub struct PeakShaving {
    profile: Box<dyn Profile>,
    threshold_w: f64,
    last_power_w: f64,
}

impl PeakShaving {
    /// Creates the policy over a load profile (W) and a shaving threshold.
    pub fn new(profile: Box<dyn Profile>, threshold_w: f64) -> Self {
        Self {
            profile,
            threshold_w,
            last_power_w: 0.0,
        }
    }
}

impl OperationStrategy for PeakShaving {
    fn next(&mut self, time_s: f64, _system_state: &SystemState, power_offset_w: f64) -> f64 {
        let load_w = self.profile.next(time_s);
        // Above the threshold the difference is negative: discharge to shave
        // the peak. Below it the surplus headroom recharges the storage.
        self.last_power_w = (self.threshold_w - load_w) + power_offset_w;
        self.last_power_w
    }

    fn update(&self, state: &mut EnergyManagementState) {
        state.power = self.last_power_w;
    }

    fn name(&self) -> &'static str {
        "PeakShaving"
    }
}

/// Builds the configured strategy together with its profile collaborator.
///
/// # Errors
///
/// Returns a `ConfigError` for an unknown strategy kind or infeasible
/// strategy parameters; the error enumerates the valid kinds.
pub fn build_strategy(config: &ScenarioConfig) -> Result<Box<dyn OperationStrategy>, ConfigError> {
    let p = &config.profile;
    let seed = config.simulation.seed;
    match config.strategy.kind.as_str() {
        "power-follower" => {
            let profile = SyntheticLoadProfile::new(
                p.mean_w,
                p.amplitude_w,
                p.phase_rad,
                p.noise_std_w,
                p.period_s,
                seed,
            );
            Ok(Box::new(PowerFollower::new(Box::new(profile))))
        }
        "frequency-containment" => {
            let profile = SyntheticFrequencyProfile::new(
                config.strategy.nominal_frequency_hz,
                p.frequency_noise_std_hz,
                seed,
            );
            Ok(Box::new(FrequencyContainment::new(
                Box::new(profile),
                config.strategy.rated_power_w,
                config.strategy.nominal_frequency_hz,
                config.strategy.deadband_hz,
                config.strategy.full_activation_hz,
            )?))
        }
        "peak-shaving" => {
            let profile = SyntheticLoadProfile::new(
                p.mean_w,
                p.amplitude_w,
                p.phase_rad,
                p.noise_std_w,
                p.period_s,
                seed,
            );
            Ok(Box::new(PeakShaving::new(
                Box::new(profile),
                config.strategy.peak_threshold_w,
            )))
        }
        other => Err(ConfigError::new(
            "strategy.kind",
            format!(
                "unknown strategy \"{other}\", available: {}",
                ScenarioConfig::STRATEGY_KINDS.join(", ")
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SequenceProfile;

    fn idle_state() -> SystemState {
        SystemState::initial(0.0)
    }

    #[test]
    fn power_follower_tracks_the_profile() {
        let profile = SequenceProfile::new(vec![1000.0, -2000.0, 0.0], 1.0);
        let mut s = PowerFollower::new(Box::new(profile));
        assert_eq!(s.next(0.0, &idle_state(), 0.0), 1000.0);
        assert_eq!(s.next(1.0, &idle_state(), 0.0), -2000.0);
        assert_eq!(s.next(2.0, &idle_state(), 0.0), 0.0);
    }

    #[test]
    fn power_offset_is_additive() {
        let profile = SequenceProfile::constant(1000.0);
        let mut s = PowerFollower::new(Box::new(profile));
        assert_eq!(s.next(0.0, &idle_state(), 500.0), 1500.0);
        assert_eq!(s.next(1.0, &idle_state(), -1500.0), -500.0);
    }

    #[test]
    fn update_writes_the_last_decision() {
        let profile = SequenceProfile::constant(1234.0);
        let mut s = PowerFollower::new(Box::new(profile));
        s.next(0.0, &idle_state(), 0.0);
        let mut state = EnergyManagementState::new(0.0);
        s.update(&mut state);
        assert_eq!(state.power, 1234.0);
    }

    fn fcr(values: Vec<f64>) -> FrequencyContainment {
        FrequencyContainment::new(
            Box::new(SequenceProfile::new(values, 1.0)),
            40_000.0,
            50.0,
            0.01,
            0.2,
        )
        .unwrap()
    }

    #[test]
    fn fcr_is_idle_inside_the_dead_band() {
        let mut s = fcr(vec![50.0, 50.005, 49.995]);
        assert_eq!(s.next(0.0, &idle_state(), 0.0), 0.0);
        assert_eq!(s.next(1.0, &idle_state(), 0.0), 0.0);
        assert_eq!(s.next(2.0, &idle_state(), 0.0), 0.0);
    }

    #[test]
    fn fcr_over_frequency_charges_proportionally() {
        let mut s = fcr(vec![50.1]);
        let power = s.next(0.0, &idle_state(), 0.0);
        assert!((power - 20_000.0).abs() < 1e-9);
    }

    #[test]
    fn fcr_under_frequency_discharges() {
        let mut s = fcr(vec![49.9]);
        let power = s.next(0.0, &idle_state(), 0.0);
        assert!((power + 20_000.0).abs() < 1e-9);
    }

    #[test]
    fn fcr_saturates_at_rated_power() {
        let mut s = fcr(vec![51.0, 49.0]);
        assert_eq!(s.next(0.0, &idle_state(), 0.0), 40_000.0);
        assert_eq!(s.next(1.0, &idle_state(), 0.0), -40_000.0);
    }

    #[test]
    fn fcr_rejects_infeasible_parameters() {
        let profile = || Box::new(SequenceProfile::constant(50.0));
        assert!(FrequencyContainment::new(profile(), 0.0, 50.0, 0.01, 0.2).is_err());
        assert!(FrequencyContainment::new(profile(), 1.0, 50.0, 0.2, 0.1).is_err());
    }

    #[test]
    fn peak_shaving_discharges_above_threshold() {
        let profile = SequenceProfile::new(vec![35_000.0, 20_000.0], 1.0);
        let mut s = PeakShaving::new(Box::new(profile), 30_000.0);
        assert_eq!(s.next(0.0, &idle_state(), 0.0), -5_000.0);
        assert_eq!(s.next(1.0, &idle_state(), 0.0), 10_000.0);
    }

    #[test]
    fn build_strategy_resolves_all_kinds() {
        let mut config = crate::config::ScenarioConfig::baseline();
        for kind in crate::config::ScenarioConfig::STRATEGY_KINDS {
            config.strategy.kind = kind.to_string();
            let strategy = build_strategy(&config);
            assert!(strategy.is_ok(), "kind \"{kind}\" should build");
        }
    }

    #[test]
    fn build_strategy_rejects_unknown_kind() {
        let mut config = crate::config::ScenarioConfig::baseline();
        config.strategy.kind = "arbitrage".to_string();
        let err = build_strategy(&config);
        assert!(err.is_err());
        assert!(err.unwrap_err().message.contains("power-follower"));
    }
}
