//! Exogenous signal collaborators supplying demand and grid frequency.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// A lazy, restartable sequence of exogenous values over simulated time.
///
/// The core never seeks backward on a profile within a run; `restart`
/// rewinds it to its initial state for a fresh run.
pub trait Profile: std::fmt::Debug {
    /// Returns the signal value at the given simulation time.
    ///
    /// Units depend on the concrete profile: W for power signals, Hz for
    /// grid-frequency signals.
    fn next(&mut self, time_s: f64) -> f64;

    /// Rewinds the profile to its initial state.
    fn restart(&mut self);
}

/// Generates Gaussian noise using the Box-Muller transform.
///
/// Returns a value drawn from a Gaussian distribution with mean 0 and the
/// given standard deviation, or 0.0 for non-positive standard deviations.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

/// Synthetic load profile: sinusoidal daily pattern plus Gaussian noise.
///
/// Deterministic for a fixed seed; two profiles constructed with identical
/// parameters produce identical sequences.
#[derive(Debug, Clone)]
pub struct SyntheticLoadProfile {
    /// Mean power demand (W).
    pub mean_w: f64,
    /// Amplitude of the sinusoidal variation (W).
    pub amplitude_w: f64,
    /// Phase offset (radians).
    pub phase_rad: f64,
    /// Standard deviation of the Gaussian noise (W).
    pub noise_std_w: f64,
    /// Period of the sinusoidal component (seconds).
    pub period_s: f64,
    seed: u64,
    rng: StdRng,
}

impl SyntheticLoadProfile {
    /// Creates a new synthetic load profile.
    ///
    /// # Panics
    ///
    /// Panics if `period_s` is not positive.
    pub fn new(
        mean_w: f64,
        amplitude_w: f64,
        phase_rad: f64,
        noise_std_w: f64,
        period_s: f64,
        seed: u64,
    ) -> Self {
        assert!(period_s > 0.0, "period_s must be > 0");
        Self {
            mean_w,
            amplitude_w,
            phase_rad,
            noise_std_w,
            period_s,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Profile for SyntheticLoadProfile {
    fn next(&mut self, time_s: f64) -> f64 {
        let angle = 2.0 * std::f64::consts::PI * time_s / self.period_s + self.phase_rad;
        self.mean_w + self.amplitude_w * angle.sin() + gaussian_noise(&mut self.rng, self.noise_std_w)
    }

    fn restart(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}

/// Synthetic grid-frequency profile: nominal frequency plus Gaussian noise.
#[derive(Debug, Clone)]
pub struct SyntheticFrequencyProfile {
    /// Nominal grid frequency (Hz).
    pub nominal_hz: f64,
    /// Standard deviation of the frequency noise (Hz).
    pub noise_std_hz: f64,
    seed: u64,
    rng: StdRng,
}

impl SyntheticFrequencyProfile {
    /// Creates a new synthetic frequency profile around `nominal_hz`.
    pub fn new(nominal_hz: f64, noise_std_hz: f64, seed: u64) -> Self {
        Self {
            nominal_hz,
            noise_std_hz,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Profile for SyntheticFrequencyProfile {
    fn next(&mut self, _time_s: f64) -> f64 {
        self.nominal_hz + gaussian_noise(&mut self.rng, self.noise_std_hz)
    }

    fn restart(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}

/// Profile backed by a fixed sequence, indexed by simulation time.
///
/// Values repeat cyclically past the end of the sequence. Mainly used by
/// tests and scripted scenarios.
#[derive(Debug, Clone)]
pub struct SequenceProfile {
    values: Vec<f64>,
    timestep_s: f64,
}

impl SequenceProfile {
    /// Creates a profile stepping through `values` every `timestep_s` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty or `timestep_s` is not positive.
    pub fn new(values: Vec<f64>, timestep_s: f64) -> Self {
        assert!(!values.is_empty(), "values must not be empty");
        assert!(timestep_s > 0.0, "timestep_s must be > 0");
        Self { values, timestep_s }
    }

    /// Creates a profile returning `value` at every timestep.
    pub fn constant(value: f64) -> Self {
        Self {
            values: vec![value],
            timestep_s: 1.0,
        }
    }
}

impl Profile for SequenceProfile {
    fn next(&mut self, time_s: f64) -> f64 {
        let idx = (time_s / self.timestep_s).floor().max(0.0) as usize;
        self.values[idx % self.values.len()]
    }

    fn restart(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_profile_is_deterministic_for_fixed_seed() {
        let mut a = SyntheticLoadProfile::new(1000.0, 500.0, 0.0, 50.0, 86_400.0, 42);
        let mut b = SyntheticLoadProfile::new(1000.0, 500.0, 0.0, 50.0, 86_400.0, 42);
        for t in 0..100 {
            let time = t as f64;
            assert_eq!(a.next(time), b.next(time));
        }
    }

    #[test]
    fn load_profile_restart_repeats_sequence() {
        let mut p = SyntheticLoadProfile::new(1000.0, 500.0, 0.0, 50.0, 86_400.0, 7);
        let first: Vec<f64> = (0..10).map(|t| p.next(t as f64)).collect();
        p.restart();
        let second: Vec<f64> = (0..10).map(|t| p.next(t as f64)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn noiseless_load_profile_is_pure_sine() {
        let mut p = SyntheticLoadProfile::new(100.0, 10.0, 0.0, 0.0, 100.0, 0);
        assert!((p.next(0.0) - 100.0).abs() < 1e-9);
        assert!((p.next(25.0) - 110.0).abs() < 1e-9);
        assert!((p.next(75.0) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn frequency_profile_stays_near_nominal() {
        let mut p = SyntheticFrequencyProfile::new(50.0, 0.02, 3);
        for t in 0..1000 {
            let f = p.next(t as f64);
            assert!((f - 50.0).abs() < 1.0, "frequency {f} strayed too far");
        }
    }

    #[test]
    fn gaussian_noise_zero_std_is_zero() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(gaussian_noise(&mut rng, 0.0), 0.0);
        assert_eq!(gaussian_noise(&mut rng, -1.0), 0.0);
    }

    #[test]
    fn sequence_profile_indexes_by_time_and_wraps() {
        let mut p = SequenceProfile::new(vec![1.0, 2.0, 3.0], 60.0);
        assert_eq!(p.next(0.0), 1.0);
        assert_eq!(p.next(61.0), 2.0);
        assert_eq!(p.next(120.0), 3.0);
        assert_eq!(p.next(180.0), 1.0);
    }

    #[test]
    fn constant_profile_returns_same_value() {
        let mut p = SequenceProfile::constant(5.5);
        assert_eq!(p.next(0.0), 5.5);
        assert_eq!(p.next(1e6), 5.5);
    }
}
