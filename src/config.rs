//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default. Every parameter
/// is resolved once at construction time; nothing is re-read mid-run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Operation-strategy selection and parameters.
    #[serde(default)]
    pub strategy: StrategyConfig,
    /// Exogenous signal (load / grid frequency) parameters.
    #[serde(default)]
    pub profile: ProfileConfig,
    /// Electrolyzer stack parameters.
    #[serde(default)]
    pub electrolyzer: ElectrolyzerConfig,
    /// Fuel cell parameters.
    #[serde(default)]
    pub fuel_cell: FuelCellConfig,
    /// Gas-side pressure regulation parameters.
    #[serde(default)]
    pub pressure: PressureConfig,
    /// Stack thermal-control parameters.
    #[serde(default)]
    pub thermal: ThermalConfig,
    /// AC/DC and DC/DC converter parameters.
    #[serde(default)]
    pub power_electronics: PowerElectronicsConfig,
    /// Hydrogen storage selection and sizing.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Timestep length in seconds (must be > 0).
    pub timestep_s: f64,
    /// Number of timesteps to simulate (must be > 0).
    pub steps: usize,
    /// Simulation start time in seconds.
    pub start_time_s: f64,
    /// Master random seed for profile noise.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep_s: 1.0,
            steps: 3600,
            start_time_s: 0.0,
            seed: 42,
        }
    }
}

/// Operation-strategy selection and parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyConfig {
    /// Strategy kind: `"power-follower"`, `"frequency-containment"`, or
    /// `"peak-shaving"`.
    pub kind: String,
    /// Rated power for frequency-containment droop (W).
    pub rated_power_w: f64,
    /// Load threshold above which peak shaving discharges (W).
    pub peak_threshold_w: f64,
    /// Nominal grid frequency (Hz).
    pub nominal_frequency_hz: f64,
    /// Dead band around nominal frequency (Hz, no activation inside).
    pub deadband_hz: f64,
    /// Frequency deviation at which droop saturates to rated power (Hz).
    pub full_activation_hz: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            kind: "power-follower".to_string(),
            rated_power_w: 50_000.0,
            peak_threshold_w: 30_000.0,
            nominal_frequency_hz: 50.0,
            deadband_hz: 0.01,
            full_activation_hz: 0.2,
        }
    }
}

/// Synthetic exogenous signal parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// Mean of the synthetic load signal (W).
    pub mean_w: f64,
    /// Sinusoidal amplitude of the load signal (W).
    pub amplitude_w: f64,
    /// Phase offset of the load signal (radians).
    pub phase_rad: f64,
    /// Gaussian noise standard deviation of the load signal (W).
    pub noise_std_w: f64,
    /// Period of the sinusoidal component (seconds).
    pub period_s: f64,
    /// Gaussian noise standard deviation of the frequency signal (Hz).
    pub frequency_noise_std_hz: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            mean_w: 20_000.0,
            amplitude_w: 15_000.0,
            phase_rad: 1.2,
            noise_std_w: 500.0,
            period_s: 86_400.0,
            frequency_noise_std_hz: 0.04,
        }
    }
}

/// Electrolyzer stack parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElectrolyzerConfig {
    /// Number of series-connected cells.
    pub cells: usize,
    /// Geometric area of one cell (m^2).
    pub cell_area_m2: f64,
    /// Minimum continuous operating power (W); requests below go to standby.
    pub min_power_w: f64,
    /// Maximum continuous operating power (W).
    pub max_power_w: f64,
    /// Lumped stack heat capacity (J/K).
    pub heat_capacity_j_per_k: f64,
    /// Separator membrane thickness (m).
    pub membrane_thickness_m: f64,
    /// Stack temperature at simulation start (K).
    pub initial_temperature_k: f64,
}

impl Default for ElectrolyzerConfig {
    fn default() -> Self {
        Self {
            cells: 100,
            cell_area_m2: 0.03,
            min_power_w: 2_500.0,
            max_power_w: 50_000.0,
            heat_capacity_j_per_k: 5.0e5,
            membrane_thickness_m: 5.0e-4,
            initial_temperature_k: 333.15,
        }
    }
}

/// Fuel cell parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FuelCellConfig {
    /// Number of series-connected cells.
    pub cells: usize,
    /// Operating cell voltage (V).
    pub cell_voltage_v: f64,
    /// Maximum continuous discharge power (W).
    pub max_power_w: f64,
}

impl Default for FuelCellConfig {
    fn default() -> Self {
        Self {
            cells: 80,
            cell_voltage_v: 0.7,
            max_power_w: 25_000.0,
        }
    }
}

/// Gas-side pressure regulation parameters. Pressures are gauge (bar).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PressureConfig {
    /// Desired steady-state anode pressure (bar gauge).
    pub desired_anode_bar: f64,
    /// Desired steady-state cathode pressure (bar gauge).
    pub desired_cathode_bar: f64,
    /// Gas separator volume per electrode side (m^3).
    pub separator_volume_m3: f64,
    /// Proportional outflow-controller gain (mol/s per bar of deviation).
    pub controller_gain_mol_s_bar: f64,
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            desired_anode_bar: 30.0,
            desired_cathode_bar: 30.0,
            separator_volume_m3: 0.05,
            controller_gain_mol_s_bar: 0.05,
        }
    }
}

/// Stack thermal-control parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThermalConfig {
    /// Temperature setpoint for the stack (K).
    pub desired_temperature_k: f64,
    /// Minimum coolant water flow, never undershot (mol/s).
    pub min_water_flow_mol_s: f64,
    /// Maximum allowed cooling rate (K/s).
    pub max_cooling_rate_k_s: f64,
    /// Water inlet temperature offset applied at full control action (K).
    pub delta_water_temperature_k: f64,
    /// Small-signal control slope (1/K); saturates outside the linear band.
    pub control_slope_per_k: f64,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            desired_temperature_k: 353.15,
            min_water_flow_mol_s: 0.5,
            max_cooling_rate_k_s: 2.0,
            delta_water_temperature_k: 15.0,
            control_slope_per_k: 0.2,
        }
    }
}

/// AC/DC and DC/DC converter parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PowerElectronicsConfig {
    /// Fixed AC/DC converter efficiency (0..=1).
    pub acdc_efficiency: f64,
    /// Fixed DC/DC converter efficiency (0..=1).
    pub dcdc_efficiency: f64,
    /// Optional measured AC/DC efficiency table as `[load_fraction,
    /// efficiency]` pairs with strictly increasing load fractions. When
    /// present it replaces the fixed AC/DC efficiency.
    pub acdc_efficiency_table: Option<Vec<[f64; 2]>>,
}

impl Default for PowerElectronicsConfig {
    fn default() -> Self {
        Self {
            acdc_efficiency: 0.95,
            dcdc_efficiency: 0.98,
            acdc_efficiency_table: None,
        }
    }
}

/// Hydrogen storage selection and sizing. Tank pressures are absolute (bar).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Storage technology: `"pressure-tank"` or `"pipeline"`.
    pub technology: String,
    /// Tank volume (m^3).
    pub tank_volume_m3: f64,
    /// Tank pressure when full (bar absolute).
    pub max_pressure_bar: f64,
    /// Tank pressure when empty (bar absolute).
    pub min_pressure_bar: f64,
    /// Tank pressure at simulation start (bar absolute).
    pub initial_pressure_bar: f64,
    /// Pipeline grid pressure (bar absolute).
    pub pipeline_pressure_bar: f64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            technology: "pressure-tank".to_string(),
            tank_volume_m3: 5.0,
            max_pressure_bar: 45.0,
            min_pressure_bar: 1.0,
            initial_pressure_bar: 5.0,
            pipeline_pressure_bar: 31.0,
        }
    }
}

/// Configuration error with field path and constraint description.
///
/// Construction-time failures carry this type and propagate to the caller
/// untouched; they are never recovered automatically.
#[derive(Debug, Clone, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"pressure.desired_anode_bar"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    /// Creates a configuration error for the given field path.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: power follower on a pressure tank.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            strategy: StrategyConfig::default(),
            profile: ProfileConfig::default(),
            electrolyzer: ElectrolyzerConfig::default(),
            fuel_cell: FuelCellConfig::default(),
            pressure: PressureConfig::default(),
            thermal: ThermalConfig::default(),
            power_electronics: PowerElectronicsConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    /// Returns the frequency-response preset: FCR droop into a pipeline.
    pub fn frequency_response() -> Self {
        Self {
            strategy: StrategyConfig {
                kind: "frequency-containment".to_string(),
                rated_power_w: 40_000.0,
                ..StrategyConfig::default()
            },
            storage: StorageConfig {
                technology: "pipeline".to_string(),
                ..StorageConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the peak-shaving preset: tighter threshold, larger tank.
    pub fn peak_shaving() -> Self {
        Self {
            strategy: StrategyConfig {
                kind: "peak-shaving".to_string(),
                peak_threshold_w: 25_000.0,
                ..StrategyConfig::default()
            },
            profile: ProfileConfig {
                mean_w: 25_000.0,
                amplitude_w: 20_000.0,
                ..ProfileConfig::default()
            },
            storage: StorageConfig {
                tank_volume_m3: 10.0,
                ..StorageConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "frequency_response", "peak_shaving"];

    /// Known operation-strategy kinds.
    pub const STRATEGY_KINDS: &[&str] =
        &["power-follower", "frequency-containment", "peak-shaving"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "frequency_response" => Ok(Self::frequency_response()),
            "peak_shaving" => Ok(Self::peak_shaving()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.timestep_s <= 0.0 {
            errors.push(ConfigError::new("simulation.timestep_s", "must be > 0"));
        }
        if s.steps == 0 {
            errors.push(ConfigError::new("simulation.steps", "must be > 0"));
        }

        let st = &self.strategy;
        if !Self::STRATEGY_KINDS.contains(&st.kind.as_str()) {
            errors.push(ConfigError::new(
                "strategy.kind",
                format!(
                    "unknown strategy \"{}\", available: {}",
                    st.kind,
                    Self::STRATEGY_KINDS.join(", ")
                ),
            ));
        }
        if st.rated_power_w <= 0.0 {
            errors.push(ConfigError::new("strategy.rated_power_w", "must be > 0"));
        }
        if st.deadband_hz < 0.0 {
            errors.push(ConfigError::new("strategy.deadband_hz", "must be >= 0"));
        }
        if st.full_activation_hz <= st.deadband_hz {
            errors.push(ConfigError::new(
                "strategy.full_activation_hz",
                "must be > strategy.deadband_hz",
            ));
        }

        let el = &self.electrolyzer;
        if el.cells == 0 {
            errors.push(ConfigError::new("electrolyzer.cells", "must be > 0"));
        }
        if el.cell_area_m2 <= 0.0 {
            errors.push(ConfigError::new("electrolyzer.cell_area_m2", "must be > 0"));
        }
        if el.min_power_w < 0.0 {
            errors.push(ConfigError::new("electrolyzer.min_power_w", "must be >= 0"));
        }
        if el.max_power_w <= el.min_power_w {
            errors.push(ConfigError::new(
                "electrolyzer.max_power_w",
                "must be > electrolyzer.min_power_w",
            ));
        }
        if el.heat_capacity_j_per_k <= 0.0 {
            errors.push(ConfigError::new(
                "electrolyzer.heat_capacity_j_per_k",
                "must be > 0",
            ));
        }
        if el.membrane_thickness_m <= 0.0 {
            errors.push(ConfigError::new(
                "electrolyzer.membrane_thickness_m",
                "must be > 0",
            ));
        }
        if el.initial_temperature_k <= 0.0 {
            errors.push(ConfigError::new(
                "electrolyzer.initial_temperature_k",
                "must be > 0",
            ));
        }

        let fc = &self.fuel_cell;
        if fc.cells == 0 {
            errors.push(ConfigError::new("fuel_cell.cells", "must be > 0"));
        }
        if fc.cell_voltage_v <= 0.0 {
            errors.push(ConfigError::new("fuel_cell.cell_voltage_v", "must be > 0"));
        }
        if fc.max_power_w < 0.0 {
            errors.push(ConfigError::new("fuel_cell.max_power_w", "must be >= 0"));
        }

        let p = &self.pressure;
        // Alkaline stack: shared electrolyte, both sides must target the same
        // pressure. Review note: measured per-electrode pressures drift from
        // the target during operation; this constrains setpoints only.
        if p.desired_anode_bar != p.desired_cathode_bar {
            errors.push(ConfigError::new(
                "pressure.desired_anode_bar",
                "must equal pressure.desired_cathode_bar for the alkaline stack",
            ));
        }
        if p.desired_anode_bar < 0.0 {
            errors.push(ConfigError::new("pressure.desired_anode_bar", "must be >= 0"));
        }
        if p.separator_volume_m3 <= 0.0 {
            errors.push(ConfigError::new("pressure.separator_volume_m3", "must be > 0"));
        }
        if p.controller_gain_mol_s_bar < 0.0 {
            errors.push(ConfigError::new(
                "pressure.controller_gain_mol_s_bar",
                "must be >= 0",
            ));
        }

        let th = &self.thermal;
        if th.desired_temperature_k <= 0.0 {
            errors.push(ConfigError::new("thermal.desired_temperature_k", "must be > 0"));
        }
        if th.min_water_flow_mol_s <= 0.0 {
            // Never fully stopped: electrolyte circulation must be kept up.
            errors.push(ConfigError::new("thermal.min_water_flow_mol_s", "must be > 0"));
        }
        if th.max_cooling_rate_k_s <= 0.0 {
            errors.push(ConfigError::new("thermal.max_cooling_rate_k_s", "must be > 0"));
        }
        if th.delta_water_temperature_k <= 0.0 {
            errors.push(ConfigError::new(
                "thermal.delta_water_temperature_k",
                "must be > 0",
            ));
        }
        if th.control_slope_per_k <= 0.0 {
            errors.push(ConfigError::new("thermal.control_slope_per_k", "must be > 0"));
        }

        let pe = &self.power_electronics;
        if !(0.0..=1.0).contains(&pe.acdc_efficiency) || pe.acdc_efficiency == 0.0 {
            errors.push(ConfigError::new(
                "power_electronics.acdc_efficiency",
                "must be in (0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&pe.dcdc_efficiency) || pe.dcdc_efficiency == 0.0 {
            errors.push(ConfigError::new(
                "power_electronics.dcdc_efficiency",
                "must be in (0, 1]",
            ));
        }
        if let Some(table) = &pe.acdc_efficiency_table {
            if table.is_empty() {
                errors.push(ConfigError::new(
                    "power_electronics.acdc_efficiency_table",
                    "must not be empty",
                ));
            }
            for pair in table {
                if !(0.0..=1.0).contains(&pair[1]) {
                    errors.push(ConfigError::new(
                        "power_electronics.acdc_efficiency_table",
                        format!("efficiency {} out of [0, 1]", pair[1]),
                    ));
                    break;
                }
            }
        }

        let sto = &self.storage;
        if sto.tank_volume_m3 <= 0.0 {
            errors.push(ConfigError::new("storage.tank_volume_m3", "must be > 0"));
        }
        if sto.min_pressure_bar < 0.0 {
            errors.push(ConfigError::new("storage.min_pressure_bar", "must be >= 0"));
        }
        if sto.max_pressure_bar <= sto.min_pressure_bar {
            errors.push(ConfigError::new(
                "storage.max_pressure_bar",
                "must be > storage.min_pressure_bar",
            ));
        }
        if sto.initial_pressure_bar < sto.min_pressure_bar
            || sto.initial_pressure_bar > sto.max_pressure_bar
        {
            errors.push(ConfigError::new(
                "storage.initial_pressure_bar",
                "must be within [min_pressure_bar, max_pressure_bar]",
            ));
        }
        if sto.pipeline_pressure_bar < 0.0 {
            errors.push(ConfigError::new("storage.pipeline_pressure_bar", "must be >= 0"));
        }

        errors
    }
}
