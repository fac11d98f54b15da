//! Per-timestep state contracts for storage technologies.

/// Abstract per-timestep state shared by all storage technologies.
///
/// Exactly one instance exists per simulated storage unit; the owning system
/// mutates it once per timestep and exports a snapshot afterwards. The
/// normalized quantities (`soc`, `soh`, `fulfillment`) are clamped to [0, 1]
/// by the producing component, never by consumers.
pub trait StorageTechnologyState {
    /// `true` while the technology is consuming power (charging).
    fn is_charge(&self) -> bool;
    /// Terminal voltage (V).
    fn voltage(&self) -> f64;
    /// Terminal current (A).
    fn current(&self) -> f64;
    /// Power dissipated this timestep (W).
    fn power_loss(&self) -> f64;
    /// State of charge, fraction in [0, 1].
    fn soc(&self) -> f64;
    /// State of health, fraction in [0, 1].
    fn soh(&self) -> f64;
    /// Usable energy capacity (Wh).
    fn capacity(&self) -> f64;
    /// Ratio of delivered to requested power, fraction in [0, 1].
    fn fulfillment(&self) -> f64;
    /// Stack temperature (K).
    fn temperature(&self) -> f64;
    /// Overwrites the stack temperature (K).
    fn set_temperature(&mut self, kelvin: f64);
    /// Maximum charging power (W, positive magnitude).
    fn max_charge_power(&self) -> f64;
    /// Maximum discharging power (W, positive magnitude).
    fn max_discharge_power(&self) -> f64;
}

/// State of the hydrogen subsystem for one timestep.
///
/// Created once by the factory at simulation start with a fresh stack
/// (`soh = 1.0`) and mutated in the fixed submodel order: dispatch,
/// conversion, electrochemistry, pressure, thermal.
#[derive(Debug, Clone)]
pub struct HydrogenState {
    /// Simulation time of this snapshot (s).
    pub time: f64,
    /// `true` while the electrolyzer is consuming power.
    pub is_charge: bool,
    /// Stack terminal voltage (V).
    pub voltage: f64,
    /// Stack current (A).
    pub current: f64,
    /// Cell current density (A/m^2).
    pub current_density: f64,
    /// Power dissipated this timestep (W): stack heat plus conversion losses.
    pub power_loss: f64,
    /// State of charge of the attached storage, in [0, 1].
    pub soc: f64,
    /// State of health of the stack, in [0, 1].
    pub soh: f64,
    /// Usable storage capacity (Wh).
    pub capacity: f64,
    /// Delivered vs. requested power ratio, in [0, 1].
    pub fulfillment: f64,
    /// Stack temperature (K).
    pub temperature: f64,
    /// Maximum charging power (W).
    pub max_charge_power: f64,
    /// Maximum discharging power (W).
    pub max_discharge_power: f64,
    /// Net hydrogen production after crossover (mol/s). May go negative for
    /// a degraded stack; that is a signal, not an error.
    pub hydrogen_production: f64,
    /// Net oxygen production after crossover (mol/s).
    pub oxygen_production: f64,
    /// Hydrogen drawn by the fuel cell (mol/s).
    pub hydrogen_use: f64,
    /// Anode-side pressure (bar gauge).
    pub pressure_anode: f64,
    /// Cathode-side pressure (bar gauge).
    pub pressure_cathode: f64,
}

impl HydrogenState {
    /// Creates the initial state for a fresh stack at simulation start.
    #[expect(clippy::too_many_arguments)]
    pub fn new(
        start_time_s: f64,
        capacity_wh: f64,
        max_charge_power_w: f64,
        max_discharge_power_w: f64,
        initial_temperature_k: f64,
        pressure_anode_bar: f64,
        pressure_cathode_bar: f64,
        initial_soc: f64,
    ) -> Self {
        Self {
            time: start_time_s,
            is_charge: false,
            voltage: 0.0,
            current: 0.0,
            current_density: 0.0,
            power_loss: 0.0,
            soc: initial_soc.clamp(0.0, 1.0),
            soh: 1.0,
            capacity: capacity_wh,
            fulfillment: 1.0,
            temperature: initial_temperature_k,
            max_charge_power: max_charge_power_w,
            max_discharge_power: max_discharge_power_w,
            hydrogen_production: 0.0,
            oxygen_production: 0.0,
            hydrogen_use: 0.0,
            pressure_anode: pressure_anode_bar,
            pressure_cathode: pressure_cathode_bar,
        }
    }

    /// Sets the state of charge, clamped to [0, 1].
    pub fn set_soc(&mut self, soc: f64) {
        self.soc = soc.clamp(0.0, 1.0);
    }

    /// Sets the fulfillment ratio, clamped to [0, 1].
    pub fn set_fulfillment(&mut self, fulfillment: f64) {
        self.fulfillment = fulfillment.clamp(0.0, 1.0);
    }

    /// Flattened key/value view of the state for the export collaborator.
    pub fn record(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("is_charge", if self.is_charge { 1.0 } else { 0.0 }),
            ("voltage_v", self.voltage),
            ("current_a", self.current),
            ("current_density_a_m2", self.current_density),
            ("power_loss_w", self.power_loss),
            ("soc", self.soc),
            ("soh", self.soh),
            ("capacity_wh", self.capacity),
            ("fulfillment", self.fulfillment),
            ("temperature_k", self.temperature),
            ("hydrogen_production_mol_s", self.hydrogen_production),
            ("oxygen_production_mol_s", self.oxygen_production),
            ("hydrogen_use_mol_s", self.hydrogen_use),
            ("pressure_anode_bar", self.pressure_anode),
            ("pressure_cathode_bar", self.pressure_cathode),
        ]
    }
}

impl StorageTechnologyState for HydrogenState {
    fn is_charge(&self) -> bool {
        self.is_charge
    }

    fn voltage(&self) -> f64 {
        self.voltage
    }

    fn current(&self) -> f64 {
        self.current
    }

    fn power_loss(&self) -> f64 {
        self.power_loss
    }

    fn soc(&self) -> f64 {
        self.soc
    }

    fn soh(&self) -> f64 {
        self.soh
    }

    fn capacity(&self) -> f64 {
        self.capacity
    }

    fn fulfillment(&self) -> f64 {
        self.fulfillment
    }

    fn temperature(&self) -> f64 {
        self.temperature
    }

    fn set_temperature(&mut self, kelvin: f64) {
        self.temperature = kelvin;
    }

    fn max_charge_power(&self) -> f64 {
        self.max_charge_power
    }

    fn max_discharge_power(&self) -> f64 {
        self.max_discharge_power
    }
}
