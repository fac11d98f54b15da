//! Simulation engine orchestrating dispatch, conversion, and physics.

use crate::config::{ConfigError, ScenarioConfig};
use crate::ems::EnergyManagement;
use crate::ems::state::SystemState;
use crate::ems::strategy::build_strategy;
use crate::hydrogen::{HydrogenFactory, HydrogenSystem};
use crate::io::export::DataSink;
use crate::power::{AcDcConverter, DcDcConverter, PowerElectronics};
use crate::sim::clock::Clock;
use crate::sim::types::{SimConfig, StepResult};

/// Simulation engine owning the energy management, the conversion chain, the
/// hydrogen subsystem, and the export sink.
///
/// One timestep is fully resolved before the next begins: dispatch,
/// conversion, electrochemistry, pressure, thermal, export. There is no
/// shared mutable state across timesteps beyond the explicit state objects
/// passed forward.
pub struct Engine {
    config: SimConfig,
    ems: EnergyManagement,
    power_electronics: PowerElectronics,
    hydrogen: HydrogenSystem,
    sink: Box<dyn DataSink>,
    previous: SystemState,
}

impl Engine {
    /// Creates an engine from already-constructed components.
    pub fn new(
        config: SimConfig,
        ems: EnergyManagement,
        power_electronics: PowerElectronics,
        hydrogen: HydrogenSystem,
        sink: Box<dyn DataSink>,
    ) -> Self {
        let previous = SystemState::initial(config.start_time_s);
        Self {
            config,
            ems,
            power_electronics,
            hydrogen,
            sink,
            previous,
        }
    }

    /// Builds the full engine from a scenario configuration.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` from validation or component
    /// construction; setup errors propagate untouched.
    pub fn from_scenario(
        scenario: &ScenarioConfig,
        sink: Box<dyn DataSink>,
    ) -> Result<Self, ConfigError> {
        if let Some(error) = scenario.validate().into_iter().next() {
            return Err(error);
        }

        let config = SimConfig::from_config(&scenario.simulation);
        let strategy = build_strategy(scenario)?;
        let ems = EnergyManagement::new(strategy, config.start_time_s);

        let pe = &scenario.power_electronics;
        let rated = scenario.electrolyzer.max_power_w;
        let acdc = match &pe.acdc_efficiency_table {
            Some(table) => AcDcConverter::with_efficiency_table(table, rated)?,
            None => AcDcConverter::with_fixed_efficiency(pe.acdc_efficiency, rated)?,
        };
        let dcdc = DcDcConverter::new(pe.dcdc_efficiency)?;
        let power_electronics = PowerElectronics::new(acdc, dcdc);

        let hydrogen = HydrogenFactory::create_system(scenario)?;

        Ok(Self::new(config, ems, power_electronics, hydrogen, sink))
    }

    /// Executes one simulation timestep and returns its record.
    pub fn step(&mut self, t: usize) -> StepResult {
        let time_s = self.config.time_at(t);
        let dt = self.config.timestep_s;

        // 1. Dispatch: the strategy sees the previous step's system state.
        let requested_ac_w = self.ems.next(time_s, &self.previous, 0.0);

        // 2. Conversion to the DC side.
        let requested_dc_w = self.power_electronics.ac_to_dc_request(requested_ac_w);

        // 3. Physics: electrochemistry, pressure, thermal, storage.
        let actual_dc_w = self.hydrogen.step(time_s, requested_dc_w, dt);

        // 4. Conversion back to the AC side.
        let actual_ac_w = self.power_electronics.dc_to_ac_actual(actual_dc_w);
        let conversion_loss_w = (actual_ac_w - actual_dc_w).abs();

        let fulfillment = if requested_ac_w == 0.0 {
            1.0
        } else {
            (actual_ac_w / requested_ac_w).clamp(0.0, 1.0)
        };

        {
            let state = self.hydrogen.state_mut();
            state.power_loss += conversion_loss_w;
            state.set_fulfillment(fulfillment);
        }

        // 5. Snapshot for the next dispatch and for the export collaborator.
        self.previous = SystemState {
            time: time_s,
            power: actual_ac_w,
            fulfillment,
        };
        let technology_record = self.hydrogen.state().record();
        self.ems.export(time_s, &technology_record, &mut *self.sink);

        let state = self.hydrogen.state();
        StepResult {
            timestep: t,
            time_s,
            power_requested_w: requested_ac_w,
            power_dc_w: actual_dc_w,
            power_ac_w: actual_ac_w,
            fulfillment,
            current_a: state.current,
            voltage_v: state.voltage,
            current_density_a_m2: state.current_density,
            temperature_k: state.temperature,
            pressure_anode_bar: state.pressure_anode,
            pressure_cathode_bar: state.pressure_cathode,
            hydrogen_production_mol_s: state.hydrogen_production,
            oxygen_production_mol_s: state.oxygen_production,
            hydrogen_use_mol_s: state.hydrogen_use,
            water_flow_mol_s: self.hydrogen.water_flow_mol_s(),
            soc: state.soc,
            soh: state.soh,
            power_loss_w: state.power_loss,
            is_charge: state.is_charge,
        }
    }

    /// Executes all timesteps and returns the complete step record vector.
    pub fn run(&mut self) -> Vec<StepResult> {
        let mut results = Vec::with_capacity(self.config.steps);
        let mut clock = Clock::new(self.config.steps);
        clock.run(|t| results.push(self.step(t)));
        results
    }

    /// Returns the simulation timing configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Returns the hydrogen subsystem (for report and test queries).
    pub fn hydrogen(&self) -> &HydrogenSystem {
        &self.hydrogen
    }

    /// Name of the active operation strategy.
    pub fn strategy_name(&self) -> &'static str {
        self.ems.strategy_name()
    }
}
