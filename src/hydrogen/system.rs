//! Per-timestep orchestration of the hydrogen subsystem.

use tracing::debug;

use crate::hydrogen::H2_LHV_J_PER_MOL;
use crate::hydrogen::fluid::StackFluidModel;
use crate::hydrogen::fuel_cell::FuelCell;
use crate::hydrogen::management::HydrogenManagementSystem;
use crate::hydrogen::pressure::{PressureController, PressureModel};
use crate::hydrogen::stack::ElectrolyzerStack;
use crate::hydrogen::state::HydrogenState;
use crate::hydrogen::storage::HydrogenStorage;
use crate::hydrogen::thermal::{StackThermalModel, ThermalController, ThermalOutput};

/// One hydrogen storage unit: electrolyzer, fuel cell, gas handling, thermal
/// control, and the attached storage.
///
/// `step` resolves one timestep in the fixed submodel order: management
/// window, stack operating point, electrochemical mass balance, pressure
/// regulation, thermal control, storage filling, state snapshot.
#[derive(Debug)]
pub struct HydrogenSystem {
    state: HydrogenState,
    stack: ElectrolyzerStack,
    fluid: StackFluidModel,
    pressure: PressureModel,
    pressure_controller: Box<dyn PressureController>,
    thermal_controller: ThermalController,
    stack_thermal: StackThermalModel,
    fuel_cell: FuelCell,
    management: HydrogenManagementSystem,
    storage: Box<dyn HydrogenStorage>,
    last_thermal: Option<ThermalOutput>,
}

impl HydrogenSystem {
    /// Wires a system from its submodels; use
    /// [`crate::hydrogen::HydrogenFactory`] for configuration-driven
    /// construction.
    #[expect(clippy::too_many_arguments)]
    pub fn new(
        state: HydrogenState,
        stack: ElectrolyzerStack,
        fluid: StackFluidModel,
        pressure: PressureModel,
        pressure_controller: Box<dyn PressureController>,
        thermal_controller: ThermalController,
        stack_thermal: StackThermalModel,
        fuel_cell: FuelCell,
        management: HydrogenManagementSystem,
        storage: Box<dyn HydrogenStorage>,
    ) -> Self {
        Self {
            state,
            stack,
            fluid,
            pressure,
            pressure_controller,
            thermal_controller,
            stack_thermal,
            fuel_cell,
            management,
            storage,
            last_thermal: None,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &HydrogenState {
        &self.state
    }

    /// Mutable state access for the engine (fulfillment, conversion losses).
    pub fn state_mut(&mut self) -> &mut HydrogenState {
        &mut self.state
    }

    /// Attached storage.
    pub fn storage(&self) -> &dyn HydrogenStorage {
        &*self.storage
    }

    /// Coolant flow of the latest step (mol/s); zero before the first step.
    pub fn water_flow_mol_s(&self) -> f64 {
        self.last_thermal.map_or(0.0, |t| t.water_flow_mol_s)
    }

    /// Resolves one timestep for a DC power request and returns the DC power
    /// actually realized (same sign convention: charge-positive).
    pub fn step(&mut self, time_s: f64, dc_power_w: f64, timestep_s: f64) -> f64 {
        let target_w = self.management.clamp_power(dc_power_w);

        let actual_dc_w = if target_w > 0.0 {
            self.step_electrolyzer(target_w, timestep_s)
        } else if target_w < 0.0 {
            self.step_fuel_cell(target_w, timestep_s)
        } else {
            self.step_standby(timestep_s)
        };

        self.state.time = time_s;
        self.state.set_soc(self.storage.soc());
        debug!(time_s, dc_power_w, target_w, actual_dc_w, "hydrogen step");
        actual_dc_w
    }

    fn step_electrolyzer(&mut self, target_w: f64, timestep_s: f64) -> f64 {
        let op = self.stack.operating_point(target_w, self.state.temperature);
        let cell_voltage = op.voltage_v / self.stack.cells() as f64;
        let heat_w = self.stack.heat_generation_w(op.current_a, cell_voltage);

        let flows = self.fluid.calculate(
            op.current_a,
            self.state.pressure_anode,
            self.state.pressure_cathode,
        );

        self.pressure.calculate(
            &*self.pressure_controller,
            self.state.pressure_anode,
            self.state.pressure_cathode,
            flows.hydrogen_net,
            flows.oxygen_net,
            self.state.temperature,
            timestep_s,
        );

        let thermal = self.thermal_controller.calculate(
            self.state.temperature,
            heat_w,
            timestep_s,
            op.current_density_a_m2,
        );
        let new_temperature = self.stack_thermal.step(
            self.state.temperature,
            heat_w,
            thermal.cooling_rate_k_s,
            timestep_s,
        );

        self.storage.charge(self.pressure.h2_outflow(), timestep_s);

        self.state.is_charge = true;
        self.state.voltage = op.voltage_v;
        self.state.current = op.current_a;
        self.state.current_density = op.current_density_a_m2;
        self.state.hydrogen_production = flows.hydrogen_net;
        self.state.oxygen_production = flows.oxygen_net;
        self.state.hydrogen_use = 0.0;
        self.state.pressure_anode = self.pressure.pressure_anode();
        self.state.pressure_cathode = self.pressure.pressure_cathode();
        self.state.temperature = new_temperature;
        self.state.power_loss = heat_w.max(0.0);
        self.last_thermal = Some(thermal);

        op.voltage_v * op.current_a
    }

    fn step_fuel_cell(&mut self, target_w: f64, timestep_s: f64) -> f64 {
        let available = self.storage.max_discharge_rate_mol_s(timestep_s);
        let out = self.fuel_cell.calculate(target_w, available);

        self.storage.charge(-out.hydrogen_use_mol_s, timestep_s);

        // Electrolyzer separators are idle; pressures hold. The stack keeps
        // being temperature-regulated without new heat input.
        let thermal = self
            .thermal_controller
            .calculate(self.state.temperature, 0.0, timestep_s, 0.0);
        let new_temperature = self.stack_thermal.step(
            self.state.temperature,
            0.0,
            thermal.cooling_rate_k_s,
            timestep_s,
        );

        self.state.is_charge = false;
        self.state.voltage = out.voltage_v;
        self.state.current = out.current_a;
        self.state.current_density = 0.0;
        self.state.hydrogen_production = 0.0;
        self.state.oxygen_production = 0.0;
        self.state.hydrogen_use = out.hydrogen_use_mol_s;
        self.state.temperature = new_temperature;
        self.state.power_loss =
            (out.hydrogen_use_mol_s * H2_LHV_J_PER_MOL + out.power_dc_w).max(0.0);
        self.last_thermal = Some(thermal);

        out.power_dc_w
    }

    fn step_standby(&mut self, timestep_s: f64) -> f64 {
        let thermal = self
            .thermal_controller
            .calculate(self.state.temperature, 0.0, timestep_s, 0.0);
        let new_temperature = self.stack_thermal.step(
            self.state.temperature,
            0.0,
            thermal.cooling_rate_k_s,
            timestep_s,
        );

        self.state.is_charge = false;
        self.state.voltage = self.stack.stack_voltage(0.0, new_temperature);
        self.state.current = 0.0;
        self.state.current_density = 0.0;
        self.state.hydrogen_production = 0.0;
        self.state.oxygen_production = 0.0;
        self.state.hydrogen_use = 0.0;
        self.state.temperature = new_temperature;
        self.state.power_loss = 0.0;
        self.last_thermal = Some(thermal);

        0.0
    }
}
