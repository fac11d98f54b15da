//! Configuration-driven assembly of one hydrogen subsystem.

use tracing::debug;

use crate::config::{ConfigError, ScenarioConfig, StorageConfig};
use crate::hydrogen::fluid::{MembraneTransport, StackFluidModel};
use crate::hydrogen::fuel_cell::FuelCell;
use crate::hydrogen::management::HydrogenManagementSystem;
use crate::hydrogen::pressure::{
    NoCorrection, PressureController, PressureModel, ProportionalCorrection,
};
use crate::hydrogen::stack::ElectrolyzerStack;
use crate::hydrogen::state::HydrogenState;
use crate::hydrogen::storage::{HydrogenStorage, Pipeline, PressureTank};
use crate::hydrogen::system::HydrogenSystem;
use crate::hydrogen::thermal::{StackThermalModel, ThermalController};

/// Closed set of storage technologies the factory can build.
pub const STORAGE_TECHNOLOGIES: &[&str] = &["pressure-tank", "pipeline"];

/// Builds one internally-consistent hydrogen subsystem from the scenario
/// configuration.
///
/// All selection happens here, at construction time: unknown names fail fast
/// with an error enumerating the valid options and nothing is re-resolved
/// during a run.
pub struct HydrogenFactory;

impl HydrogenFactory {
    /// Builds the storage variant selected by `config.technology`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a name outside
    /// [`STORAGE_TECHNOLOGIES`], or for invalid sizing of the selected
    /// variant.
    pub fn create_storage(config: &StorageConfig) -> Result<Box<dyn HydrogenStorage>, ConfigError> {
        match config.technology.as_str() {
            "pressure-tank" => {
                debug!("creating hydrogen storage as pressure-tank");
                Ok(Box::new(PressureTank::new(
                    config.tank_volume_m3,
                    config.min_pressure_bar,
                    config.max_pressure_bar,
                    config.initial_pressure_bar,
                )?))
            }
            "pipeline" => {
                debug!("creating hydrogen storage as pipeline");
                Ok(Box::new(Pipeline::new(config.pipeline_pressure_bar)?))
            }
            other => Err(ConfigError::new(
                "storage.technology",
                format!(
                    "unknown storage technology \"{other}\", available: {}",
                    STORAGE_TECHNOLOGIES.join(", ")
                ),
            )),
        }
    }

    /// Builds the pressure-controller policy matching the storage variant:
    /// pass-through for a pipeline, proportional correction for a tank.
    pub fn create_pressure_controller(
        config: &ScenarioConfig,
    ) -> Box<dyn PressureController> {
        if config.storage.technology == "pipeline" {
            Box::new(NoCorrection)
        } else {
            Box::new(ProportionalCorrection {
                gain_mol_s_bar: config.pressure.controller_gain_mol_s_bar,
            })
        }
    }

    /// Builds the management system from the configured power windows.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an infeasible window.
    pub fn create_management_system(
        config: &ScenarioConfig,
    ) -> Result<HydrogenManagementSystem, ConfigError> {
        HydrogenManagementSystem::new(
            config.electrolyzer.min_power_w,
            config.electrolyzer.max_power_w,
            config.fuel_cell.max_power_w,
        )
    }

    /// Seeds the initial state for a fresh stack (`soh = 1.0`) at the
    /// simulation start time.
    pub fn create_state(
        config: &ScenarioConfig,
        storage: &dyn HydrogenStorage,
    ) -> HydrogenState {
        HydrogenState::new(
            config.simulation.start_time_s,
            storage.capacity_wh(),
            config.electrolyzer.max_power_w,
            config.fuel_cell.max_power_w,
            config.electrolyzer.initial_temperature_k,
            config.pressure.desired_anode_bar,
            config.pressure.desired_cathode_bar,
            storage.soc(),
        )
    }

    /// Builds and wires the complete hydrogen subsystem.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` encountered while constructing the
    /// submodels; errors propagate untouched.
    pub fn create_system(config: &ScenarioConfig) -> Result<HydrogenSystem, ConfigError> {
        let storage = Self::create_storage(&config.storage)?;
        let state = Self::create_state(config, &*storage);

        let stack = ElectrolyzerStack::new(
            config.electrolyzer.cells,
            config.electrolyzer.cell_area_m2,
        )?;
        let membrane = MembraneTransport::new(
            config.electrolyzer.cell_area_m2,
            config.electrolyzer.membrane_thickness_m,
        )?;
        let fluid = StackFluidModel::new(config.electrolyzer.cells, membrane)?;
        let pressure = PressureModel::new(
            config.pressure.desired_anode_bar,
            config.pressure.desired_cathode_bar,
            config.pressure.separator_volume_m3,
        )?;
        let thermal_controller = ThermalController::new(
            &config.thermal,
            config.electrolyzer.heat_capacity_j_per_k,
        )?;
        let stack_thermal = StackThermalModel::new(config.electrolyzer.heat_capacity_j_per_k)?;
        let fuel_cell = FuelCell::new(config.fuel_cell.cells, config.fuel_cell.cell_voltage_v)?;
        let management = Self::create_management_system(config)?;
        let pressure_controller = Self::create_pressure_controller(config);

        Ok(HydrogenSystem::new(
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
        ))
    }
}
