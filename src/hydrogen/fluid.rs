//! Electrolyzer fluid and membrane model: Faraday mass balance with
//! membrane crossover.
//!
//! Gross generation follows Faraday's law; net flows subtract separator
//! permeation. Both are reported: the gross rate feeds efficiency numbers,
//! the net rate feeds the mass balance and storage filling.

use crate::config::ConfigError;
use crate::hydrogen::FARADAY;
use crate::hydrogen::storage::gauge_to_absolute_bar;

/// Hydrogen permeability of the separator (mol/(m s bar)).
const H2_PERMEABILITY: f64 = 2.0e-9;

/// Oxygen permeability of the separator (mol/(m s bar)).
const O2_PERMEABILITY: f64 = 1.0e-9;

/// Fraction of the Faraday generation lost through electrolyte
/// supersaturation at the membrane, per unit of cell current.
const CROSSOVER_CURRENT_FRACTION: f64 = 5.0e-3;

/// Molar hydrogen generation of one cell by Faraday's law (mol/s).
pub fn hydrogen_generation(current_a: f64) -> f64 {
    current_a / (2.0 * FARADAY)
}

/// Molar oxygen generation of one cell by Faraday's law (mol/s).
pub fn oxygen_generation(current_a: f64) -> f64 {
    current_a / (4.0 * FARADAY)
}

/// Molar water consumption of one cell by Faraday's law (mol/s).
pub fn water_consumption(current_a: f64) -> f64 {
    current_a / (2.0 * FARADAY)
}

/// Species transport through the separator membrane.
///
/// Parameterized by the stack state (electrode pressures) and the per-cell
/// current; permeation has a pressure-driven diffusive part and a
/// current-coupled supersaturation part.
#[derive(Debug, Clone)]
pub struct MembraneTransport {
    cell_area_m2: f64,
    thickness_m: f64,
}

impl MembraneTransport {
    /// Creates the membrane model from separator geometry.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for non-positive area or thickness.
    pub fn new(cell_area_m2: f64, thickness_m: f64) -> Result<Self, ConfigError> {
        if cell_area_m2 <= 0.0 {
            return Err(ConfigError::new("electrolyzer.cell_area_m2", "must be > 0"));
        }
        if thickness_m <= 0.0 {
            return Err(ConfigError::new(
                "electrolyzer.membrane_thickness_m",
                "must be > 0",
            ));
        }
        Ok(Self {
            cell_area_m2,
            thickness_m,
        })
    }

    /// Hydrogen permeation from cathode to anode for one cell (mol/s).
    pub fn hydrogen_permeation(&self, current_a: f64, pressure_cathode_bar: f64) -> f64 {
        let pressure_abs = gauge_to_absolute_bar(pressure_cathode_bar);
        let diffusive = H2_PERMEABILITY * self.cell_area_m2 / self.thickness_m * pressure_abs;
        let supersaturation = CROSSOVER_CURRENT_FRACTION * hydrogen_generation(current_a);
        diffusive + supersaturation
    }

    /// Oxygen permeation from anode to cathode for one cell (mol/s).
    pub fn oxygen_permeation(&self, current_a: f64, pressure_anode_bar: f64) -> f64 {
        let pressure_abs = gauge_to_absolute_bar(pressure_anode_bar);
        let diffusive = O2_PERMEABILITY * self.cell_area_m2 / self.thickness_m * pressure_abs;
        let supersaturation = CROSSOVER_CURRENT_FRACTION * oxygen_generation(current_a);
        diffusive + supersaturation
    }
}

/// Stack-level molar flows for one timestep (mol/s).
#[derive(Debug, Clone, Copy)]
pub struct GasFlows {
    /// Gross hydrogen generation by Faraday's law.
    pub hydrogen_generated: f64,
    /// Gross oxygen generation by Faraday's law.
    pub oxygen_generated: f64,
    /// Gross water consumption by Faraday's law (positive).
    pub water_consumed: f64,
    /// Hydrogen permeation through the separator.
    pub hydrogen_permeation: f64,
    /// Oxygen permeation through the separator.
    pub oxygen_permeation: f64,
    /// Net hydrogen after crossover. Permeated oxygen recombines with two
    /// hydrogen equivalents, hence the doubled oxygen term. May be negative
    /// for a degraded stack; that is a legitimate output, not an error.
    pub hydrogen_net: f64,
    /// Net oxygen after crossover.
    pub oxygen_net: f64,
    /// Signed net water balance: consumption expressed as a negative rate.
    pub water_net: f64,
}

/// Converts stack current into molar species flows.
#[derive(Debug, Clone)]
pub struct StackFluidModel {
    cells: usize,
    membrane: MembraneTransport,
}

impl StackFluidModel {
    /// Creates the fluid model for a stack of `cells` series cells.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a zero cell count or invalid membrane
    /// geometry.
    pub fn new(cells: usize, membrane: MembraneTransport) -> Result<Self, ConfigError> {
        if cells == 0 {
            return Err(ConfigError::new("electrolyzer.cells", "must be > 0"));
        }
        Ok(Self { cells, membrane })
    }

    /// Computes all molar flows for the given per-cell current and electrode
    /// pressures. No clamping is applied anywhere in this model.
    pub fn calculate(
        &self,
        current_a: f64,
        pressure_anode_bar: f64,
        pressure_cathode_bar: f64,
    ) -> GasFlows {
        let cells = self.cells as f64;

        let hydrogen_generated = cells * hydrogen_generation(current_a);
        let oxygen_generated = cells * oxygen_generation(current_a);
        let water_consumed = cells * water_consumption(current_a);

        let hydrogen_permeation =
            cells * self.membrane.hydrogen_permeation(current_a, pressure_cathode_bar);
        let oxygen_permeation =
            cells * self.membrane.oxygen_permeation(current_a, pressure_anode_bar);

        GasFlows {
            hydrogen_generated,
            oxygen_generated,
            water_consumed,
            hydrogen_permeation,
            oxygen_permeation,
            hydrogen_net: hydrogen_generated - hydrogen_permeation - 2.0 * oxygen_permeation,
            oxygen_net: oxygen_generated - oxygen_permeation,
            water_net: -water_consumed,
        }
    }
}
