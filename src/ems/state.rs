//! State records exchanged between the engine and the energy management.

/// Point-in-time record of the storage system as seen from the AC side.
///
/// Produced by the engine each timestep and consumed read-only by operation
/// strategies; immutable once created.
#[derive(Debug, Clone, Copy)]
pub struct SystemState {
    /// Simulation time of the snapshot (s).
    pub time: f64,
    /// AC power realized in the snapshot's timestep (W, charge-positive).
    pub power: f64,
    /// Delivered vs. requested power ratio in [0, 1].
    pub fulfillment: f64,
}

impl SystemState {
    /// Snapshot for the simulation start, before any dispatch has happened.
    pub fn initial(start_time_s: f64) -> Self {
        Self {
            time: start_time_s,
            power: 0.0,
            fulfillment: 1.0,
        }
    }
}

/// Dispatch record of the energy management.
///
/// Mutated once per timestep by the active strategy's `update`; read by the
/// export collaborator and by nothing else.
#[derive(Debug, Clone, Copy)]
pub struct EnergyManagementState {
    /// Current dispatch timestamp (s).
    pub time: f64,
    /// Last power request computed by the strategy (W, charge-positive).
    pub power: f64,
}

impl EnergyManagementState {
    /// Creates the state at simulation start with no request yet.
    pub fn new(start_time_s: f64) -> Self {
        Self {
            time: start_time_s,
            power: 0.0,
        }
    }

    /// Flattened key/value view for the export collaborator.
    pub fn record(&self) -> Vec<(&'static str, f64)> {
        vec![("time_s", self.time), ("power_requested_w", self.power)]
    }
}
