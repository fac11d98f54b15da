//! Energy management: dispatch entry point, operation strategies, and the
//! state records they maintain.

pub mod management;
pub mod state;
pub mod strategy;

pub use management::EnergyManagement;
pub use state::{EnergyManagementState, SystemState};
pub use strategy::{
    FrequencyContainment, OperationStrategy, PeakShaving, PowerFollower, build_strategy,
};
