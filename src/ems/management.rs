//! Energy-management dispatch entry point.

use tracing::error;

use crate::ems::state::{EnergyManagementState, SystemState};
use crate::ems::strategy::OperationStrategy;
use crate::io::export::DataSink;

/// Single entry point translating a strategy decision into a power request
/// and recording it.
pub struct EnergyManagement {
    strategy: Box<dyn OperationStrategy>,
    state: EnergyManagementState,
}

impl EnergyManagement {
    /// Creates the management over a strategy, with the state seeded at the
    /// simulation start time.
    pub fn new(strategy: Box<dyn OperationStrategy>, start_time_s: f64) -> Self {
        Self {
            strategy,
            state: EnergyManagementState::new(start_time_s),
        }
    }

    /// Computes the power request for this timestep (W, charge-positive).
    ///
    /// Delegates to the strategy, then lets it update the management state
    /// in place. Strategy failures would propagate unmodified; no silent
    /// defaulting happens here.
    pub fn next(&mut self, time_s: f64, system_state: &SystemState, power_offset_w: f64) -> f64 {
        let power_w = self.strategy.next(time_s, system_state, power_offset_w);
        self.strategy.update(&mut self.state);
        power_w
    }

    /// Stamps `time_s` onto the state and forwards it, together with the
    /// technology snapshot, to the export collaborator.
    ///
    /// Side effect only: export failures are logged and never roll back the
    /// state already computed for this timestep.
    pub fn export(
        &mut self,
        time_s: f64,
        technology_record: &[(&'static str, f64)],
        sink: &mut dyn DataSink,
    ) {
        self.state.time = time_s;
        let mut record = self.state.record();
        record.extend_from_slice(technology_record);
        if let Err(e) = sink.transfer_data(&record) {
            error!("data export failed, continuing without rollback: {e}");
        }
    }

    /// Current management state.
    pub fn state(&self) -> &EnergyManagementState {
        &self.state
    }

    /// Name of the active strategy.
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ems::strategy::PowerFollower;
    use crate::io::export::MemorySink;
    use crate::profile::SequenceProfile;

    fn management() -> EnergyManagement {
        let profile = SequenceProfile::new(vec![1000.0, 2000.0], 1.0);
        EnergyManagement::new(Box::new(PowerFollower::new(Box::new(profile))), 0.0)
    }

    #[test]
    fn next_returns_strategy_decision_and_updates_state() {
        let mut ems = management();
        let state = SystemState::initial(0.0);
        let power = ems.next(0.0, &state, 0.0);
        assert_eq!(power, 1000.0);
        assert_eq!(ems.state().power, 1000.0);
    }

    #[test]
    fn export_stamps_time_and_forwards_the_record() {
        let mut ems = management();
        let state = SystemState::initial(0.0);
        ems.next(0.0, &state, 0.0);

        let mut sink = MemorySink::default();
        ems.export(42.0, &[("soc", 0.5)], &mut sink);

        assert_eq!(ems.state().time, 42.0);
        assert_eq!(sink.records.len(), 1);
        let record = &sink.records[0];
        assert!(record.contains(&("time_s".to_string(), 42.0)));
        assert!(record.contains(&("power_requested_w".to_string(), 1000.0)));
        assert!(record.contains(&("soc".to_string(), 0.5)));
    }

    #[test]
    fn export_failure_is_swallowed_without_rollback() {
        let mut ems = management();
        let state = SystemState::initial(0.0);
        ems.next(0.0, &state, 0.0);

        let mut sink = crate::io::export::FailingSink;
        ems.export(7.0, &[], &mut sink);

        // The failed transfer still stamped the time and kept the decision.
        assert_eq!(ems.state().time, 7.0);
        assert_eq!(ems.state().power, 1000.0);
    }

    #[test]
    fn export_does_not_alter_the_dispatch_decision() {
        let mut ems = management();
        let state = SystemState::initial(0.0);
        ems.next(0.0, &state, 0.0);
        let power_before = ems.state().power;

        let mut sink = MemorySink::default();
        ems.export(1.0, &[], &mut sink);
        assert_eq!(ems.state().power, power_before);
    }
}
