//! Shared test fixtures for integration tests.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use hess_sim::config::ScenarioConfig;
use hess_sim::ems::EnergyManagement;
use hess_sim::ems::strategy::PowerFollower;
use hess_sim::hydrogen::HydrogenFactory;
use hess_sim::io::export::DataSink;
use hess_sim::power::{AcDcConverter, DcDcConverter, PowerElectronics};
use hess_sim::profile::SequenceProfile;
use hess_sim::sim::engine::Engine;
use hess_sim::sim::types::SimConfig;

/// Record sink whose captured records stay inspectable after the sink has
/// been moved into an engine.
#[derive(Default, Clone)]
pub struct SharedSink {
    records: Rc<RefCell<Vec<Vec<(String, f64)>>>>,
}

impl SharedSink {
    pub fn records(&self) -> Vec<Vec<(String, f64)>> {
        self.records.borrow().clone()
    }
}

impl DataSink for SharedSink {
    fn transfer_data(&mut self, record: &[(&'static str, f64)]) -> io::Result<()> {
        self.records
            .borrow_mut()
            .push(record.iter().map(|(k, v)| (k.to_string(), *v)).collect());
        Ok(())
    }
}

/// Baseline scenario shortened to a quick, test-friendly horizon.
pub fn quick_scenario(steps: usize, timestep_s: f64) -> ScenarioConfig {
    let mut cfg = ScenarioConfig::baseline();
    cfg.simulation.steps = steps;
    cfg.simulation.timestep_s = timestep_s;
    cfg
}

/// Default power-electronics chain matching the baseline configuration.
pub fn default_power_electronics() -> PowerElectronics {
    let acdc = AcDcConverter::with_fixed_efficiency(0.95, 50_000.0).expect("valid efficiency");
    let dcdc = DcDcConverter::new(0.98).expect("valid efficiency");
    PowerElectronics::new(acdc, dcdc)
}

/// Engine following a fixed AC power sequence, one value per second.
///
/// Returns the engine together with the shared sink capturing its exports.
pub fn scripted_engine(power_sequence_w: Vec<f64>, timestep_s: f64) -> (Engine, SharedSink) {
    let steps = power_sequence_w.len();
    let scenario = ScenarioConfig::baseline();

    let profile = SequenceProfile::new(power_sequence_w, timestep_s);
    let ems = EnergyManagement::new(Box::new(PowerFollower::new(Box::new(profile))), 0.0);
    let hydrogen = HydrogenFactory::create_system(&scenario).expect("baseline system builds");

    let sink = SharedSink::default();
    let engine = Engine::new(
        SimConfig::new(timestep_s, steps, 0.0, 42),
        ems,
        default_power_electronics(),
        hydrogen,
        Box::new(sink.clone()),
    );
    (engine, sink)
}
