//! Power-electronics conversion between the AC grid side and the DC stack side.

pub mod acdc;
pub mod dcdc;
pub mod efficiency;

pub use acdc::AcDcConverter;
pub use dcdc::DcDcConverter;
pub use efficiency::EfficiencyCurve;

use thiserror::Error;
use tracing::error;

/// Domain errors raised by converter misuse.
///
/// These signal a caller bug, not a physical condition: they are logged and
/// substituted with a safe default so the simulation can continue with
/// degraded fidelity.
#[derive(Debug, Clone, Error)]
pub enum PowerError {
    /// A reverse accessor was called with a power of the wrong sign for the
    /// named conversion direction.
    #[error("{converter}.{accessor} called with {power_w} W, expected {expected} power")]
    WrongSignReverse {
        /// Converter type name.
        converter: &'static str,
        /// Reverse accessor name.
        accessor: &'static str,
        /// Expected sign description (`"positive"` / `"negative"`).
        expected: &'static str,
        /// Offending power value (W).
        power_w: f64,
    },
}

/// The AC/DC + DC/DC conversion chain between grid and stack.
///
/// Stateless per call: each method maps one instantaneous power value to
/// another. Sign convention is charge-positive on both sides: positive power
/// flows into the storage (electrolyzer), negative power flows out of it
/// (fuel cell).
#[derive(Debug, Clone)]
pub struct PowerElectronics {
    acdc: AcDcConverter,
    dcdc: DcDcConverter,
}

impl PowerElectronics {
    /// Creates the conversion chain from its two converter stages.
    pub fn new(acdc: AcDcConverter, dcdc: DcDcConverter) -> Self {
        Self { acdc, dcdc }
    }

    /// Maps a requested AC-side power to the DC power seen by the stack.
    ///
    /// Charging requests shrink by the conversion losses; discharging
    /// requests grow in magnitude, since the stack must produce the losses
    /// on top of the power delivered to the grid.
    pub fn ac_to_dc_request(&self, power_ac_w: f64) -> f64 {
        if power_ac_w > 0.0 {
            self.dcdc.to_dc(self.acdc.to_dc(power_ac_w))
        } else if power_ac_w < 0.0 {
            let intermediate = match self.acdc.to_ac_reverse(power_ac_w) {
                Ok(p) => p,
                Err(e) => {
                    error!("power conversion degraded: {e}");
                    return 0.0;
                }
            };
            match self.dcdc.to_ac_reverse(intermediate) {
                Ok(p) => p,
                Err(e) => {
                    error!("power conversion degraded: {e}");
                    0.0
                }
            }
        } else {
            0.0
        }
    }

    /// Maps the DC power actually realized at the stack back to the AC side.
    ///
    /// For charging this is the AC power drawn from the grid (larger than the
    /// DC power stored); for discharging it is the AC power delivered (smaller
    /// in magnitude than the DC power produced).
    pub fn dc_to_ac_actual(&self, power_dc_w: f64) -> f64 {
        if power_dc_w > 0.0 {
            let intermediate = match self.dcdc.to_dc_reverse(power_dc_w) {
                Ok(p) => p,
                Err(e) => {
                    error!("power conversion degraded: {e}");
                    return 0.0;
                }
            };
            match self.acdc.to_dc_reverse(intermediate) {
                Ok(p) => p,
                Err(e) => {
                    error!("power conversion degraded: {e}");
                    0.0
                }
            }
        } else if power_dc_w < 0.0 {
            self.acdc.to_ac(self.dcdc.to_ac(power_dc_w))
        } else {
            0.0
        }
    }
}
