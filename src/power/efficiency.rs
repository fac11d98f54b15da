//! One-dimensional interpolated efficiency lookup for measured converter and
//! pump characteristics.

use tracing::warn;

use crate::config::ConfigError;

/// Measured efficiency-vs-load curve with linear interpolation.
///
/// Lookups outside the characterized domain clamp the efficiency to 1.0 and
/// emit a diagnostic rather than extrapolating: continuing with an ideal
/// converter is a visible, bounded degradation while an extrapolated
/// efficiency could leave [0, 1].
#[derive(Debug, Clone)]
pub struct EfficiencyCurve {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl EfficiencyCurve {
    /// Builds a curve from `(load, efficiency)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the table is empty, loads are not strictly
    /// increasing, or any efficiency lies outside [0, 1].
    pub fn new(points: &[[f64; 2]]) -> Result<Self, ConfigError> {
        if points.is_empty() {
            return Err(ConfigError::new("efficiency_table", "must not be empty"));
        }
        for pair in points.windows(2) {
            if pair[1][0] <= pair[0][0] {
                return Err(ConfigError::new(
                    "efficiency_table",
                    "load values must be strictly increasing",
                ));
            }
        }
        for p in points {
            if !(0.0..=1.0).contains(&p[1]) {
                return Err(ConfigError::new(
                    "efficiency_table",
                    format!("efficiency {} out of [0, 1]", p[1]),
                ));
            }
        }
        Ok(Self {
            xs: points.iter().map(|p| p[0]).collect(),
            ys: points.iter().map(|p| p[1]).collect(),
        })
    }

    /// Returns the interpolated efficiency at `x`.
    ///
    /// Out-of-domain lookups clamp to 1.0 and log a warning.
    pub fn at(&self, x: f64) -> f64 {
        let first = self.xs[0];
        let last = *self.xs.last().unwrap_or(&first);
        if x < first || x > last {
            warn!(
                lookup = x,
                domain_min = first,
                domain_max = last,
                "efficiency lookup outside characterized range, using 1.0"
            );
            return 1.0;
        }

        // Find the bracketing segment; xs is strictly increasing.
        let idx = match self.xs.iter().position(|&xi| xi >= x) {
            Some(0) | None => return self.ys[0],
            Some(i) => i,
        };
        let (x0, x1) = (self.xs[idx - 1], self.xs[idx]);
        let (y0, y1) = (self.ys[idx - 1], self.ys[idx]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}
