//! Exponential moving average for the primary temperature
//!
//! Single-pole low-pass:
//!
//! ```text
//! y(k) = a * y(k-1) + (1 - a) * x(k)
//! ```
//!
//! For a fixed sample period `T` the smoothing factor relates to the time
//! constant as `a = exp(-T / tau)`, i.e. `tau = -T / ln(a)`.
//!
//! Unavailable samples pass straight through and leave the running value
//! alone, so one bad read never contaminates later output.

use crate::app::reading::Reading;

/// EMA filter state
#[derive(Debug, Clone)]
pub struct ExponentialFilter {
    alpha: f32,
    smoothed: Option<f32>,
}

impl ExponentialFilter {
    /// `alpha` is the weight of the previous output and must lie in (0, 1);
    /// [`SystemConfig::validate`](crate::config::SystemConfig::validate)
    /// enforces this for the configured value.
    pub fn new(alpha: f32) -> Self {
        debug_assert!(alpha > 0.0 && alpha < 1.0, "alpha out of range: {alpha}");
        Self {
            alpha,
            smoothed: None,
        }
    }

    /// Feed one raw sample and return the filter output for this period.
    pub fn update(&mut self, raw: Reading) -> Reading {
        let Reading::Valid(x) = raw else {
            return Reading::Unavailable;
        };

        let y = match self.smoothed {
            // First valid sample seeds the filter.
            None => x,
            Some(prev) => self.alpha * prev + (1.0 - self.alpha) * x,
        };
        self.smoothed = Some(y);
        Reading::Valid(y)
    }

    /// Last smoothed value, `Unavailable` until a valid sample is seen.
    pub fn value(&self) -> Reading {
        self.smoothed.map_or(Reading::Unavailable, Reading::Valid)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Time constant in seconds for samples `period_secs` apart.
    pub fn time_constant_secs(&self, period_secs: f32) -> f32 {
        -period_secs / self.alpha.ln()
    }
}
