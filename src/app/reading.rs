//! Sensor reading values.
//!
//! A failed or implausible sensor read is carried through the pipeline as
//! [`Reading::Unavailable`] rather than as a floating-point NaN. The NaN text
//! only appears at the protocol edge, when a reply line is formatted.

use core::fmt;

/// A single sensor value, or the marker that none could be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Reading {
    /// A finite measurement.
    Valid(f32),
    /// The sensor failed or reported an implausible value.
    #[default]
    Unavailable,
}

impl Reading {
    /// Wrap a raw driver value; NaN and infinities become `Unavailable`.
    pub fn from_raw(value: f32) -> Self {
        if value.is_finite() {
            Self::Valid(value)
        } else {
            Self::Unavailable
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn is_unavailable(self) -> bool {
        !self.is_valid()
    }

    pub fn value(self) -> Option<f32> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Unavailable => None,
        }
    }

    /// The value as a float, with NaN standing in for `Unavailable`.
    pub fn to_f32_or_nan(self) -> f32 {
        self.value().unwrap_or(f32::NAN)
    }

    /// Fixed-point display with `digits` decimals.
    pub fn fixed(self, digits: usize) -> Fixed {
        Fixed {
            reading: self,
            digits,
        }
    }
}

/// Display adapter produced by [`Reading::fixed`].
#[derive(Debug, Clone, Copy)]
pub struct Fixed {
    reading: Reading,
    digits: usize,
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", self.digits, self.reading.to_f32_or_nan())
    }
}

/// One transaction with the primary (humidity + temperature) sensor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PrimaryReading {
    pub temperature: Reading,
    pub humidity: Reading,
}

impl PrimaryReading {
    /// True if either field failed; drives the Faulted indicator.
    pub fn has_error(&self) -> bool {
        self.temperature.is_unavailable() || self.humidity.is_unavailable()
    }
}
