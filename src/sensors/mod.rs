//! Sensor subsystem: individual drivers and the normalising [`SensorHub`].
//!
//! Drivers report errors in their own terms (`Result`, sentinel values).
//! The hub turns every failure into [`Reading::Unavailable`] so the domain
//! never sees a driver error or an out-of-range number.
//!
//! ```text
//!   Dht22 ──────┐
//!               ├──▶ SensorHub ──▶ PrimaryReading / Reading
//!   Ds18b20 ────┘
//! ```

pub mod dht22;
pub mod ds18b20;
pub mod onewire;

use log::debug;

use crate::app::reading::{PrimaryReading, Reading};
use crate::error::SensorError;

/// Humidity + temperature sensor.
pub trait PrimarySensor {
    /// Relative humidity in percent.
    fn read_humidity(&mut self) -> Result<f32, SensorError>;
    /// Air temperature in °C.
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
}

/// Addressable temperature probe on a shared bus.
pub trait SecondarySensor {
    /// Start a conversion on every probe and wait until it completes.
    fn request_conversion(&mut self) -> Result<(), SensorError>;
    /// Temperature of the probe at `index` in °C, or the driver's
    /// disconnected sentinel.
    fn read_temperature(&mut self, index: u8) -> f32;
}

/// Owns the sensor drivers and normalises their output.
pub struct SensorHub<P, S> {
    pub primary: P,
    pub secondary: S,
    probe_disconnected_below_c: f32,
}

impl<P, S> SensorHub<P, S>
where
    P: PrimarySensor,
    S: SecondarySensor,
{
    pub fn new(primary: P, secondary: S, probe_disconnected_below_c: f32) -> Self {
        Self {
            primary,
            secondary,
            probe_disconnected_below_c,
        }
    }

    /// Humidity first, then temperature. Each field fails independently.
    pub fn read_primary(&mut self) -> PrimaryReading {
        let humidity = match self.primary.read_humidity() {
            Ok(h) => Reading::from_raw(h),
            Err(e) => {
                debug!("Primary humidity unavailable: {}", e);
                Reading::Unavailable
            }
        };
        let temperature = match self.primary.read_temperature() {
            Ok(t) => Reading::from_raw(t),
            Err(e) => {
                debug!("Primary temperature unavailable: {}", e);
                Reading::Unavailable
            }
        };
        PrimaryReading {
            temperature,
            humidity,
        }
    }

    /// First probe on the bus. Values below the disconnect threshold are
    /// the driver's "no device" sentinel and map to `Unavailable`.
    pub fn read_secondary(&mut self) -> Reading {
        if let Err(e) = self.secondary.request_conversion() {
            debug!("Secondary conversion request failed: {}", e);
        }
        let celsius = self.secondary.read_temperature(0);
        if celsius < self.probe_disconnected_below_c {
            return Reading::Unavailable;
        }
        Reading::from_raw(celsius)
    }
}
