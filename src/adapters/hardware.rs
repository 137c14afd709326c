//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the status LED, exposing them through
//! [`SensorPort`] and [`IndicatorPort`]. Everything below is generic over
//! `embedded-hal` traits, so the same adapter runs on the device and
//! against simulated buses in tests.

use embedded_hal::spi::SpiBus;
use log::warn;

use crate::app::ports::{IndicatorPort, SensorPort};
use crate::app::reading::{PrimaryReading, Reading};
use crate::config::SystemConfig;
use crate::drivers::dotstar::DotStar;
use crate::drivers::indicator::{Brightness, Colour};
use crate::sensors::{PrimarySensor, SecondarySensor, SensorHub};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P, S, SPI> {
    sensor_hub: SensorHub<P, S>,
    led: DotStar<SPI>,
    led_dim: u8,
    led_bright: u8,
}

impl<P, S, SPI> HardwareAdapter<P, S, SPI>
where
    P: PrimarySensor,
    S: SecondarySensor,
    SPI: SpiBus,
{
    pub fn new(sensor_hub: SensorHub<P, S>, led: DotStar<SPI>, config: &SystemConfig) -> Self {
        Self {
            sensor_hub,
            led,
            led_dim: config.led_dim,
            led_bright: config.led_bright,
        }
    }

    pub fn led(&self) -> &DotStar<SPI> {
        &self.led
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P, S, SPI> SensorPort for HardwareAdapter<P, S, SPI>
where
    P: PrimarySensor,
    S: SecondarySensor,
    SPI: SpiBus,
{
    fn read_primary(&mut self) -> PrimaryReading {
        self.sensor_hub.read_primary()
    }

    fn read_secondary(&mut self) -> Reading {
        self.sensor_hub.read_secondary()
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<P, S, SPI> IndicatorPort for HardwareAdapter<P, S, SPI>
where
    P: PrimarySensor,
    S: SecondarySensor,
    SPI: SpiBus,
{
    fn push_indicator(&mut self, colour: Colour, brightness: Brightness) {
        let level = brightness.level(self.led_dim, self.led_bright);
        if let Err(e) = self.led.show(colour.rgb(), level) {
            warn!("Status LED write failed: {:?}", e);
        }
    }
}
