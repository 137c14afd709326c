//! DS18B20 digital thermometer on a 1-Wire bus.
//!
//! Probes are discovered by ROM search and addressed by their position in
//! discovery order. A conversion is started on every probe at once (Skip
//! ROM) and takes up to 750 ms at 12-bit resolution; each probe is then
//! read individually (Match ROM + Read Scratchpad).
//!
//! Scratchpad layout:
//!
//! | Byte | Content                      |
//! |------|------------------------------|
//! | 0–1  | temperature, LSB first, 1/16 °C |
//! | 2–3  | alarm thresholds             |
//! | 4    | configuration (resolution)   |
//! | 5–7  | reserved                     |
//! | 8    | CRC-8 of bytes 0–7           |

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use log::{debug, info};

use crate::error::SensorError;

use super::SecondarySensor;
use super::onewire::{self, MAX_DEVICES, OneWireBus, Rom, crc8};

/// Returned by [`Ds18b20::read_temperature`] when the probe cannot be read.
pub const DEVICE_DISCONNECTED_C: f32 = -127.0;

const CMD_CONVERT_T: u8 = 0x44;
const CMD_READ_SCRATCHPAD: u8 = 0xBE;

/// Worst-case conversion time (12-bit).
const CONVERSION_MS: u32 = 750;

/// DS18B20, DS1822 and MAX31850 share the scratchpad format.
const SUPPORTED_FAMILIES: [u8; 3] = [0x28, 0x22, 0x3B];

pub struct Ds18b20<B, D> {
    bus: B,
    delay: D,
    roms: Vec<Rom, MAX_DEVICES>,
}

impl<B, D> Ds18b20<B, D>
where
    B: OneWireBus,
    D: DelayNs,
{
    pub fn new(bus: B, delay: D) -> Self {
        Self {
            bus,
            delay,
            roms: Vec::new(),
        }
    }

    /// Search the bus and remember every supported probe.
    pub fn begin(&mut self) -> Result<usize, SensorError> {
        self.rescan()?;
        Ok(self.roms.len())
    }

    /// Re-run the ROM search. `Ok(true)` if the probe count changed; only
    /// then is it logged, so an empty bus stays quiet.
    fn rescan(&mut self) -> Result<bool, SensorError> {
        let before = self.roms.len();
        self.roms = onewire::search(&mut self.bus)?
            .into_iter()
            .filter(|rom| SUPPORTED_FAMILIES.contains(&rom.family()))
            .collect();
        let changed = self.roms.len() != before;
        if changed {
            info!("DS18B20: {} probe(s) on bus", self.roms.len());
        }
        Ok(changed)
    }

    pub fn device_count(&self) -> usize {
        self.roms.len()
    }

    pub fn rom(&self, index: u8) -> Option<&Rom> {
        self.roms.get(usize::from(index))
    }

    fn read_celsius(&mut self, index: u8) -> Result<f32, SensorError> {
        if usize::from(index) >= self.roms.len() {
            // Probe may have been plugged in since the last search.
            self.rescan()?;
        }
        let rom = *self.rom(index).ok_or(SensorError::NoDevice)?;

        self.bus.select(Some(&rom))?;
        self.bus.write_byte(CMD_READ_SCRATCHPAD)?;
        let mut pad = [0u8; 9];
        for b in &mut pad {
            *b = self.bus.read_byte()?;
        }
        decode_scratchpad(&pad)
    }
}

/// Temperature in °C from a raw scratchpad.
pub fn decode_scratchpad(pad: &[u8; 9]) -> Result<f32, SensorError> {
    if pad.iter().all(|b| *b == 0) || pad.iter().all(|b| *b == 0xFF) {
        return Err(SensorError::NoDevice);
    }
    if crc8(&pad[..8]) != pad[8] {
        return Err(SensorError::Checksum);
    }

    let raw = i16::from_le_bytes([pad[0], pad[1]]);
    // Low bits are undefined below 12-bit resolution.
    let raw = match pad[4] & 0x60 {
        0x00 => raw & !0x7,
        0x20 => raw & !0x3,
        0x40 => raw & !0x1,
        _ => raw,
    };
    Ok(f32::from(raw) / 16.0)
}

impl<B, D> SecondarySensor for Ds18b20<B, D>
where
    B: OneWireBus,
    D: DelayNs,
{
    fn request_conversion(&mut self) -> Result<(), SensorError> {
        self.bus.select(None)?;
        self.bus.write_byte(CMD_CONVERT_T)?;
        self.delay.delay_ms(CONVERSION_MS);
        Ok(())
    }

    fn read_temperature(&mut self, index: u8) -> f32 {
        self.read_celsius(index).unwrap_or_else(|e| {
            debug!("DS18B20[{}]: {}", index, e);
            DEVICE_DISCONNECTED_C
        })
    }
}
