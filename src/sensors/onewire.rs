//! Dallas/Maxim 1-Wire bus.
//!
//! [`OneWireBus`] is the bit-level bus contract; byte transfers, ROM search
//! and the Dallas CRC-8 are built on top of it. [`OneWirePin`] implements the
//! contract by bit-banging an open-drain `embedded-hal` pin with the standard
//! slot timings (all values in µs):
//!
//! | Slot    | Drive low | Sample at | Slot length |
//! |---------|-----------|-----------|-------------|
//! | Reset   | 480       | 550       | 960         |
//! | Write 1 | 6         | -         | 70          |
//! | Write 0 | 60        | -         | 70          |
//! | Read    | 6         | 15        | 70          |

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use heapless::Vec;

use crate::error::SensorError;

pub const CMD_SEARCH_ROM: u8 = 0xF0;
pub const CMD_MATCH_ROM: u8 = 0x55;
pub const CMD_SKIP_ROM: u8 = 0xCC;

/// Most devices tracked on one bus.
pub const MAX_DEVICES: usize = 4;

/// 64-bit ROM code, family code first, CRC last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rom(pub [u8; 8]);

impl Rom {
    pub fn family(&self) -> u8 {
        self.0[0]
    }

    pub fn is_valid(&self) -> bool {
        self.0 != [0; 8] && crc8(&self.0[..7]) == self.0[7]
    }

    fn bit(&self, n: usize) -> bool {
        self.0[n / 8] & (1 << (n % 8)) != 0
    }

    fn set_bit(&mut self, n: usize, value: bool) {
        if value {
            self.0[n / 8] |= 1 << (n % 8);
        } else {
            self.0[n / 8] &= !(1 << (n % 8));
        }
    }
}

/// Result of one search step: the two read slots and the branch taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triplet {
    pub id_bit: bool,
    pub cmp_bit: bool,
    pub direction: bool,
}

/// Bit-level 1-Wire master. Bytes go LSB first.
pub trait OneWireBus {
    /// Issue a reset pulse. `Ok(true)` if at least one device answered.
    fn reset(&mut self) -> Result<bool, SensorError>;
    fn write_bit(&mut self, bit: bool) -> Result<(), SensorError>;
    fn read_bit(&mut self) -> Result<bool, SensorError>;

    fn write_byte(&mut self, byte: u8) -> Result<(), SensorError> {
        for i in 0..8 {
            self.write_bit(byte & (1 << i) != 0)?;
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, SensorError> {
        let mut byte = 0;
        for i in 0..8 {
            if self.read_bit()? {
                byte |= 1 << i;
            }
        }
        Ok(byte)
    }

    /// One ROM search step: read the bit and its complement, then write the
    /// branch to follow (`preferred` when both values are present).
    fn triplet(&mut self, preferred: bool) -> Result<Triplet, SensorError> {
        let id_bit = self.read_bit()?;
        let cmp_bit = self.read_bit()?;
        let direction = if id_bit == cmp_bit { preferred } else { id_bit };
        self.write_bit(direction)?;
        Ok(Triplet {
            id_bit,
            cmp_bit,
            direction,
        })
    }

    /// Reset and address one device, or all of them with `None`.
    fn select(&mut self, rom: Option<&Rom>) -> Result<(), SensorError> {
        if !self.reset()? {
            return Err(SensorError::NoDevice);
        }
        match rom {
            Some(rom) => {
                self.write_byte(CMD_MATCH_ROM)?;
                for b in rom.0 {
                    self.write_byte(b)?;
                }
            }
            None => self.write_byte(CMD_SKIP_ROM)?,
        }
        Ok(())
    }
}

/// Enumerate every device on the bus (binary tree search).
///
/// ROMs with a bad CRC are dropped; at most [`MAX_DEVICES`] are returned.
pub fn search<B: OneWireBus + ?Sized>(bus: &mut B) -> Result<Vec<Rom, MAX_DEVICES>, SensorError> {
    let mut found = Vec::new();
    let mut rom = Rom([0; 8]);
    let mut last_discrepancy = 0usize;

    loop {
        if !bus.reset()? {
            break;
        }
        bus.write_byte(CMD_SEARCH_ROM)?;

        let mut last_zero = 0usize;
        for n in 1..=64 {
            let preferred = if n < last_discrepancy {
                rom.bit(n - 1)
            } else {
                n == last_discrepancy
            };
            let t = bus.triplet(preferred)?;
            if t.id_bit && t.cmp_bit {
                // Nobody answered this slot.
                return Ok(found);
            }
            if !t.id_bit && !t.cmp_bit && !t.direction {
                last_zero = n;
            }
            rom.set_bit(n - 1, t.direction);
        }

        if rom.is_valid() && found.push(rom).is_err() {
            break;
        }
        last_discrepancy = last_zero;
        if last_discrepancy == 0 {
            break;
        }
    }
    Ok(found)
}

/// Dallas/Maxim CRC-8 (polynomial x^8 + x^5 + x^4 + 1, reflected).
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut b = byte;
        for _ in 0..8 {
            let mix = (crc ^ b) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            b >>= 1;
        }
    }
    crc
}

/// Bit-banged bus on an open-drain pin: `set_low` drives, `set_high`
/// releases to the pull-up.
pub struct OneWirePin<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> OneWirePin<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(mut pin: P, delay: D) -> Self {
        let _ = pin.set_high();
        Self { pin, delay }
    }

    fn drive_low(&mut self) -> Result<(), SensorError> {
        self.pin.set_low().map_err(|_| SensorError::Bus)
    }

    fn release(&mut self) -> Result<(), SensorError> {
        self.pin.set_high().map_err(|_| SensorError::Bus)
    }

    fn sample(&mut self) -> Result<bool, SensorError> {
        self.pin.is_high().map_err(|_| SensorError::Bus)
    }
}

impl<P, D> OneWireBus for OneWirePin<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn reset(&mut self) -> Result<bool, SensorError> {
        self.release()?;
        if !self.sample()? {
            // Line held low: shorted or stuck.
            return Err(SensorError::Bus);
        }
        self.drive_low()?;
        self.delay.delay_us(480);
        self.release()?;
        self.delay.delay_us(70);
        let present = !self.sample()?;
        self.delay.delay_us(410);
        Ok(present)
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), SensorError> {
        self.drive_low()?;
        if bit {
            self.delay.delay_us(6);
            self.release()?;
            self.delay.delay_us(64);
        } else {
            self.delay.delay_us(60);
            self.release()?;
            self.delay.delay_us(10);
        }
        Ok(())
    }

    fn read_bit(&mut self) -> Result<bool, SensorError> {
        self.drive_low()?;
        self.delay.delay_us(6);
        self.release()?;
        self.delay.delay_us(9);
        let bit = self.sample()?;
        self.delay.delay_us(55);
        Ok(bit)
    }
}
