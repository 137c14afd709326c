//! DHT22 (AM2302) humidity + temperature sensor.
//!
//! Single-wire, open-drain protocol bit-banged over an `embedded-hal` pin:
//!
//! ```text
//! host:   ‾‾‾\________________/‾‾‾‾‾‾ (release)
//!             ≥ 1.1 ms low
//! sensor:                         \____/‾‾‾‾\__/‾‾‾\__/‾‾‾‾‾‾‾\ ...
//!                                  80µs  80µs  50   26  50   70
//!                                  response    bit 0    bit 1
//! ```
//!
//! 40 data bits, MSB first: humidity ×10 (16 bit), temperature ×10 (sign +
//! 15 bit magnitude), checksum (low byte of the sum of the first four bytes).
//! A bit is 1 when its high pulse outlasts the preceding low pulse.
//!
//! The sensor averages over two seconds and must not be polled faster than
//! that. Calls inside the minimum interval return the cached outcome of the
//! last transaction, so `read_humidity()` followed by `read_temperature()`
//! costs a single transaction.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::debug;

use crate::app::ports::ClockPort;
use crate::error::SensorError;

use super::PrimarySensor;

/// Host start pulse length.
const START_LOW_US: u32 = 1_100;
/// Time from release until the sensor is sampled for its response.
const RELEASE_US: u32 = 55;
/// Longest pulse accepted before declaring a timeout.
const PULSE_TIMEOUT_US: u32 = 1_000;

const HUMIDITY_RANGE: core::ops::RangeInclusive<f32> = 0.0..=100.0;
const TEMPERATURE_RANGE: core::ops::RangeInclusive<f32> = -40.0..=80.0;

/// One decoded DHT22 frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dht22Sample {
    pub humidity: f32,
    pub temperature: f32,
}

/// Decode and sanity-check a raw 5-byte frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<Dht22Sample, SensorError> {
    let sum = frame[..4]
        .iter()
        .fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::Checksum);
    }

    let humidity = u16::from_be_bytes([frame[0], frame[1]]) as f32 / 10.0;
    let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]) as f32 / 10.0;
    let temperature = if frame[2] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };

    if !HUMIDITY_RANGE.contains(&humidity) || !TEMPERATURE_RANGE.contains(&temperature) {
        return Err(SensorError::OutOfRange);
    }
    Ok(Dht22Sample {
        humidity,
        temperature,
    })
}

pub struct Dht22<P, D, C> {
    pin: P,
    delay: D,
    clock: C,
    min_interval_ms: u32,
    last: Option<(u32, Result<Dht22Sample, SensorError>)>,
}

impl<P, D, C> Dht22<P, D, C>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    C: ClockPort,
{
    pub fn new(pin: P, delay: D, clock: C, min_interval_ms: u32) -> Self {
        Self {
            pin,
            delay,
            clock,
            min_interval_ms,
            last: None,
        }
    }

    /// Latest sample, running a bus transaction only when the cached one
    /// is older than the minimum interval.
    pub fn sample(&mut self) -> Result<Dht22Sample, SensorError> {
        let now = self.clock.now_ms();
        if let Some((at, result)) = self.last {
            if now.wrapping_sub(at) < self.min_interval_ms {
                return result;
            }
        }

        let result = self.transaction().and_then(decode_frame);
        if let Err(e) = result {
            debug!("DHT22: read failed ({})", e);
        }
        self.last = Some((now, result));
        result
    }

    fn transaction(&mut self) -> Result<[u8; 5], SensorError> {
        // Start signal.
        self.pin.set_high().map_err(|_| SensorError::Bus)?;
        self.pin.set_low().map_err(|_| SensorError::Bus)?;
        self.delay.delay_us(START_LOW_US);
        self.pin.set_high().map_err(|_| SensorError::Bus)?;
        self.delay.delay_us(RELEASE_US);

        // Response: 80 µs low, 80 µs high, starting 20-200 µs after release.
        self.pulse(true)?;
        self.pulse(false)?;
        self.pulse(true)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            let low = self.pulse(false)?;
            let high = self.pulse(true)?;
            if high > low {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(frame)
    }

    /// Length in microseconds of the pulse at `level` that the line is in
    /// now; zero if the line is already at the other level.
    fn pulse(&mut self, level: bool) -> Result<u32, SensorError> {
        let mut elapsed = 0;
        while self.pin.is_high().map_err(|_| SensorError::Bus)? == level {
            if elapsed >= PULSE_TIMEOUT_US {
                return Err(SensorError::Timeout);
            }
            self.delay.delay_us(1);
            elapsed += 1;
        }
        Ok(elapsed)
    }
}

impl<P, D, C> PrimarySensor for Dht22<P, D, C>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    C: ClockPort,
{
    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        self.sample().map(|s| s.humidity)
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.sample().map(|s| s.temperature)
    }
}
