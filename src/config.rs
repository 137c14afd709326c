//! System configuration parameters
//!
//! All tunable parameters for the thermobox monitor. There is no persistent
//! store; the defaults below are the deployed values and are validated once
//! at start-up.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Capacity of the identification string returned for `id?`.
pub const DEVICE_ID_CAPACITY: usize = 32;

/// Identification string the host-side controller matches on.
pub const DEFAULT_DEVICE_ID: &str = "Arduino, E. coli sauna";

/// How the scheduler waits for serial input between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitStrategy {
    /// Poll the serial link without blocking on every iteration.
    BusyPoll,
    /// Block on the serial link until a line arrives or the next tick is due.
    UntilDeadline,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Timing ---
    /// Acquisition period (milliseconds)
    pub update_period_ms: u32,
    /// Minimum interval between DHT22 transactions (milliseconds)
    pub primary_min_interval_ms: u32,
    /// Scheduler idle behaviour between ticks
    pub wait_strategy: WaitStrategy,

    // --- Filter ---
    /// Weight of the previous smoothed value, strictly between 0 and 1
    pub smoothing_factor: f32,

    // --- Secondary probe ---
    /// Probe readings below this (Celsius) are treated as disconnected
    pub probe_disconnected_below_c: f32,

    // --- Status LED ---
    /// Brightness for the dim heartbeat phase (0-255)
    pub led_dim: u8,
    /// Brightness for the bright heartbeat phase (0-255)
    pub led_bright: u8,

    // --- Serial ---
    /// UART baud rate
    pub baud_rate: u32,
    /// Reply to the `id?` command
    pub device_id: String<DEVICE_ID_CAPACITY>,

    // --- Safety ---
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut device_id = String::new();
        // DEFAULT_DEVICE_ID is shorter than DEVICE_ID_CAPACITY.
        let _ = device_id.push_str(DEFAULT_DEVICE_ID);

        Self {
            // Timing
            update_period_ms: 1000, // 1 Hz
            primary_min_interval_ms: 2000,
            wait_strategy: WaitStrategy::UntilDeadline,

            // Filter: at 1 Hz this is a time constant of ~20 s
            smoothing_factor: 0.95,

            // DS18B20 reports -127 C for a disconnected probe
            probe_disconnected_below_c: -126.0,

            // Status LED
            led_dim: 50,
            led_bright: 80,

            // Serial
            baud_rate: 9600,
            device_id,

            // Safety
            watchdog_timeout_ms: 10_000,
        }
    }
}

impl SystemConfig {
    /// Reject values the acquisition loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.update_period_ms == 0 {
            return Err(Error::Config("update_period_ms must be non-zero"));
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor < 1.0) {
            return Err(Error::Config("smoothing_factor must be in (0, 1)"));
        }
        if !self.probe_disconnected_below_c.is_finite() {
            return Err(Error::Config("probe_disconnected_below_c must be finite"));
        }
        if self.led_dim > self.led_bright {
            return Err(Error::Config("led_dim must not exceed led_bright"));
        }
        if self.baud_rate == 0 {
            return Err(Error::Config("baud_rate must be non-zero"));
        }
        if self.device_id.is_empty() {
            return Err(Error::Config("device_id must not be empty"));
        }
        if self.watchdog_timeout_ms <= self.update_period_ms {
            return Err(Error::Config(
                "watchdog_timeout_ms must exceed update_period_ms",
            ));
        }
        Ok(())
    }

    /// Acquisition period in seconds.
    pub fn period_secs(&self) -> f32 {
        self.update_period_ms as f32 / 1000.0
    }

    /// Render the configuration as a single JSON line for the boot log.
    pub fn to_json(&self) -> Result<std::string::String> {
        serde_json::to_string(self).map_err(|_| Error::Config("serialisation failed"))
    }
}
