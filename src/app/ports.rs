//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService / Scheduler (domain)
//! ```
//!
//! Driven adapters (sensors, status LED, serial link, clock, event sinks)
//! implement these traits. The [`AppService`](super::service::AppService)
//! and [`Scheduler`](crate::scheduler::Scheduler) consume them via generics,
//! so the domain core never touches hardware directly and runs unchanged
//! against the mocks in `tests/`.

use heapless::Vec;

use crate::drivers::indicator::{Brightness, Colour};
use crate::error::CommsError;

use super::reading::{PrimaryReading, Reading};

/// Maximum length of one inbound command line, excluding the terminator.
pub const LINE_CAPACITY: usize = 64;

/// One inbound command line with the terminator stripped.
pub type Line = Vec<u8, LINE_CAPACITY>;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per acquisition cycle.
///
/// Implementations never fail: a driver error or implausible value is
/// reported as [`Reading::Unavailable`] in the corresponding field.
pub trait SensorPort {
    /// Humidity + temperature from the primary sensor. May block for the
    /// sensor's conversion time.
    fn read_primary(&mut self) -> PrimaryReading;

    /// Temperature from the optional secondary probe.
    fn read_secondary(&mut self) -> Reading;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → status LED)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the status LED.
pub trait IndicatorPort {
    /// Latch a colour at the given heartbeat brightness.
    fn push_indicator(&mut self, colour: Colour, brightness: Brightness);
}

// ───────────────────────────────────────────────────────────────
// Line port (driven adapter: serial link ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Line-oriented command transport.
pub trait LinePort {
    /// Return the next complete line, waiting at most `wait_ms` for one to
    /// arrive. `wait_ms == 0` never blocks.
    fn poll_line(&mut self, wait_ms: u32) -> Result<Option<Line>, CommsError>;

    /// Write `line` followed by the line terminator.
    fn write_line(&mut self, line: &str) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond counter. Wraps at `u32::MAX`; callers compare with
/// `wrapping_sub`.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
