//! Mock adapters for integration tests.
//!
//! Every port gets a recording double so tests can assert on the full
//! history of LED pushes, replies and events without real peripherals.

use std::cell::Cell;
use std::collections::VecDeque;

use thermobox::app::events::AppEvent;
use thermobox::app::ports::{ClockPort, EventSink, IndicatorPort, Line, LinePort, SensorPort};
use thermobox::app::reading::{PrimaryReading, Reading};
use thermobox::drivers::indicator::{Brightness, Colour};
use thermobox::error::CommsError;

// ── MockHardware ──────────────────────────────────────────────

/// Scripted sensors plus a recording status LED.
///
/// Queued primary readings are consumed one per cycle; once the queue is
/// empty the last reading repeats.
pub struct MockHardware {
    pub primary: VecDeque<PrimaryReading>,
    pub last_primary: PrimaryReading,
    pub secondary: Reading,
    pub pushes: Vec<(Colour, Brightness)>,
    pub cycles: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            primary: VecDeque::new(),
            last_primary: PrimaryReading::default(),
            secondary: Reading::Unavailable,
            pushes: Vec::new(),
            cycles: 0,
        }
    }

    /// Healthy sensors reporting fixed values.
    pub fn healthy(temperature: f32, humidity: f32, secondary: f32) -> Self {
        let mut hw = Self::new();
        hw.last_primary = primary(temperature, humidity);
        hw.secondary = Reading::Valid(secondary);
        hw
    }

    pub fn queue(&mut self, reading: PrimaryReading) -> &mut Self {
        self.primary.push_back(reading);
        self
    }

    pub fn last_push(&self) -> Option<(Colour, Brightness)> {
        self.pushes.last().copied()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_primary(&mut self) -> PrimaryReading {
        self.cycles += 1;
        if let Some(next) = self.primary.pop_front() {
            self.last_primary = next;
        }
        self.last_primary
    }

    fn read_secondary(&mut self) -> Reading {
        self.secondary
    }
}

impl IndicatorPort for MockHardware {
    fn push_indicator(&mut self, colour: Colour, brightness: Brightness) {
        self.pushes.push((colour, brightness));
    }
}

pub fn primary(temperature: f32, humidity: f32) -> PrimaryReading {
    PrimaryReading {
        temperature: Reading::Valid(temperature),
        humidity: Reading::Valid(humidity),
    }
}

pub fn failed_primary() -> PrimaryReading {
    PrimaryReading {
        temperature: Reading::Unavailable,
        humidity: Reading::Unavailable,
    }
}

// ── MockLink ──────────────────────────────────────────────────

/// Line port fed from a queue of inbound lines.
#[derive(Default)]
pub struct MockLink {
    pub inbound: VecDeque<Vec<u8>>,
    pub replies: Vec<String>,
    /// `wait_ms` of every poll, in order.
    pub waits: Vec<u32>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, line: &[u8]) -> &mut Self {
        self.inbound.push_back(line.to_vec());
        self
    }
}

impl LinePort for MockLink {
    fn poll_line(&mut self, wait_ms: u32) -> Result<Option<Line>, CommsError> {
        self.waits.push(wait_ms);
        if self.fail_reads {
            return Err(CommsError::ReadFailed);
        }
        Ok(self
            .inbound
            .pop_front()
            .map(|l| Line::from_slice(&l).expect("test line fits")))
    }

    fn write_line(&mut self, line: &str) -> Result<(), CommsError> {
        if self.fail_writes {
            return Err(CommsError::WriteFailed);
        }
        self.replies.push(line.to_owned());
        Ok(())
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Manually advanced millisecond clock.
#[derive(Default)]
pub struct MockClock {
    now: Cell<u32>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn at(ms: u32) -> Self {
        Self { now: Cell::new(ms) }
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl ClockPort for MockClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comms_faults(&self) -> Vec<CommsError> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::CommsFault(c) => Some(*c),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
