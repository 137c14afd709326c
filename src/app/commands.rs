//! Inbound commands to the application service.
//!
//! The serial protocol has exactly one named command; every other line,
//! including empty and non-UTF-8 ones, asks for telemetry.

/// Literal the host sends to identify the device.
pub const IDENTIFY: &[u8] = b"id?";

/// Commands the serial link can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Reply with the configured identification string.
    Identify,
    /// Reply with the latest telemetry snapshot.
    Telemetry,
}

impl AppCommand {
    /// Exact, case-sensitive whole-line match. Never fails.
    pub fn parse(line: &[u8]) -> Self {
        if line == IDENTIFY {
            Self::Identify
        } else {
            Self::Telemetry
        }
    }
}
