//! Per-period telemetry snapshot.

use super::reading::Reading;

/// The values reported by the telemetry command.
///
/// Produced once per acquisition cycle and replaced wholesale; there are no
/// partial-field updates. Before the first cycle every reading is
/// `Unavailable` and the tick count is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TelemetrySnapshot {
    /// Completed acquisition cycles since start.
    pub tick_count: u32,
    /// Exponentially smoothed primary temperature (Celsius).
    pub primary_temp_filtered: Reading,
    /// Relative humidity (%).
    pub humidity: Reading,
    /// Secondary probe temperature (Celsius).
    pub secondary_temp: Reading,
}
