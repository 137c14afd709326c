//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them; on the device they become log lines.

use crate::drivers::indicator::{IndicatorState, Status};
use crate::error::CommsError;

use super::commands::AppCommand;
use super::telemetry::TelemetrySnapshot;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The service pushed the start-up indicator and is ready to run.
    Started {
        period_ms: u32,
        time_constant_secs: f32,
    },

    /// One acquisition cycle completed.
    Acquired {
        snapshot: TelemetrySnapshot,
        indicator: IndicatorState,
    },

    /// Instrument health changed between cycles.
    StatusChanged { from: Status, to: Status },

    /// A command line was answered.
    CommandHandled(AppCommand),

    /// The serial link failed; the loop carries on.
    CommsFault(CommsError),
}
