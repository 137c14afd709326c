//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (the ESP-IDF console in production). Per-cycle events
//! go out at debug level so the default console stays readable at 1 Hz.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::drivers::indicator::Status;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                period_ms,
                time_constant_secs,
            } => {
                info!(
                    "START | period={}ms | filter tau={:.1}s",
                    period_ms, time_constant_secs
                );
            }
            AppEvent::Acquired {
                snapshot,
                indicator,
            } => {
                debug!(
                    "CYCLE | #{} | T={}\u{00b0}C | RH={}% | probe={}\u{00b0}C | {:?}/{:?}",
                    snapshot.tick_count,
                    snapshot.primary_temp_filtered.fixed(3),
                    snapshot.humidity.fixed(1),
                    snapshot.secondary_temp.fixed(2),
                    indicator.colour(),
                    indicator.brightness,
                );
            }
            AppEvent::StatusChanged { from, to } => {
                if *to == Status::Faulted {
                    warn!("STATUS | {:?} -> {:?}", from, to);
                } else {
                    info!("STATUS | {:?} -> {:?}", from, to);
                }
            }
            AppEvent::CommandHandled(cmd) => {
                debug!("CMD | {:?}", cmd);
            }
            AppEvent::CommsFault(e) => {
                warn!("COMMS | {}", e);
            }
        }
    }
}
