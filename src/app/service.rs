//! Application service: the hexagonal core.
//!
//! [`AppService`] owns every piece of state that survives between cycles:
//! the exponential filter, the heartbeat phase, the last indicator state,
//! the tick counter and the latest telemetry snapshot. All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!   SensorPort ──▶ ┌───────────────────────────┐ ──▶ EventSink
//!                  │        AppService         │
//! IndicatorPort ◀──│  EMA · Heartbeat · Status │
//!                  └───────────────────────────┘
//!                        ▲             │
//!                   Line │             ▼ Reply
//! ```

use log::{debug, info};

use crate::config::SystemConfig;
use crate::control::ema::ExponentialFilter;
use crate::drivers::indicator::{Heartbeat, IndicatorState};
use crate::protocol::codec::{self, Reply};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{EventSink, IndicatorPort, SensorPort};
use super::telemetry::TelemetrySnapshot;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: SystemConfig,
    filter: ExponentialFilter,
    heartbeat: Heartbeat,
    /// Last state pushed to the LED; `None` before [`start`](Self::start).
    indicator: Option<IndicatorState>,
    snapshot: TelemetrySnapshot,
}

impl AppService {
    /// Construct the service from a validated configuration.
    ///
    /// Nothing is pushed to the hardware until [`start`](Self::start).
    pub fn new(config: SystemConfig) -> Self {
        let filter = ExponentialFilter::new(config.smoothing_factor);
        Self {
            config,
            filter,
            heartbeat: Heartbeat::new(),
            indicator: None,
            snapshot: TelemetrySnapshot::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Show the start-up colour once, before the first cycle.
    pub fn start(&mut self, hw: &mut impl IndicatorPort, sink: &mut impl EventSink) {
        let state = IndicatorState::INITIALIZING;
        hw.push_indicator(state.colour(), state.brightness);
        self.indicator = Some(state);

        let time_constant_secs = self.filter.time_constant_secs(self.config.period_secs());
        sink.emit(&AppEvent::Started {
            period_ms: self.config.update_period_ms,
            time_constant_secs,
        });
        info!(
            "AppService started (period {} ms, filter tau {:.1} s)",
            self.config.update_period_ms, time_constant_secs
        );
    }

    // ── Per-period acquisition ────────────────────────────────

    /// Run one acquisition cycle: read sensors → filter → indicator → LED.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`IndicatorPort`]; this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn acquire(
        &mut self,
        hw: &mut (impl SensorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) -> TelemetrySnapshot {
        // 1. Sensors
        let primary = hw.read_primary();
        let secondary = hw.read_secondary();

        // 2. Filter
        let filtered = self.filter.update(primary.temperature);

        // 3. Indicator, pushed every cycle even when unchanged
        let state = IndicatorState::update(primary.has_error(), self.heartbeat.advance());
        hw.push_indicator(state.colour(), state.brightness);

        if let Some(prev) = self.indicator {
            if prev.status != state.status {
                sink.emit(&AppEvent::StatusChanged {
                    from: prev.status,
                    to: state.status,
                });
            }
        }
        self.indicator = Some(state);

        // 4. Publish the snapshot
        self.snapshot = TelemetrySnapshot {
            tick_count: self.snapshot.tick_count.wrapping_add(1),
            primary_temp_filtered: filtered,
            humidity: primary.humidity,
            secondary_temp: secondary,
        };
        sink.emit(&AppEvent::Acquired {
            snapshot: self.snapshot,
            indicator: state,
        });
        self.snapshot
    }

    // ── Command handling ──────────────────────────────────────

    /// Answer one inbound line. Every line gets a reply.
    pub fn handle_line(&mut self, line: &[u8], sink: &mut impl EventSink) -> Reply {
        let cmd = AppCommand::parse(line);
        debug!("Command {:?} ({} bytes)", cmd, line.len());
        let reply = self.reply(cmd);
        sink.emit(&AppEvent::CommandHandled(cmd));
        reply
    }

    /// Render the reply to `cmd` from the current state.
    pub fn reply(&self, cmd: AppCommand) -> Reply {
        match cmd {
            AppCommand::Identify => codec::encode_identity(&self.config.device_id),
            AppCommand::Telemetry => codec::encode_telemetry(&self.snapshot),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Latest telemetry snapshot.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.snapshot
    }

    /// Completed acquisition cycles since startup.
    pub fn tick_count(&self) -> u32 {
        self.snapshot.tick_count
    }

    /// State last pushed to the LED.
    pub fn indicator(&self) -> Option<IndicatorState> {
        self.indicator
    }

    pub fn filter(&self) -> &ExponentialFilter {
        &self.filter
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }
}
