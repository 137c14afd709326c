//! Fixed-period scheduler.
//!
//! Every iteration of the main loop calls [`Scheduler::poll_once`], which
//! first runs an acquisition cycle if the period has elapsed and then
//! serves at most one command line. The two halves are independent: a
//! command is answered on every iteration, whether or not a tick fired.
//!
//! ```text
//!   ┌──────────────────────── poll_once ────────────────────────┐
//!   │                                                           │
//!   │  now - last >= period ? ──yes──▶ last = now               │
//!   │          │                       AppService::acquire()    │
//!   │          ▼                                                │
//!   │  LinePort::poll_line(wait) ──line──▶ AppService::handle   │
//!   │                                      LinePort::write_line │
//!   └───────────────────────────────────────────────────────────┘
//! ```
//!
//! The boundary is reset to the time the tick was observed, not advanced by
//! one period, so a late tick pushes later ones back instead of bursting.
//! All arithmetic is wrapping on the `u32` millisecond counter.

use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::{ClockPort, EventSink, IndicatorPort, LinePort, SensorPort};
use crate::app::service::AppService;
use crate::config::{SystemConfig, WaitStrategy};

// ═══════════════════════════════════════════════════════════════
//  Periodic trigger
// ═══════════════════════════════════════════════════════════════

/// Reset-based periodic deadline on a wrapping millisecond clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTrigger {
    period_ms: u32,
    last_ms: u32,
}

impl PeriodicTrigger {
    /// First fire is one full period after `now_ms`.
    pub const fn new(period_ms: u32, now_ms: u32) -> Self {
        Self {
            period_ms,
            last_ms: now_ms,
        }
    }

    pub const fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn is_due(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_ms) >= self.period_ms
    }

    /// Start the next period at `now_ms`.
    pub fn fire(&mut self, now_ms: u32) {
        self.last_ms = now_ms;
    }

    /// Milliseconds until the next fire; zero if already due.
    pub fn remaining_ms(&self, now_ms: u32) -> u32 {
        self.period_ms.saturating_sub(now_ms.wrapping_sub(self.last_ms))
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// What one loop iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Iteration {
    /// An acquisition cycle ran.
    pub acquired: bool,
    /// A command line was answered.
    pub replied: bool,
}

pub struct Scheduler {
    trigger: PeriodicTrigger,
    wait_strategy: WaitStrategy,
}

impl Scheduler {
    pub fn new(config: &SystemConfig, now_ms: u32) -> Self {
        Self {
            trigger: PeriodicTrigger::new(config.update_period_ms, now_ms),
            wait_strategy: config.wait_strategy,
        }
    }

    pub fn trigger(&self) -> &PeriodicTrigger {
        &self.trigger
    }

    /// One main-loop iteration: maybe tick, then maybe answer a command.
    ///
    /// Never fails. Serial errors are reported as
    /// [`AppEvent::CommsFault`] and the loop carries on.
    pub fn poll_once<H, L, C, S>(
        &mut self,
        app: &mut AppService,
        hw: &mut H,
        link: &mut L,
        clock: &C,
        sink: &mut S,
    ) -> Iteration
    where
        H: SensorPort + IndicatorPort,
        L: LinePort,
        C: ClockPort,
        S: EventSink,
    {
        let mut it = Iteration::default();

        // 1. Maybe tick
        let now = clock.now_ms();
        if self.trigger.is_due(now) {
            self.trigger.fire(now);
            app.acquire(hw, sink);
            it.acquired = true;
        }

        // 2. Maybe command
        let wait_ms = match self.wait_strategy {
            WaitStrategy::BusyPoll => 0,
            // The cycle may have blocked; measure from after it.
            WaitStrategy::UntilDeadline => self.trigger.remaining_ms(clock.now_ms()),
        };
        match link.poll_line(wait_ms) {
            Ok(Some(line)) => {
                let reply = app.handle_line(&line, sink);
                match link.write_line(&reply) {
                    Ok(()) => it.replied = true,
                    Err(e) => {
                        warn!("Reply dropped: {}", e);
                        sink.emit(&AppEvent::CommsFault(e));
                    }
                }
            }
            Ok(None) => {}
            Err(e) => sink.emit(&AppEvent::CommsFault(e)),
        }

        it
    }
}
