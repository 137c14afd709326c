//! Status indicator state machine.
//!
//! Maps the outcome of an acquisition cycle and the heartbeat phase to the
//! colour/brightness pair shown on the status LED. The main loop pushes the
//! result to the LED every cycle, even when nothing changed, so the
//! brightness toggle stays visible.
//!
//! | Status       | Colour | When                                   |
//! |--------------|--------|----------------------------------------|
//! | Initializing | Blue   | once, before the first cycle           |
//! | Healthy      | Green  | primary sensor read succeeded          |
//! | Faulted      | Red    | humidity or temperature read failed    |

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// The three indicator colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    Blue,
    Green,
    Red,
}

impl Colour {
    pub const fn rgb(self) -> Rgb {
        match self {
            Self::Blue => (0, 0, 255),
            Self::Green => (0, 255, 0),
            Self::Red => (255, 0, 0),
        }
    }
}

/// Heartbeat brightness level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brightness {
    Dim,
    Bright,
}

impl Brightness {
    /// Map to an LED driver level given the configured dim/bright values.
    pub const fn level(self, dim: u8, bright: u8) -> u8 {
        match self {
            Self::Dim => dim,
            Self::Bright => bright,
        }
    }
}

/// Instrument health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Initializing,
    Healthy,
    Faulted,
}

impl Status {
    pub const fn colour(self) -> Colour {
        match self {
            Self::Initializing => Colour::Blue,
            Self::Healthy => Colour::Green,
            Self::Faulted => Colour::Red,
        }
    }
}

/// Status crossed with heartbeat phase. Recomputed whole every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorState {
    pub status: Status,
    pub brightness: Brightness,
}

impl IndicatorState {
    /// Shown once during start-up.
    pub const INITIALIZING: Self = Self {
        status: Status::Initializing,
        brightness: Brightness::Bright,
    };

    /// State for a completed acquisition cycle.
    pub const fn update(read_was_error: bool, heartbeat_bright: bool) -> Self {
        Self {
            status: if read_was_error {
                Status::Faulted
            } else {
                Status::Healthy
            },
            brightness: if heartbeat_bright {
                Brightness::Bright
            } else {
                Brightness::Dim
            },
        }
    }

    pub const fn colour(&self) -> Colour {
        self.status.colour()
    }
}

/// Heartbeat phase, toggled once per completed acquisition cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Heartbeat {
    bright: bool,
}

impl Heartbeat {
    /// Starts dim: the first cycle shows the dim level.
    pub const fn new() -> Self {
        Self { bright: false }
    }

    /// Return the phase for this cycle and advance to the next one.
    pub fn advance(&mut self) -> bool {
        let phase = self.bright;
        self.bright = !self.bright;
        phase
    }
}
