//! Line codec for the command/telemetry protocol.
//!
//! Wire format, one request and one reply per line:
//! ```text
//! host → device   id?\n                  anything else\n
//! device → host   Arduino, E. coli sauna\r\n
//!                 <tick>\t<temp .3>\t<humidity .1>\t<secondary .2>\r\n
//! ```
//!
//! `\r` is ignored on input, so CRLF and LF hosts both work. A line longer
//! than [`LINE_CAPACITY`] is cut at the capacity; the rest up to the
//! terminator is discarded.

use core::fmt::Write;

use heapless::String;
use log::debug;

use crate::app::ports::{LINE_CAPACITY, Line};
use crate::app::telemetry::TelemetrySnapshot;

/// Reply buffer size. Four `f32` fields at the widths used here and a
/// `u32` tick fit with room to spare.
pub const REPLY_CAPACITY: usize = 160;

/// One outbound reply line, without terminator.
pub type Reply = String<REPLY_CAPACITY>;

/// Terminator appended to every reply.
pub const REPLY_TERMINATOR: &str = "\r\n";

/// Streaming line assembler.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: Line,
    overflowed: bool,
}

impl LineDecoder {
    pub const fn new() -> Self {
        Self {
            buf: Line::new(),
            overflowed: false,
        }
    }

    /// Feed one byte. Returns the completed line when `byte` is `\n`.
    pub fn push(&mut self, byte: u8) -> Option<Line> {
        match byte {
            b'\r' => None,
            b'\n' => {
                if self.overflowed {
                    debug!("Line truncated to {} bytes", LINE_CAPACITY);
                    self.overflowed = false;
                }
                Some(core::mem::take(&mut self.buf))
            }
            _ => {
                if self.buf.push(byte).is_err() {
                    self.overflowed = true;
                }
                None
            }
        }
    }

    /// Feed bytes until a line completes.
    ///
    /// Returns how many bytes of `data` were consumed and the line, if one
    /// completed. Bytes after the terminator are left for the next call.
    pub fn feed(&mut self, data: &[u8]) -> (usize, Option<Line>) {
        for (i, &b) in data.iter().enumerate() {
            if let Some(line) = self.push(b) {
                return (i + 1, Some(line));
            }
        }
        (data.len(), None)
    }

    /// Bytes of the current partial line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Drop the partial line (e.g. after a transport error).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.overflowed = false;
    }
}

/// Reply to `id?`.
pub fn encode_identity(device_id: &str) -> Reply {
    let mut reply = Reply::new();
    for c in device_id.chars() {
        if reply.push(c).is_err() {
            break;
        }
    }
    reply
}

/// Tab-separated telemetry line. Unavailable fields print as `NaN`.
pub fn encode_telemetry(snapshot: &TelemetrySnapshot) -> Reply {
    let mut reply = Reply::new();
    // Worst case (u32 tick, three f32::MAX fields) is under REPLY_CAPACITY.
    let _ = write!(
        reply,
        "{}\t{}\t{}\t{}",
        snapshot.tick_count,
        snapshot.primary_temp_filtered.fixed(3),
        snapshot.humidity.fixed(1),
        snapshot.secondary_temp.fixed(2),
    );
    reply
}
