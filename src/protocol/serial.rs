//! Line-oriented serial link over any [`Transport`].
//!
//! Reads go through a small receive buffer so that bytes arriving after a
//! line terminator are kept for the next [`poll_line`](LinePort::poll_line)
//! call instead of being lost.

use log::warn;

use crate::app::ports::{Line, LinePort};
use crate::error::CommsError;

use super::codec::{LineDecoder, REPLY_TERMINATOR};
use super::transport::Transport;

const RX_CHUNK: usize = 64;

pub struct SerialLink<T> {
    transport: T,
    decoder: LineDecoder,
    rx: [u8; RX_CHUNK],
    rx_pos: usize,
    rx_len: usize,
}

impl<T: Transport> SerialLink<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: LineDecoder::new(),
            rx: [0; RX_CHUNK],
            rx_pos: 0,
            rx_len: 0,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Run buffered bytes through the decoder.
    fn drain(&mut self) -> Option<Line> {
        let (used, line) = self.decoder.feed(&self.rx[self.rx_pos..self.rx_len]);
        self.rx_pos += used;
        line
    }

    fn write_all(&mut self, mut data: &[u8]) -> Result<(), CommsError> {
        while !data.is_empty() {
            match self.transport.write(data) {
                Ok(0) => return Err(CommsError::WriteFailed),
                Ok(n) => data = &data[n.min(data.len())..],
                Err(e) => {
                    warn!("Serial write error: {:?}", e);
                    return Err(CommsError::WriteFailed);
                }
            }
        }
        Ok(())
    }
}

impl<T: Transport> LinePort for SerialLink<T> {
    fn poll_line(&mut self, wait_ms: u32) -> Result<Option<Line>, CommsError> {
        if let Some(line) = self.drain() {
            return Ok(Some(line));
        }

        // Block for one byte only: a blocking read returns when its buffer
        // is full, so a short line would otherwise sit until the timeout.
        let first = self.transport.read_timeout(&mut self.rx[..1], wait_ms);
        let n = match first {
            Ok(0) => Ok(0),
            Ok(_) => self.transport.read(&mut self.rx[1..]).map(|rest| 1 + rest),
            Err(e) => Err(e),
        }
        .map_err(|e| {
            warn!("Serial read error: {:?}", e);
            self.decoder.reset();
            CommsError::ReadFailed
        })?;
        self.rx_pos = 0;
        self.rx_len = n.min(RX_CHUNK);
        Ok(self.drain())
    }

    fn write_line(&mut self, line: &str) -> Result<(), CommsError> {
        self.write_all(line.as_bytes())?;
        self.write_all(REPLY_TERMINATOR.as_bytes())?;
        self.transport.flush().map_err(|e| {
            warn!("Serial flush error: {:?}", e);
            CommsError::FlushFailed
        })
    }
}
