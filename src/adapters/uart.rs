//! UART transport for the host link.
//!
//! Wraps an ESP-IDF [`UartDriver`] as a [`Transport`]. A timed read only
//! returns early once `buf` is full, so callers that want to wake on the
//! first byte pass a one-byte buffer and drain the rest with [`read`].
//!
//! [`read`]: Transport::read

use esp_idf_hal::delay::{NON_BLOCK, TickType};
use esp_idf_hal::sys::EspError;
use esp_idf_hal::uart::UartDriver;

use crate::protocol::transport::Transport;

/// Upper bound for draining the TX FIFO after a reply.
const TX_DONE_TIMEOUT_MS: u64 = 100;

pub struct UartTransport {
    uart: UartDriver<'static>,
}

impl UartTransport {
    pub fn new(uart: UartDriver<'static>) -> Self {
        Self { uart }
    }
}

impl Transport for UartTransport {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
        self.uart.read(buf, NON_BLOCK)
    }

    fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, EspError> {
        let ticks = TickType::new_millis(u64::from(timeout_ms)).ticks();
        self.uart.read(buf, ticks)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        self.uart.write(data)
    }

    fn flush(&mut self) -> Result<(), EspError> {
        self.uart
            .wait_tx_done(TickType::new_millis(TX_DONE_TIMEOUT_MS).ticks())
    }
}
