//! Transport abstraction: any byte-oriented channel.
//!
//! Concrete implementations:
//! - UART (the host-side controller's serial port)
//! - in-memory buffers in the integration tests
//!
//! [`SerialLink`](super::serial::SerialLink) is generic over `Transport`,
//! so swapping the physical link needs no change to line handling.

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Like [`read`](Self::read), but waits up to `timeout_ms` for `buf` to
    /// fill. Transports that cannot block fall back to a non-blocking read.
    fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error> {
        let _ = timeout_ms;
        self.read(buf)
    }

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// A null transport that discards all writes and never reads.
/// Stands in for the serial link when no host is attached.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}
