//! DotStar (APA102) RGB status LED driver.
//!
//! The on-board DotStar is clocked over SPI. Each `show()` writes a
//! complete frame:
//!
//! ```text
//! ┌──────────────┬──────────────────────┬───────────────────────┐
//! │ start frame  │ pixel frame(s)       │ end frame             │
//! │ 00 00 00 00  │ FF  B'  G'  R'       │ FF × ((n + 15) / 16)  │
//! └──────────────┴──────────────────────┴───────────────────────┘
//! ```
//!
//! The 5-bit hardware brightness field is left at full scale; global
//! brightness is applied by scaling each channel `(c * (level + 1)) >> 8`.
//!
//! ## Dual-target design
//!
//! Generic over [`embedded_hal::spi::SpiBus`]. On ESP-IDF the bus is an
//! `SpiBusDriver`; on host/test a recording mock.

use embedded_hal::spi::SpiBus;

use super::indicator::Rgb;

/// Number of pixels on the strip (the board has one).
pub const NUM_PIXELS: usize = 1;

const START_FRAME: [u8; 4] = [0x00; 4];
const PIXEL_HEADER: u8 = 0xFF;
const END_FRAME_LEN: usize = NUM_PIXELS.div_ceil(16);
const FRAME_LEN: usize = START_FRAME.len() + 4 * NUM_PIXELS + END_FRAME_LEN;

pub struct DotStar<SPI> {
    spi: SPI,
    current: Option<(Rgb, u8)>,
}

impl<SPI: SpiBus> DotStar<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi, current: None }
    }

    /// Latch `rgb` at global brightness `level` (0–255) on every pixel.
    pub fn show(&mut self, rgb: Rgb, level: u8) -> Result<(), SPI::Error> {
        let frame = Self::encode(rgb, level);
        self.spi.write(&frame)?;
        self.spi.flush()?;
        self.current = Some((rgb, level));
        Ok(())
    }

    /// Last colour and level successfully written.
    pub fn current(&self) -> Option<(Rgb, u8)> {
        self.current
    }

    /// Build the wire frame (BGR pixel order).
    fn encode((r, g, b): Rgb, level: u8) -> [u8; FRAME_LEN] {
        let mut frame = [0xFF; FRAME_LEN];
        frame[..START_FRAME.len()].copy_from_slice(&START_FRAME);
        for px in 0..NUM_PIXELS {
            let at = START_FRAME.len() + 4 * px;
            frame[at] = PIXEL_HEADER;
            frame[at + 1] = Self::scale(b, level);
            frame[at + 2] = Self::scale(g, level);
            frame[at + 3] = Self::scale(r, level);
        }
        frame
    }

    fn scale(channel: u8, level: u8) -> u8 {
        ((channel as u16 * (level as u16 + 1)) >> 8) as u8
    }
}
