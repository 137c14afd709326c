//! Serial command/telemetry protocol.
//!
//! ```text
//!   Transport (bytes) ──▶ SerialLink ──▶ LineDecoder ──▶ Line ──▶ AppService
//!                            ▲                                       │
//!                            └──────────── Reply (codec) ◀───────────┘
//! ```

pub mod codec;
pub mod serial;
pub mod transport;
