//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to               |
//! |------------|----------------|---------------------------|
//! | `hardware` | SensorPort     | DHT22 (GPIO), DS18B20 (1-Wire) |
//! |            | IndicatorPort  | DotStar LED (SPI)         |
//! | `log_sink` | EventSink      | Console log output        |
//! | `time`     | ClockPort      | ESP32 system timer        |
//! | `uart`     | Transport      | ESP-IDF UART driver       |

pub mod hardware;
pub mod log_sink;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart;
