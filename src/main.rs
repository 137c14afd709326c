//! Thermobox Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single cooperative loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          SerialLink<UartTransport>            │
//! │  (Sensor + Indicator)     (LinePort)                           │
//! │  LogEventSink             Esp32TimeAdapter                     │
//! │  (EventSink)              (ClockPort)                          │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  EMA filter · Heartbeat · Status · Command replies     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (fixed period, reset-based) · Watchdog              │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pin map (ESP32-S3):
//!
//! | Signal        | GPIO | Driver                       |
//! |---------------|------|------------------------------|
//! | DHT22 data    | 2    | open-drain, pull-up          |
//! | DS18B20 1-Wire| 9    | open-drain, pull-up          |
//! | DotStar CLK   | 6    | SPI2 SCLK                    |
//! | DotStar DATA  | 8    | SPI2 MOSI                    |
//! | Host TX / RX  | 43/44| UART0                        |
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{info, warn};

use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::spi::{SpiBusDriver, SpiDriver, SpiDriverConfig, config::Config as SpiConfig};
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::{FromValueType, Hertz};

use thermobox::adapters::hardware::HardwareAdapter;
use thermobox::adapters::log_sink::LogEventSink;
use thermobox::adapters::time::Esp32TimeAdapter;
use thermobox::adapters::uart::UartTransport;
use thermobox::app::ports::ClockPort;
use thermobox::app::service::AppService;
use thermobox::config::SystemConfig;
use thermobox::drivers::dotstar::DotStar;
use thermobox::drivers::watchdog::Watchdog;
use thermobox::error::Error;
use thermobox::protocol::serial::SerialLink;
use thermobox::scheduler::Scheduler;
use thermobox::sensors::SensorHub;
use thermobox::sensors::dht22::Dht22;
use thermobox::sensors::ds18b20::Ds18b20;
use thermobox::sensors::onewire::OneWirePin;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Thermobox v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;
    match config.to_json() {
        Ok(json) => info!("Config: {}", json),
        Err(e) => warn!("Config not printable: {}", e),
    }

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals =
        Peripherals::take().map_err(|_| Error::Init("peripherals already taken"))?;
    let pins = peripherals.pins;
    let clock = Esp32TimeAdapter::new();

    // DHT22: open-drain data line with the internal pull-up.
    let mut dht_pin = PinDriver::input_output_od(pins.gpio2).context("DHT22 pin")?;
    dht_pin.set_pull(Pull::Up)?;
    let dht = Dht22::new(dht_pin, Ets, clock, config.primary_min_interval_ms);

    // DS18B20 on its own 1-Wire bus.
    let mut ow_pin = PinDriver::input_output_od(pins.gpio9).context("1-Wire pin")?;
    ow_pin.set_pull(Pull::Up)?;
    let mut probe = Ds18b20::new(OneWirePin::new(ow_pin, Ets), FreeRtos);
    match probe.begin() {
        Ok(0) => info!("DS18B20: no probe attached, secondary channel reads NaN"),
        Ok(n) => info!("DS18B20: {} probe(s), using index 0", n),
        Err(e) => warn!("DS18B20: bus search failed ({})", e),
    }

    // DotStar status LED over SPI.
    let spi = SpiDriver::new(
        peripherals.spi2,
        pins.gpio6,
        pins.gpio8,
        None::<AnyIOPin>,
        &SpiDriverConfig::new(),
    )
    .context("SpiDriver::new")?;
    let spi_bus = SpiBusDriver::new(spi, &SpiConfig::new().baudrate(4.MHz().into()))
        .context("SpiBusDriver::new")?;
    let led = DotStar::new(spi_bus);

    // Host link on UART0.
    let uart = UartDriver::new(
        peripherals.uart0,
        pins.gpio43,
        pins.gpio44,
        None::<AnyIOPin>,
        None::<AnyIOPin>,
        &UartConfig::new().baudrate(Hertz(config.baud_rate)),
    )
    .context("UartDriver::new")?;
    let mut link = SerialLink::new(UartTransport::new(uart));
    info!("UART0 ready (TX=GPIO43, RX=GPIO44), {} bps", config.baud_rate);

    let mut hw = HardwareAdapter::new(
        SensorHub::new(dht, probe, config.probe_disconnected_below_c),
        led,
        &config,
    );

    // ── 4. Application core ───────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut app = AppService::new(config.clone());
    info!(
        "EMA: a={} -> tau {:.2} s at {} ms",
        app.filter().alpha(),
        app.filter().time_constant_secs(config.period_secs()),
        config.update_period_ms
    );

    let watchdog = Watchdog::new(config.watchdog_timeout_ms);
    app.start(&mut hw, &mut sink);
    let mut scheduler = Scheduler::new(&config, clock.now_ms());

    info!("System ready. Entering acquisition loop.");

    // ── 5. Loop ───────────────────────────────────────────────
    loop {
        scheduler.poll_once(&mut app, &mut hw, &mut link, &clock, &mut sink);
        watchdog.feed();
    }
}
