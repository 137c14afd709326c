//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the device if the acquisition loop stops iterating for longer than
//! the configured timeout, e.g. when a sensor driver hangs mid-transaction.
//! The timeout must exceed the worst-case iteration: one acquisition cycle
//! (DHT22 transaction plus the 750 ms DS18B20 conversion) followed by the
//! serial wait.
//!
//! The main loop must call `feed()` once per scheduler iteration. On the
//! host the driver only counts feeds.

use core::cell::Cell;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

pub struct Watchdog {
    timeout_ms: u32,
    feeds: Cell<u32>,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Configure the TWDT and subscribe the current task.
    #[cfg(target_os = "espidf")]
    pub fn new(timeout_ms: u32) -> Self {
        let cfg = esp_task_wdt_config_t {
            timeout_ms,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: called once from main() before the loop starts.
        let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
        if ret != ESP_OK {
            log::warn!("TWDT reconfigure returned {} (may already be configured)", ret);
        }

        // SAFETY: a null handle subscribes the calling task.
        let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
        let subscribed = ret == ESP_OK;
        if subscribed {
            info!("Watchdog: subscribed ({}ms timeout, panic on trigger)", timeout_ms);
        } else {
            log::warn!("Watchdog: failed to subscribe ({})", ret);
        }

        Self {
            timeout_ms,
            feeds: Cell::new(0),
            subscribed,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(timeout_ms: u32) -> Self {
        info!("Watchdog(sim): no-op ({}ms)", timeout_ms);
        Self {
            timeout_ms,
            feeds: Cell::new(0),
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Feeds since start, wrapping.
    pub fn feeds(&self) -> u32 {
        self.feeds.get()
    }

    /// Feed the watchdog.
    pub fn feed(&self) {
        self.feeds.set(self.feeds.get().wrapping_add(1));

        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: the current task was subscribed in `new`.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}
