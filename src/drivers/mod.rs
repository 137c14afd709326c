//! Output drivers: status LED, indicator state and the task watchdog.

pub mod dotstar;
pub mod indicator;
pub mod watchdog;
