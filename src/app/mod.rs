//! Application core: pure domain logic, zero I/O.
//!
//! This module holds the rules of the monitor: acquisition, smoothing,
//! status indication and the command protocol. All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod reading;
pub mod service;
pub mod telemetry;
