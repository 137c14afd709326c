//! Signal conditioning for the acquisition loop.

pub mod ema;
