//! Recording session management
//!
//! This module provides the pieces that turn a capture engine's metering
//! ticks into a finished memo:
//! - `SampleCollector` accumulates readings for the active session
//! - `Recorder` owns the engine and the single active session
//! - `record_pulse_inset` drives the record button's pulse ring

mod collector;
mod pulse;
mod recorder;

pub use collector::{SampleCollector, SessionId, SENTINEL_FLOOR_DB};
pub use pulse::record_pulse_inset;
pub use recorder::{Recorder, RecorderLevel};
