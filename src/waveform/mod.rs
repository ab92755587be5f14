//! Waveform rendering for stored memos
//!
//! A memo's metering sequence is reduced to a fixed number of buckets
//! (`downsample`), each bucket becomes one bar whose height follows its level
//! and whose color follows the playhead (`WaveformView`).

mod downsample;
mod interpolate;
mod render;
pub mod terminal;

pub use downsample::{bucket_range, downsample};
pub use interpolate::{interpolate, Extrapolation};
pub use render::{is_played, WaveformBar, WaveformStyle, WaveformView};
