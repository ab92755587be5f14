//! Playback of stored memos
//!
//! - `PlaybackTracker` reduces engine status snapshots to progress and the
//!   play/pause/replay decision
//! - `PlaybackEngine`/`PlayerHandle` are the engine boundary
//! - `ClockPlaybackEngine` is a wall-clock transport over probed assets
//! - `MemoPlayer` owns one memo's loaded sound

mod clock;
mod engine;
mod player;
mod tracker;

pub use clock::{probe_duration_millis, ClockPlaybackEngine};
pub use engine::{PlaybackEngine, PlayerHandle};
pub use player::MemoPlayer;
pub use tracker::{format_time, PlaybackStatus, PlaybackTracker, ToggleAction};
