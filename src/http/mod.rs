//! HTTP API server for driving the recorder and memo list
//!
//! - POST /memos/record/start - Start a recording
//! - POST /memos/record/stop - Stop it and store the memo
//! - GET /memos/record/level - Live level and record-button pulse
//! - GET /memos, DELETE /memos - List or clear memos
//! - GET /memos/:id/waveform - Bucketed waveform at the playhead
//! - POST /memos/:id/toggle - Play/pause/resume/replay
//! - GET /memos/:id/playback - Playback state
//! - DELETE /memos/:id/player - Release the loaded sound
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
