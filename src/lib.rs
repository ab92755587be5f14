pub mod capture;
pub mod config;
pub mod http;
pub mod memo;
pub mod playback;
pub mod recording;
pub mod waveform;

pub use capture::{
    CaptureConfig, CaptureEngine, CaptureEngineFactory, CaptureSource, FileCaptureEngine,
    MeteringEvent,
};
pub use config::Config;
pub use http::{create_router, AppState};
pub use memo::{Memo, MemoList, MemoSummary};
pub use playback::{
    format_time, ClockPlaybackEngine, MemoPlayer, PlaybackEngine, PlaybackStatus,
    PlaybackTracker, PlayerHandle, ToggleAction,
};
pub use recording::{Recorder, SampleCollector, SessionId, SENTINEL_FLOOR_DB};
pub use waveform::{downsample, WaveformStyle, WaveformView};
