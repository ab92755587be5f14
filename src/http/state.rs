use crate::capture::{CaptureConfig, CaptureEngineFactory, CaptureSource};
use crate::config::{Config, WaveformConfig};
use crate::memo::MemoList;
use crate::playback::{ClockPlaybackEngine, MemoPlayer, PlaybackEngine};
use crate::recording::Recorder;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The recorder and its single active session
    pub recorder: Arc<Mutex<Recorder>>,

    /// Finished memos, most recent first
    pub memos: Arc<RwLock<MemoList>>,

    /// Loaded sounds (memo_id → player)
    pub players: Arc<Mutex<HashMap<Uuid, MemoPlayer>>>,

    pub playback_engine: Arc<dyn PlaybackEngine>,

    pub waveform: WaveformConfig,
}

impl AppState {
    pub fn new(
        recorder: Recorder,
        playback_engine: Arc<dyn PlaybackEngine>,
        waveform: WaveformConfig,
    ) -> Self {
        Self {
            recorder: Arc::new(Mutex::new(recorder)),
            memos: Arc::new(RwLock::new(MemoList::new())),
            players: Arc::new(Mutex::new(HashMap::new())),
            playback_engine,
            waveform,
        }
    }

    /// Wire the recorder and playback engine described by `config`
    ///
    /// An unusable capture source leaves the recorder idle; starting a
    /// recording then reports the error.
    pub fn from_config(config: &Config) -> Self {
        let capture = CaptureEngineFactory::create_or_unavailable(
            CaptureSource::from_config(&config.recorder),
            CaptureConfig::from(&config.recorder),
        );
        let playback = ClockPlaybackEngine::new(Duration::from_millis(
            config.playback.progress_interval_ms,
        ));

        Self::new(Recorder::new(capture), Arc::new(playback), config.waveform.clone())
    }
}
