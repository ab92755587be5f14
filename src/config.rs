use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub recorder: RecorderConfig,
    pub waveform: WaveformConfig,
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "voice-memos".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Directory recorded memos are written to (`~` is expanded)
    pub recordings_path: String,
    /// WAV file the file capture engine reads as its input
    pub source_path: Option<String>,
    /// Metering tick interval (~60 Hz by default)
    pub metering_interval_ms: u64,
    /// Pace metering ticks in real time instead of as fast as possible
    pub realtime: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            recordings_path: "~/.voice-memos/recordings".to_string(),
            source_path: None,
            metering_interval_ms: 16,
            realtime: true,
        }
    }
}

impl RecorderConfig {
    pub fn recordings_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.recordings_path).into_owned())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaveformConfig {
    pub bucket_count: usize,
    pub db_floor: f32,
    pub db_ceiling: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            bucket_count: 50,
            db_floor: -60.0,
            db_ceiling: 0.0,
            min_height: 5.0,
            max_height: 50.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub progress_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            progress_interval_ms: 16,
        }
    }
}

impl Config {
    /// Load from an optional file at `path` (extension inferred), then
    /// `VOICE_MEMOS__SECTION__KEY` environment overrides.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("VOICE_MEMOS").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
