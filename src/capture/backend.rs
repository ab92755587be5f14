use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tokio::sync::mpsc;

use super::file::FileCaptureEngine;
use crate::config::RecorderConfig;
use crate::recording::SessionId;
use tracing::warn;

/// One metering tick pushed by a capture engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteringEvent {
    /// Session the reading belongs to
    pub session: SessionId,
    /// Level in dBFS, or `None` when the engine had no reading for this tick
    pub value: Option<f32>,
}

/// Configuration for capture engines
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Directory captured assets are written to
    pub recordings_dir: PathBuf,
    /// Interval between metering ticks in milliseconds (advisory)
    pub metering_interval_ms: u64,
    /// Pace metering ticks in real time
    pub realtime: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            recordings_dir: PathBuf::from("recordings"),
            metering_interval_ms: 16, // ~60 Hz
            realtime: true,
        }
    }
}

impl From<&RecorderConfig> for CaptureConfig {
    fn from(config: &RecorderConfig) -> Self {
        Self {
            recordings_dir: config.recordings_dir(),
            metering_interval_ms: config.metering_interval_ms,
            realtime: config.realtime,
        }
    }
}

/// Audio capture engine trait
///
/// Engines push metering readings on the channel handed to `start` at their
/// own cadence and produce an opaque asset locator when stopped.
#[async_trait::async_trait]
pub trait CaptureEngine: Send + Sync {
    /// Start capturing for `session`, pushing one event per metering tick
    async fn start(
        &mut self,
        session: SessionId,
        metering_tx: mpsc::UnboundedSender<MeteringEvent>,
    ) -> Result<()>;

    /// Stop capturing
    ///
    /// Returns the locator of the recorded asset, if one was produced.
    /// Every event for the session is sent before this returns.
    async fn stop(&mut self) -> Result<Option<String>>;

    /// Check if the engine is still producing readings
    fn is_capturing(&self) -> bool;

    /// Get engine name for logging
    fn name(&self) -> &str;
}

/// Capture source type
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// Microphone input
    Microphone,
    /// WAV file played back as if it were the microphone
    File(PathBuf),
}

impl CaptureSource {
    pub fn from_config(config: &RecorderConfig) -> Self {
        match &config.source_path {
            Some(path) => Self::File(PathBuf::from(shellexpand::tilde(path).into_owned())),
            None => Self::Microphone,
        }
    }
}

/// Capture engine factory
pub struct CaptureEngineFactory;

impl CaptureEngineFactory {
    pub fn create(source: CaptureSource, config: CaptureConfig) -> Result<Box<dyn CaptureEngine>> {
        match source {
            CaptureSource::File(path) => Ok(Box::new(FileCaptureEngine::new(path, config))),
            CaptureSource::Microphone => {
                anyhow::bail!(
                    "Microphone capture is not available in this build; set recorder.source_path to a WAV file"
                )
            }
        }
    }

    /// Create the configured engine, falling back to [`UnavailableCaptureEngine`]
    ///
    /// The failure is logged and reported again on every `start`, so the
    /// service still comes up idle without a working input.
    pub fn create_or_unavailable(source: CaptureSource, config: CaptureConfig) -> Box<dyn CaptureEngine> {
        match Self::create(source, config) {
            Ok(engine) => engine,
            Err(e) => {
                warn!("Capture engine unavailable: {:#}", e);
                Box::new(UnavailableCaptureEngine::new(format!("{:#}", e)))
            }
        }
    }
}

/// Engine standing in for an input that could not be opened
pub struct UnavailableCaptureEngine {
    reason: String,
}

impl UnavailableCaptureEngine {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait::async_trait]
impl CaptureEngine for UnavailableCaptureEngine {
    async fn start(
        &mut self,
        _session: SessionId,
        _metering_tx: mpsc::UnboundedSender<MeteringEvent>,
    ) -> Result<()> {
        Err(anyhow!("{}", self.reason))
    }

    async fn stop(&mut self) -> Result<Option<String>> {
        Ok(None)
    }

    fn is_capturing(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}
