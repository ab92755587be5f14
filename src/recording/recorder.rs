use anyhow::Result;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::collector::{SampleCollector, SessionId, SENTINEL_FLOOR_DB};
use super::pulse::record_pulse_inset;
use crate::capture::{CaptureEngine, MeteringEvent};
use crate::memo::Memo;

/// Live view of the recorder for driving the record button
#[derive(Debug, Clone, Serialize)]
pub struct RecorderLevel {
    /// Whether a recording is in progress
    pub recording: bool,
    /// Latest level in dBFS, or the floor when idle
    pub level_db: f32,
    /// Inset of the pulse ring around the record button
    pub pulse_inset: f32,
    /// Readings collected so far
    pub samples_count: usize,
}

/// Owns the capture engine and the single active recording session
pub struct Recorder {
    engine: Box<dyn CaptureEngine>,
    collector: SampleCollector,
    metering_rx: Option<mpsc::UnboundedReceiver<MeteringEvent>>,
}

impl Recorder {
    pub fn new(engine: Box<dyn CaptureEngine>) -> Self {
        Self {
            engine,
            collector: SampleCollector::new(),
            metering_rx: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.collector.is_active()
    }

    /// Whether the engine is still producing readings for the active session
    pub fn is_capturing(&self) -> bool {
        self.is_recording() && self.engine.is_capturing()
    }

    pub fn active_session(&self) -> Option<SessionId> {
        self.collector.session()
    }

    /// Start a new recording session
    ///
    /// Rejected while another session is active. If the engine fails to
    /// start, the recorder stays idle.
    pub async fn start(&mut self) -> Result<SessionId> {
        if let Some(active) = self.collector.session() {
            warn!("Recording already in progress: {}", active);
            anyhow::bail!("Recording {} is already in progress", active);
        }

        let session = SessionId::new();
        info!("Starting recording {} on {} engine", session, self.engine.name());

        let (metering_tx, metering_rx) = mpsc::unbounded_channel();
        self.collector.start(session);

        if let Err(e) = self.engine.start(session, metering_tx).await {
            error!("Failed to start recording: {:#}", e);
            self.collector.finish();
            return Err(e.context("Failed to start capture engine"));
        }

        self.metering_rx = Some(metering_rx);
        info!("Recording started: {}", session);

        Ok(session)
    }

    /// Apply every pending metering event to the collector
    pub fn pump(&mut self) -> usize {
        let Some(rx) = self.metering_rx.as_mut() else {
            return 0;
        };

        let mut accepted = 0;
        while let Ok(event) = rx.try_recv() {
            if self.collector.on_sample(event.session, event.value) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Stop the active recording and freeze its readings into a memo
    ///
    /// Returns `None` when idle or when the engine produced no asset.
    pub async fn stop(&mut self) -> Result<Option<Memo>> {
        let Some(session) = self.collector.session() else {
            warn!("Recording not active");
            return Ok(None);
        };

        info!("Stopping recording {}", session);

        let locator = match self.engine.stop().await {
            Ok(locator) => locator,
            Err(e) => {
                error!("Failed to stop recording {}: {:#}", session, e);
                self.collector.finish();
                self.metering_rx = None;
                return Err(e.context("Failed to stop capture engine"));
            }
        };

        self.pump();
        let absent = self.collector.absent_count();
        let metering = self.collector.finish();
        self.metering_rx = None;

        match locator {
            Some(uri) => {
                info!(
                    "Recording {} stored at {} ({} samples, {} absent)",
                    session,
                    uri,
                    metering.len(),
                    absent
                );
                Ok(Some(Memo::new(uri, metering)))
            }
            None => {
                warn!("Recording {} produced no asset; discarding {} samples", session, metering.len());
                Ok(None)
            }
        }
    }

    /// Latest live level, after applying pending readings
    pub fn level(&mut self) -> RecorderLevel {
        self.pump();
        let level_db = self.live_level();
        RecorderLevel {
            recording: self.is_recording(),
            level_db,
            pulse_inset: record_pulse_inset(level_db),
            samples_count: self.collector.len(),
        }
    }

    /// Last defined reading of the active session, or the floor
    pub fn live_level(&self) -> f32 {
        self.collector.last_level().unwrap_or(SENTINEL_FLOOR_DB)
    }
}
