use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::backend::{CaptureConfig, CaptureEngine, MeteringEvent};
use crate::recording::SessionId;

/// Quietest level reported for a non-silent window
pub const METERING_MIN_DB: f32 = -160.0;

/// Capture engine that reads a 16-bit PCM WAV file as its input
///
/// Each metering window is copied into a new WAV file under the recordings
/// directory, and that file's path is the asset locator returned by `stop`.
pub struct FileCaptureEngine {
    source: PathBuf,
    config: CaptureConfig,
    task: Option<JoinHandle<Result<()>>>,
    stop_tx: Option<oneshot::Sender<()>>,
    output_path: Option<PathBuf>,
}

impl FileCaptureEngine {
    pub fn new(source: impl Into<PathBuf>, config: CaptureConfig) -> Self {
        Self {
            source: source.into(),
            config,
            task: None,
            stop_tx: None,
            output_path: None,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

#[async_trait::async_trait]
impl CaptureEngine for FileCaptureEngine {
    async fn start(
        &mut self,
        session: SessionId,
        metering_tx: mpsc::UnboundedSender<MeteringEvent>,
    ) -> Result<()> {
        if self.task.is_some() {
            anyhow::bail!("File capture already running");
        }

        info!("Opening capture source: {}", self.source.display());

        let reader = hound::WavReader::open(&self.source)
            .with_context(|| format!("Failed to open capture source: {}", self.source.display()))?;
        let spec = reader.spec();
        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
            anyhow::bail!(
                "Capture source must be 16-bit PCM, got {} bits {:?}",
                spec.bits_per_sample,
                spec.sample_format
            );
        }
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read capture source samples")?;

        fs::create_dir_all(&self.config.recordings_dir)
            .context("Failed to create recordings directory")?;
        let output_path = self.config.recordings_dir.join(format!("memo-{}.wav", session));
        let writer = hound::WavWriter::create(&output_path, spec)
            .with_context(|| format!("Failed to create WAV file: {:?}", output_path))?;

        let frames_per_window =
            (spec.sample_rate as u64 * self.config.metering_interval_ms / 1000).max(1) as usize;
        let window_len = frames_per_window * spec.channels as usize;
        let pacing = self
            .config
            .realtime
            .then(|| Duration::from_millis(self.config.metering_interval_ms.max(1)));

        info!(
            "File capture started: {} ({}Hz, {} channels, {} samples per tick)",
            session, spec.sample_rate, spec.channels, window_len
        );

        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(capture_loop(
            samples,
            window_len,
            writer,
            session,
            metering_tx,
            stop_rx,
            pacing,
        ));

        self.task = Some(task);
        self.stop_tx = Some(stop_tx);
        self.output_path = Some(output_path);

        Ok(())
    }

    async fn stop(&mut self) -> Result<Option<String>> {
        let Some(task) = self.task.take() else {
            warn!("File capture not running");
            return Ok(None);
        };

        if let Some(stop_tx) = self.stop_tx.take() {
            // Fails only when the task already reached the end of the source
            let _ = stop_tx.send(());
        }

        task.await.context("Capture task panicked")??;

        let locator = self.output_path.take().map(|p| p.display().to_string());
        info!("File capture stopped: {:?}", locator);

        Ok(locator)
    }

    fn is_capturing(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileCaptureEngine {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn capture_loop(
    samples: Vec<i16>,
    window_len: usize,
    mut writer: hound::WavWriter<BufWriter<File>>,
    session: SessionId,
    metering_tx: mpsc::UnboundedSender<MeteringEvent>,
    mut stop_rx: oneshot::Receiver<()>,
    pacing: Option<Duration>,
) -> Result<()> {
    let mut ticker = pacing.map(tokio::time::interval);

    for window in samples.chunks(window_len) {
        match ticker.as_mut() {
            Some(ticker) => {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = &mut stop_rx => break,
                }
            }
            None => {
                tokio::task::yield_now().await;
                if !matches!(stop_rx.try_recv(), Err(oneshot::error::TryRecvError::Empty)) {
                    break;
                }
            }
        }

        for &sample in window {
            writer
                .write_sample(sample)
                .context("Failed to write sample to WAV")?;
        }

        let event = MeteringEvent {
            session,
            value: metering_db(window),
        };
        if metering_tx.send(event).is_err() {
            // Recorder is gone
            break;
        }
    }

    writer.finalize().context("Failed to finalize WAV file")?;

    Ok(())
}

/// RMS level of an interleaved PCM window in dBFS
///
/// Returns `None` for silent (or empty) windows, which have no defined level.
pub fn metering_db(window: &[i16]) -> Option<f32> {
    if window.is_empty() {
        return None;
    }

    let sum_squares: f64 = window.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let rms = (sum_squares / window.len() as f64).sqrt();
    if rms == 0.0 {
        return None;
    }

    let db = 20.0 * (rms / i16::MAX as f64).log10();
    Some((db as f32).max(METERING_MIN_DB))
}
