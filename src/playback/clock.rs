use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::path::Path;
use std::time::Duration;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::get_probe;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::engine::{PlaybackEngine, PlayerHandle};
use super::tracker::PlaybackStatus;

/// Probe an audio file's duration in milliseconds
///
/// Returns `Ok(None)` when the container doesn't record a frame count.
pub fn probe_duration_millis(path: impl AsRef<Path>) -> Result<Option<u64>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open audio file: {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Unsupported audio format")?;
    let track = probed
        .format
        .default_track()
        .ok_or_else(|| anyhow!("No audio track in {}", path.display()))?;

    let params = &track.codec_params;
    Ok(match (params.n_frames, params.sample_rate) {
        (Some(frames), Some(rate)) if rate > 0 => Some(frames * 1000 / rate as u64),
        _ => None,
    })
}

/// Playback engine that runs a wall-clock transport over a probed asset
///
/// No audio is rendered; position advances in real time while playing and
/// status snapshots are pushed every progress interval.
pub struct ClockPlaybackEngine {
    progress_interval: Duration,
}

impl ClockPlaybackEngine {
    pub fn new(progress_interval: Duration) -> Self {
        Self {
            progress_interval: progress_interval.max(Duration::from_millis(1)),
        }
    }

    pub fn progress_interval(&self) -> Duration {
        self.progress_interval
    }
}

impl Default for ClockPlaybackEngine {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

#[async_trait::async_trait]
impl PlaybackEngine for ClockPlaybackEngine {
    async fn load(
        &self,
        uri: &str,
        status_tx: mpsc::UnboundedSender<PlaybackStatus>,
    ) -> Result<Box<dyn PlayerHandle>> {
        info!("Loading sound: {}", uri);

        let path = uri.to_string();
        let duration_millis = tokio::task::spawn_blocking(move || probe_duration_millis(path))
            .await
            .context("Duration probe task failed")??;
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let transport = Transport::new(duration_millis);
        let task = tokio::spawn(run_transport(
            transport,
            command_rx,
            status_tx,
            self.progress_interval,
        ));

        info!("Sound loaded: {} ({:?} ms)", uri, duration_millis);

        Ok(Box::new(ClockPlayer {
            command_tx,
            task: Some(task),
        }))
    }

    fn name(&self) -> &str {
        "clock"
    }
}

#[derive(Debug, Clone, Copy)]
enum TransportCommand {
    Play,
    Pause,
    Replay,
    Unload,
}

struct ClockPlayer {
    command_tx: mpsc::UnboundedSender<TransportCommand>,
    task: Option<JoinHandle<()>>,
}

impl ClockPlayer {
    fn send(&self, command: TransportCommand) -> Result<()> {
        if self.task.is_none() {
            anyhow::bail!("Sound is unloaded");
        }
        self.command_tx
            .send(command)
            .map_err(|_| anyhow!("Playback transport stopped"))
    }
}

impl PlayerHandle for ClockPlayer {
    fn play(&mut self) -> Result<()> {
        self.send(TransportCommand::Play)
    }

    fn pause(&mut self) -> Result<()> {
        self.send(TransportCommand::Pause)
    }

    fn replay(&mut self) -> Result<()> {
        self.send(TransportCommand::Replay)
    }

    fn unload(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            let _ = self.command_tx.send(TransportCommand::Unload);
            task.abort();
        }
        Ok(())
    }
}

impl Drop for ClockPlayer {
    fn drop(&mut self) {
        if let Err(e) = self.unload() {
            warn!("Failed to unload sound on drop: {}", e);
        }
    }
}

/// Position bookkeeping for the clock transport
struct Transport {
    duration_millis: Option<u64>,
    playing: bool,
    /// Position when `anchor` was taken
    anchor_position: u64,
    anchor: Instant,
    position: u64,
}

impl Transport {
    fn new(duration_millis: Option<u64>) -> Self {
        Self {
            duration_millis,
            playing: false,
            anchor_position: 0,
            anchor: Instant::now(),
            position: 0,
        }
    }

    fn advance(&mut self) {
        if !self.playing {
            return;
        }
        let elapsed = self.anchor.elapsed().as_millis() as u64;
        self.position = self.anchor_position + elapsed;
        if let Some(duration) = self.duration_millis {
            if self.position >= duration {
                self.position = duration;
                self.playing = false;
            }
        }
    }

    fn play_from(&mut self, position: u64) {
        self.position = position;
        self.anchor_position = position;
        self.anchor = Instant::now();
        self.playing = true;
    }

    fn apply(&mut self, command: TransportCommand) {
        match command {
            TransportCommand::Play if !self.playing => self.play_from(self.position),
            TransportCommand::Pause => {
                self.advance();
                self.playing = false;
            }
            TransportCommand::Replay => self.play_from(0),
            TransportCommand::Play | TransportCommand::Unload => {}
        }
    }

    fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            is_loaded: true,
            is_playing: self.playing,
            position_millis: self.position,
            duration_millis: self.duration_millis,
        }
    }
}

async fn run_transport(
    mut transport: Transport,
    mut commands: mpsc::UnboundedReceiver<TransportCommand>,
    status_tx: mpsc::UnboundedSender<PlaybackStatus>,
    progress_interval: Duration,
) {
    let mut ticker = tokio::time::interval(progress_interval);

    if status_tx.send(transport.status()).is_err() {
        return;
    }

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(TransportCommand::Unload) | None => break,
                Some(command) => {
                    debug!("Transport command: {:?}", command);
                    transport.apply(command);
                }
            },
            _ = ticker.tick(), if transport.playing => transport.advance(),
        }

        if status_tx.send(transport.status()).is_err() {
            break;
        }
    }

    debug!("Playback transport stopped");
}
