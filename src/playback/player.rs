use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::engine::{PlaybackEngine, PlayerHandle};
use super::tracker::{PlaybackStatus, PlaybackTracker, ToggleAction};
use crate::memo::Memo;
use crate::waveform::{WaveformStyle, WaveformView};

/// Playback resource of one memo in the list
///
/// The sound is released when the player is unloaded or dropped, whichever
/// comes first.
pub struct MemoPlayer {
    memo_id: Uuid,
    handle: Option<Box<dyn PlayerHandle>>,
    status_rx: mpsc::UnboundedReceiver<PlaybackStatus>,
    tracker: PlaybackTracker,
}

impl MemoPlayer {
    /// Load `memo`'s sound. A load failure is logged and leaves the player
    /// unloaded.
    pub async fn load(engine: &dyn PlaybackEngine, memo: &Memo) -> Self {
        info!("Loading sound for memo {} on {} engine", memo.id, engine.name());

        let (status_tx, status_rx) = mpsc::unbounded_channel();
        let handle = match engine.load(&memo.uri, status_tx).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("Failed to load sound for memo {}: {:#}", memo.id, e);
                None
            }
        };

        Self {
            memo_id: memo.id,
            handle,
            status_rx,
            tracker: PlaybackTracker::new(),
        }
    }

    pub fn memo_id(&self) -> Uuid {
        self.memo_id
    }

    /// Whether the sound handle is held
    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }

    /// Apply pending status snapshots. Snapshots arriving after unload are
    /// discarded.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(status) = self.status_rx.try_recv() {
            if self.handle.is_some() {
                self.tracker.on_status_update(status);
                applied += 1;
            }
        }
        applied
    }

    /// Handle a tap on the play/pause control
    ///
    /// If the engine rejects the action the pause flag is left unchanged.
    pub fn toggle(&mut self) -> Result<ToggleAction> {
        self.pump();

        let Some(handle) = self.handle.as_mut() else {
            return Ok(ToggleAction::None);
        };

        let action = self.tracker.next_action(true);
        match action {
            ToggleAction::Pause => handle.pause(),
            ToggleAction::Resume => handle.play(),
            ToggleAction::Replay => handle.replay(),
            ToggleAction::None => Ok(()),
        }
        .with_context(|| format!("Failed to {:?} memo {}", action, self.memo_id))?;

        self.tracker.apply(action);
        info!("Memo {}: {:?}", self.memo_id, action);

        Ok(action)
    }

    pub fn tracker(&self) -> &PlaybackTracker {
        &self.tracker
    }

    /// Release the sound; later status snapshots are ignored
    pub fn unload(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            info!("Unloading sound for memo {}", self.memo_id);
            if let Err(e) = handle.unload() {
                warn!("Failed to unload sound for memo {}: {}", self.memo_id, e);
            }
            self.tracker.reset();
        }
    }

    /// Waveform row for `memo` at the current playhead
    pub fn view(&mut self, memo: &Memo, bucket_count: usize, style: &WaveformStyle) -> WaveformView {
        self.pump();
        WaveformView::build(&memo.metering, bucket_count, style, &self.tracker)
    }
}

impl Drop for MemoPlayer {
    fn drop(&mut self) {
        self.unload();
    }
}
