use anyhow::Result;
use tokio::sync::mpsc;

use super::tracker::PlaybackStatus;

/// Playback engine trait
///
/// Loading an asset yields an independent player; loading another asset does
/// not stop players already loaded.
#[async_trait::async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Load the asset at `uri`. The player pushes status snapshots on
    /// `status_tx` until it is unloaded.
    async fn load(
        &self,
        uri: &str,
        status_tx: mpsc::UnboundedSender<PlaybackStatus>,
    ) -> Result<Box<dyn PlayerHandle>>;

    /// Get engine name for logging
    fn name(&self) -> &str;
}

/// One loaded sound
pub trait PlayerHandle: Send + Sync {
    /// Play from the current position
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    /// Play from the start
    fn replay(&mut self) -> Result<()>;

    /// Release the sound. Idempotent; no status is pushed afterward.
    fn unload(&mut self) -> Result<()>;
}
