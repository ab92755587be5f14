// Integration tests for memo playback
//
// These tests verify the tap-to-toggle state machine against a scripted
// engine, that loaded sounds are always released, and the wall-clock
// transport of the clock engine.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use voice_memos::memo::Memo;
use voice_memos::playback::{
    probe_duration_millis, ClockPlaybackEngine, MemoPlayer, PlaybackEngine, PlaybackStatus,
    PlayerHandle, ToggleAction,
};
use voice_memos::waveform::WaveformStyle;

/// Engine whose players record commands and whose status channel the test drives
#[derive(Default)]
struct ScriptedEngine {
    fail_load: bool,
    commands: Arc<Mutex<Vec<&'static str>>>,
    unloaded: Arc<AtomicBool>,
    status_tx: Arc<Mutex<Option<mpsc::UnboundedSender<PlaybackStatus>>>>,
}

impl ScriptedEngine {
    fn push(&self, status: PlaybackStatus) {
        if let Some(tx) = self.status_tx.lock().unwrap().as_ref() {
            let _ = tx.send(status);
        }
    }

    fn commands(&self) -> Vec<&'static str> {
        self.commands.lock().unwrap().clone()
    }
}

struct ScriptedPlayer {
    commands: Arc<Mutex<Vec<&'static str>>>,
    unloaded: Arc<AtomicBool>,
}

impl PlayerHandle for ScriptedPlayer {
    fn play(&mut self) -> Result<()> {
        self.commands.lock().unwrap().push("play");
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.commands.lock().unwrap().push("pause");
        Ok(())
    }

    fn replay(&mut self) -> Result<()> {
        self.commands.lock().unwrap().push("replay");
        Ok(())
    }

    fn unload(&mut self) -> Result<()> {
        self.unloaded.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait::async_trait]
impl PlaybackEngine for ScriptedEngine {
    async fn load(
        &self,
        uri: &str,
        status_tx: mpsc::UnboundedSender<PlaybackStatus>,
    ) -> Result<Box<dyn PlayerHandle>> {
        if self.fail_load {
            anyhow::bail!("Cannot open {}", uri);
        }
        *self.status_tx.lock().unwrap() = Some(status_tx);
        Ok(Box::new(ScriptedPlayer {
            commands: Arc::clone(&self.commands),
            unloaded: Arc::clone(&self.unloaded),
        }))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn status(is_playing: bool, position_millis: u64) -> PlaybackStatus {
    PlaybackStatus {
        is_loaded: true,
        is_playing,
        position_millis,
        duration_millis: Some(10_000),
    }
}

fn write_test_wav(dir: &Path, name: &str, frames: usize, sample_rate: u32) -> Result<PathBuf> {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec)?;
    for i in 0..frames {
        writer.write_sample(((i % 100) as i16 - 50) * 100)?;
    }
    writer.finalize()?;
    Ok(path)
}

#[tokio::test]
async fn test_tap_toggle_preserves_position_across_pause() -> Result<()> {
    let engine = ScriptedEngine::default();
    let memo = Memo::new("memo://one".to_string(), vec![-20.0; 10]);
    let mut player = MemoPlayer::load(&engine, &memo).await;
    assert!(player.is_loaded());

    engine.push(status(false, 0));
    assert_eq!(player.toggle()?, ToggleAction::Replay);

    engine.push(status(true, 3_000));
    assert_eq!(player.toggle()?, ToggleAction::Pause);
    assert!(player.tracker().is_paused());

    engine.push(status(false, 3_000));
    assert_eq!(player.toggle()?, ToggleAction::Resume);
    assert!(!player.tracker().is_paused());

    engine.push(status(true, 3_016));
    player.pump();
    assert_eq!(player.tracker().position_millis(), 3_016);
    assert_eq!(engine.commands(), vec!["replay", "pause", "play"]);

    Ok(())
}

#[tokio::test]
async fn test_finished_memo_replays_from_start() -> Result<()> {
    let engine = ScriptedEngine::default();
    let memo = Memo::new("memo://one".to_string(), vec![]);
    let mut player = MemoPlayer::load(&engine, &memo).await;

    engine.push(status(false, 10_000));
    assert_eq!(player.toggle()?, ToggleAction::Replay);
    assert_eq!(player.tracker().progress(), 1.0);

    Ok(())
}

#[tokio::test]
async fn test_failed_load_makes_toggle_a_noop() -> Result<()> {
    let engine = ScriptedEngine {
        fail_load: true,
        ..Default::default()
    };
    let memo = Memo::new("memo://missing".to_string(), vec![-20.0]);
    let mut player = MemoPlayer::load(&engine, &memo).await;

    assert!(!player.is_loaded());
    assert_eq!(player.toggle()?, ToggleAction::None);
    assert!(engine.commands().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_drop_releases_sound() -> Result<()> {
    let engine = ScriptedEngine::default();
    let memo = Memo::new("memo://one".to_string(), vec![]);

    {
        let mut player = MemoPlayer::load(&engine, &memo).await;
        engine.push(status(false, 0));
        player.toggle()?;
        engine.push(status(true, 500));
        // Dropped mid-playback
    }

    assert!(engine.unloaded.load(Ordering::SeqCst), "Sound should be unloaded on drop");

    Ok(())
}

#[tokio::test]
async fn test_status_after_unload_is_ignored() -> Result<()> {
    let engine = ScriptedEngine::default();
    let memo = Memo::new("memo://one".to_string(), vec![-30.0; 4]);
    let mut player = MemoPlayer::load(&engine, &memo).await;

    engine.push(status(true, 5_000));
    player.pump();
    assert_eq!(player.tracker().progress(), 0.5);

    player.unload();
    assert!(engine.unloaded.load(Ordering::SeqCst));

    engine.push(status(true, 9_000));
    assert_eq!(player.pump(), 0);
    assert_eq!(player.tracker().progress(), 0.0);
    assert_eq!(player.toggle()?, ToggleAction::None);

    let view = player.view(&memo, 4, &WaveformStyle::default());
    assert!(view.bars.iter().all(|b| !b.played));

    Ok(())
}

#[test]
fn test_probe_duration_of_wav() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_test_wav(temp_dir.path(), "two-seconds.wav", 32_000, 16_000)?;

    assert_eq!(probe_duration_millis(&path)?, Some(2_000));
    assert!(probe_duration_millis(temp_dir.path().join("missing.wav")).is_err());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_clock_engine_pause_resume_and_finish() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_test_wav(temp_dir.path(), "one-second.wav", 16_000, 16_000)?;
    let memo = Memo::new(path.display().to_string(), vec![-20.0; 60]);

    let engine = ClockPlaybackEngine::new(Duration::from_millis(16));
    let mut player = MemoPlayer::load(&engine, &memo).await;
    assert!(player.is_loaded());

    tokio::time::sleep(Duration::from_millis(20)).await;
    player.pump();
    assert!(player.tracker().is_loaded());
    assert_eq!(player.tracker().duration_millis(), 1_000);
    assert!(!player.tracker().is_playing());

    assert_eq!(player.toggle()?, ToggleAction::Replay);
    tokio::time::sleep(Duration::from_millis(400)).await;
    player.pump();
    assert!(player.tracker().is_playing());
    let playing_at = player.tracker().position_millis();
    assert!((350..=450).contains(&playing_at), "position {}", playing_at);

    assert_eq!(player.toggle()?, ToggleAction::Pause);
    tokio::time::sleep(Duration::from_millis(20)).await;
    player.pump();
    let paused_at = player.tracker().position_millis();
    assert!(!player.tracker().is_playing());

    tokio::time::sleep(Duration::from_millis(300)).await;
    player.pump();
    assert_eq!(player.tracker().position_millis(), paused_at);

    assert_eq!(player.toggle()?, ToggleAction::Resume);
    tokio::time::sleep(Duration::from_millis(100)).await;
    player.pump();
    let resumed_at = player.tracker().position_millis();
    assert!(resumed_at > paused_at && resumed_at < paused_at + 200, "resumed at {}", resumed_at);

    tokio::time::sleep(Duration::from_millis(2_000)).await;
    player.pump();
    assert!(!player.tracker().is_playing());
    assert_eq!(player.tracker().position_millis(), 1_000);
    assert_eq!(player.tracker().progress(), 1.0);

    // Finished and not paused: the next tap starts over
    assert_eq!(player.toggle()?, ToggleAction::Replay);
    tokio::time::sleep(Duration::from_millis(20)).await;
    player.pump();
    assert!(player.tracker().position_millis() < 100);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_clock_engine_with_zero_interval_still_plays() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_test_wav(temp_dir.path(), "one-second.wav", 16_000, 16_000)?;
    let memo = Memo::new(path.display().to_string(), vec![-20.0; 60]);

    let engine = ClockPlaybackEngine::new(Duration::ZERO);
    assert_eq!(engine.progress_interval(), Duration::from_millis(1));

    let mut player = MemoPlayer::load(&engine, &memo).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    player.pump();
    assert!(player.tracker().is_loaded());

    assert_eq!(player.toggle()?, ToggleAction::Replay);
    tokio::time::sleep(Duration::from_millis(100)).await;
    player.pump();
    assert!(player.tracker().is_playing());
    assert!(player.tracker().position_millis() > 0);

    assert_eq!(player.toggle()?, ToggleAction::Pause);

    Ok(())
}

#[tokio::test]
async fn test_multiple_memos_play_concurrently() -> Result<()> {
    let first_engine = ScriptedEngine::default();
    let second_engine = ScriptedEngine::default();
    let first = Memo::new("memo://first".to_string(), vec![]);
    let second = Memo::new("memo://second".to_string(), vec![]);

    let mut first_player = MemoPlayer::load(&first_engine, &first).await;
    let mut second_player = MemoPlayer::load(&second_engine, &second).await;

    first_engine.push(status(false, 0));
    second_engine.push(status(false, 0));
    first_player.toggle()?;
    second_player.toggle()?;

    assert_eq!(first_engine.commands(), vec!["replay"]);
    assert_eq!(second_engine.commands(), vec!["replay"]);
    assert!(!first_engine.unloaded.load(Ordering::SeqCst));

    Ok(())
}

#[tokio::test]
async fn test_clock_engine_missing_file_stays_unloaded() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let memo = Memo::new(temp_dir.path().join("gone.wav").display().to_string(), vec![-20.0]);

    let engine = ClockPlaybackEngine::default();
    let result = engine.load(&memo.uri, mpsc::unbounded_channel().0).await;
    assert!(format!("{:#}", result.err().unwrap()).contains("Failed to open audio file"));

    let mut player = MemoPlayer::load(&engine, &memo).await;
    assert!(!player.is_loaded());
    assert_eq!(player.toggle()?, ToggleAction::None);

    Ok(())
}
