use serde::{Deserialize, Serialize};

/// Status snapshot pushed by a playback engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub is_loaded: bool,
    pub is_playing: bool,
    pub position_millis: u64,
    /// Unknown until the engine has probed the asset
    pub duration_millis: Option<u64>,
}

/// What a tap on the play/pause control does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    /// No sound loaded
    None,
    Pause,
    /// Continue from the paused position
    Resume,
    /// Play from the start (never started, or finished)
    Replay,
}

/// Latest playback status for one memo plus the explicit pause flag
#[derive(Debug, Clone, Default)]
pub struct PlaybackTracker {
    status: Option<PlaybackStatus>,
    paused: bool,
}

impl PlaybackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_status_update(&mut self, status: PlaybackStatus) {
        self.status = Some(status);
    }

    pub fn status(&self) -> Option<&PlaybackStatus> {
        self.status.as_ref()
    }

    fn loaded(&self) -> Option<&PlaybackStatus> {
        self.status.as_ref().filter(|s| s.is_loaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded().is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.loaded().is_some_and(|s| s.is_playing)
    }

    /// Set by an explicit pause, cleared by resume
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn position_millis(&self) -> u64 {
        self.loaded().map_or(0, |s| s.position_millis)
    }

    pub fn duration_millis(&self) -> u64 {
        self.loaded().and_then(|s| s.duration_millis).unwrap_or(0)
    }

    /// Fraction of the memo played, in [0, 1]. Zero until loaded with a
    /// known, non-zero duration.
    pub fn progress(&self) -> f64 {
        match self.loaded() {
            Some(PlaybackStatus {
                position_millis,
                duration_millis: Some(duration),
                ..
            }) if *duration > 0 => (*position_millis as f64 / *duration as f64).min(1.0),
            _ => 0.0,
        }
    }

    /// Action a tap should take given whether a sound is loaded
    pub fn next_action(&self, sound_loaded: bool) -> ToggleAction {
        if !sound_loaded {
            ToggleAction::None
        } else if self.is_playing() {
            ToggleAction::Pause
        } else if self.paused {
            ToggleAction::Resume
        } else {
            ToggleAction::Replay
        }
    }

    /// Record that `action` was carried out
    pub fn apply(&mut self, action: ToggleAction) {
        match action {
            ToggleAction::Pause => self.paused = true,
            ToggleAction::Resume => self.paused = false,
            ToggleAction::Replay | ToggleAction::None => {}
        }
    }

    pub fn toggle(&mut self, sound_loaded: bool) -> ToggleAction {
        let action = self.next_action(sound_loaded);
        self.apply(action);
        action
    }

    /// Forget everything, as after the sound is unloaded
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Format milliseconds as `M:SS` (minutes unpadded, seconds truncated)
pub fn format_time(millis: u64) -> String {
    let minutes = millis / 60_000;
    let seconds = (millis % 60_000) / 1000;
    format!("{}:{:02}", minutes, seconds)
}
