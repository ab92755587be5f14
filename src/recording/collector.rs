use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Level substituted for ticks where the engine had no reading
pub const SENTINEL_FLOOR_DB: f32 = -100.0;

/// Handle identifying one recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug)]
struct ActiveBuffer {
    session: SessionId,
    samples: Vec<f32>,
    absent: usize,
    last_level: Option<f32>,
}

/// Accumulates metering readings for the one in-progress recording
///
/// Readings are appended in arrival order. Readings addressed to any session
/// other than the active one, including any arriving after `finish`, are
/// ignored.
#[derive(Debug, Default)]
pub struct SampleCollector {
    active: Option<ActiveBuffer>,
}

impl SampleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin collecting for `session`, discarding anything collected so far
    pub fn start(&mut self, session: SessionId) {
        self.active = Some(ActiveBuffer {
            session,
            samples: Vec::new(),
            absent: 0,
            last_level: None,
        });
    }

    /// Record one metering tick. Returns whether the reading was accepted.
    pub fn on_sample(&mut self, session: SessionId, value: Option<f32>) -> bool {
        let Some(buffer) = self.active.as_mut().filter(|b| b.session == session) else {
            return false;
        };

        match value {
            Some(level) => {
                buffer.samples.push(level);
                buffer.last_level = Some(level);
            }
            None => {
                buffer.samples.push(SENTINEL_FLOOR_DB);
                buffer.absent += 1;
            }
        }

        true
    }

    /// Hand over the accumulated readings and return to idle
    pub fn finish(&mut self) -> Vec<f32> {
        self.active.take().map(|b| b.samples).unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn session(&self) -> Option<SessionId> {
        self.active.as_ref().map(|b| b.session)
    }

    /// Number of readings collected for the active session
    pub fn len(&self) -> usize {
        self.active.as_ref().map_or(0, |b| b.samples.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of ticks that carried no reading and were filled with the floor
    pub fn absent_count(&self) -> usize {
        self.active.as_ref().map_or(0, |b| b.absent)
    }

    /// Most recent defined reading of the active session
    pub fn last_level(&self) -> Option<f32> {
        self.active.as_ref().and_then(|b| b.last_level)
    }
}
