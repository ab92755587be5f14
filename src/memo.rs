use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A finished recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memo {
    pub id: Uuid,
    /// Locator of the recorded asset
    pub uri: String,
    /// Metering readings captured while recording, oldest first
    pub metering: Vec<f32>,
    pub created_at: DateTime<Utc>,
}

impl Memo {
    pub fn new(uri: String, metering: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            uri,
            metering,
            created_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> MemoSummary {
        MemoSummary {
            id: self.id,
            uri: self.uri.clone(),
            samples_count: self.metering.len(),
            created_at: self.created_at,
        }
    }
}

/// Memo without its metering data, for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoSummary {
    pub id: Uuid,
    pub uri: String,
    pub samples_count: usize,
    pub created_at: DateTime<Utc>,
}

/// In-memory memo list, most recent first
#[derive(Debug, Default)]
pub struct MemoList {
    memos: Vec<Memo>,
}

impl MemoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepend(&mut self, memo: Memo) {
        self.memos.insert(0, memo);
    }

    pub fn get(&self, id: Uuid) -> Option<&Memo> {
        self.memos.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Memo> {
        self.memos.iter()
    }

    pub fn len(&self) -> usize {
        self.memos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memos.is_empty()
    }

    pub fn clear(&mut self) {
        self.memos.clear();
    }
}
