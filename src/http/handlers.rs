use super::state::AppState;
use crate::memo::{Memo, MemoSummary};
use crate::playback::{format_time, MemoPlayer, PlaybackEngine, PlaybackTracker, ToggleAction};
use crate::recording::SessionId;
use crate::waveform::{WaveformStyle, WaveformView};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{error, info, warn};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StartRecordingResponse {
    pub session_id: SessionId,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StopRecordingResponse {
    pub status: String,
    pub memo: Option<MemoSummary>,
}

#[derive(Debug, Deserialize)]
pub struct WaveformQuery {
    /// Bucket count (defaults to the configured waveform resolution)
    pub buckets: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PlaybackResponse {
    pub memo_id: Uuid,
    pub loaded: bool,
    pub is_playing: bool,
    pub paused: bool,
    pub progress: f64,
    pub position_millis: u64,
    pub duration_millis: u64,
    pub position_label: String,
    pub duration_label: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub action: ToggleAction,
    pub playback: PlaybackResponse,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

impl PlaybackResponse {
    fn from_player(player: &MemoPlayer) -> Self {
        let tracker = player.tracker();
        Self {
            memo_id: player.memo_id(),
            loaded: player.is_loaded(),
            is_playing: tracker.is_playing(),
            paused: tracker.is_paused(),
            progress: tracker.progress(),
            position_millis: tracker.position_millis(),
            duration_millis: tracker.duration_millis(),
            position_label: format_time(tracker.position_millis()),
            duration_label: format_time(tracker.duration_millis()),
        }
    }
}

async fn find_memo(state: &AppState, memo_id: Uuid) -> Option<Memo> {
    state.memos.read().await.get(memo_id).cloned()
}

/// Player for `memo`, loading its sound if not held yet
async fn loaded_player<'a>(
    players: &'a mut HashMap<Uuid, MemoPlayer>,
    engine: &dyn PlaybackEngine,
    memo: &Memo,
) -> &'a mut MemoPlayer {
    match players.entry(memo.id) {
        Entry::Occupied(mut entry) => {
            if !entry.get().is_loaded() {
                entry.insert(MemoPlayer::load(engine, memo).await);
            }
            entry.into_mut()
        }
        Entry::Vacant(entry) => entry.insert(MemoPlayer::load(engine, memo).await),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /memos/record/start
/// Start a new recording
pub async fn start_recording(State(state): State<AppState>) -> impl IntoResponse {
    let mut recorder = state.recorder.lock().await;

    if let Some(active) = recorder.active_session() {
        return error_response(
            StatusCode::CONFLICT,
            format!("Recording {} is already in progress", active),
        );
    }

    match recorder.start().await {
        Ok(session_id) => (
            StatusCode::OK,
            Json(StartRecordingResponse {
                session_id,
                status: "recording".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to start recording: {:#}", e),
        ),
    }
}

/// POST /memos/record/stop
/// Stop the active recording and store it as a memo
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    let mut recorder = state.recorder.lock().await;

    if !recorder.is_recording() {
        return error_response(StatusCode::CONFLICT, "No recording in progress".to_string());
    }

    match recorder.stop().await {
        Ok(Some(memo)) => {
            let summary = memo.summary();
            state.memos.write().await.prepend(memo);
            info!("Memo {} added", summary.id);
            (
                StatusCode::OK,
                Json(StopRecordingResponse {
                    status: "stopped".to_string(),
                    memo: Some(summary),
                }),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::OK,
            Json(StopRecordingResponse {
                status: "discarded".to_string(),
                memo: None,
            }),
        )
            .into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to stop recording: {:#}", e),
        ),
    }
}

/// GET /memos/record/level
/// Live level of the active recording
pub async fn recording_level(State(state): State<AppState>) -> impl IntoResponse {
    let mut recorder = state.recorder.lock().await;
    (StatusCode::OK, Json(recorder.level()))
}

/// GET /memos
/// List memos, most recent first
pub async fn list_memos(State(state): State<AppState>) -> impl IntoResponse {
    let memos = state.memos.read().await;
    let summaries: Vec<MemoSummary> = memos.iter().map(Memo::summary).collect();
    (StatusCode::OK, Json(summaries))
}

/// DELETE /memos
/// Clear the list, releasing every loaded sound
pub async fn clear_memos(State(state): State<AppState>) -> impl IntoResponse {
    let mut memos = state.memos.write().await;
    let cleared = memos.len();
    memos.clear();
    state.players.lock().await.clear();

    info!("Cleared {} memos", cleared);
    (StatusCode::OK, Json(ClearResponse { cleared }))
}

/// GET /memos/:memo_id/waveform
/// Bucketed waveform at the current playhead
pub async fn get_waveform(
    State(state): State<AppState>,
    Path(memo_id): Path<Uuid>,
    Query(query): Query<WaveformQuery>,
) -> impl IntoResponse {
    let Some(memo) = find_memo(&state, memo_id).await else {
        return error_response(StatusCode::NOT_FOUND, format!("Memo {} not found", memo_id));
    };

    let bucket_count = query.buckets.unwrap_or(state.waveform.bucket_count);
    if bucket_count == 0 {
        return error_response(StatusCode::BAD_REQUEST, "buckets must be at least 1".to_string());
    }

    let style = WaveformStyle::from(&state.waveform);
    let mut players = state.players.lock().await;
    let view = match players.get_mut(&memo_id) {
        Some(player) => player.view(&memo, bucket_count, &style),
        None => WaveformView::build(&memo.metering, bucket_count, &style, &PlaybackTracker::new()),
    };

    (StatusCode::OK, Json(view)).into_response()
}

/// POST /memos/:memo_id/toggle
/// Play, pause, resume or replay a memo
pub async fn toggle_playback(
    State(state): State<AppState>,
    Path(memo_id): Path<Uuid>,
) -> impl IntoResponse {
    // Memos before players, as in clear_memos; the memo stays listed while its sound loads
    let memos = state.memos.read().await;
    let Some(memo) = memos.get(memo_id) else {
        return error_response(StatusCode::NOT_FOUND, format!("Memo {} not found", memo_id));
    };

    let mut players = state.players.lock().await;
    let player = loaded_player(&mut players, state.playback_engine.as_ref(), memo).await;

    match player.toggle() {
        Ok(action) => (
            StatusCode::OK,
            Json(ToggleResponse {
                action,
                playback: PlaybackResponse::from_player(player),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to toggle playback: {:#}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to toggle playback: {:#}", e),
            )
        }
    }
}

/// GET /memos/:memo_id/playback
/// Playback state of a memo
pub async fn get_playback(
    State(state): State<AppState>,
    Path(memo_id): Path<Uuid>,
) -> impl IntoResponse {
    // Memos before players, as in clear_memos; the memo stays listed while its sound loads
    let memos = state.memos.read().await;
    let Some(memo) = memos.get(memo_id) else {
        return error_response(StatusCode::NOT_FOUND, format!("Memo {} not found", memo_id));
    };

    let mut players = state.players.lock().await;
    let player = loaded_player(&mut players, state.playback_engine.as_ref(), memo).await;
    player.pump();

    (StatusCode::OK, Json(PlaybackResponse::from_player(player))).into_response()
}

/// DELETE /memos/:memo_id/player
/// Release a memo's loaded sound
pub async fn unload_player(
    State(state): State<AppState>,
    Path(memo_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.players.lock().await.remove(&memo_id) {
        Some(_player) => (StatusCode::OK, "Unloaded").into_response(),
        None => {
            warn!("No sound loaded for memo {}", memo_id);
            error_response(
                StatusCode::NOT_FOUND,
                format!("No sound loaded for memo {}", memo_id),
            )
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
