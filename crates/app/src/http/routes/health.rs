use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub username: String,
    pub snapshot: SnapshotStatus,
    pub refresh: RefreshStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotStatus {
    pub loaded: bool,
    pub posts: usize,
    pub comments: usize,
    pub fetched_at: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshStatus {
    pub interval_secs: u64,
    pub last_run_at: Option<String>,
    pub last_success_at: Option<String>,
    pub last_error: Option<String>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.current_snapshot().await;
    let refresh = state.refresh_health.lock().await.clone();

    Json(HealthResponse {
        status: "ok",
        username: state.config.username.clone(),
        snapshot: SnapshotStatus {
            loaded: snapshot.is_some(),
            posts: snapshot.as_ref().map_or(0, |s| s.posts.len()),
            comments: snapshot.as_ref().map_or(0, |s| s.comments.len()),
            fetched_at: snapshot.as_ref().map(|s| s.fetched_at),
        },
        refresh: RefreshStatus {
            interval_secs: state.config.poll_interval.as_secs(),
            last_run_at: refresh.last_run_at.map(format_time),
            last_success_at: refresh.last_success_at.map(format_time),
            last_error: refresh.last_error,
        },
    })
}

fn format_time(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}
