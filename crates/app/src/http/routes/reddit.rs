use axum::extract::State;
use axum::http::header::CACHE_CONTROL;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::state::AppState;
use redpulse_core::domain::activity::{Comment, Post};

const SNAPSHOT_CACHE_CONTROL: &str = "public, s-maxage=1800, stale-while-revalidate=3600";

#[derive(Debug, Error)]
pub enum SnapshotApiError {
    #[error("no snapshot available yet")]
    NotReady,
    #[error("no snapshot available: {0}")]
    RefreshFailed(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackBody {
    pub error: String,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub fetched_at: i64,
}

impl FallbackBody {
    pub fn new(error: String) -> Self {
        Self {
            error,
            posts: Vec::new(),
            comments: Vec::new(),
            fetched_at: Utc::now().timestamp_millis(),
        }
    }
}

pub async fn get_snapshot(State(state): State<AppState>) -> Result<Response, SnapshotApiError> {
    let Some(snapshot) = state.current_snapshot().await else {
        let last_error = state.refresh_health.lock().await.last_error.clone();
        return Err(match last_error {
            Some(message) => SnapshotApiError::RefreshFailed(message),
            None => SnapshotApiError::NotReady,
        });
    };
    Ok(([(CACHE_CONTROL, SNAPSHOT_CACHE_CONTROL)], Json(snapshot.as_ref())).into_response())
}

impl IntoResponse for SnapshotApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            SnapshotApiError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            SnapshotApiError::RefreshFailed(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(FallbackBody::new(self.to_string()))).into_response()
    }
}
