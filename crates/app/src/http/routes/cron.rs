use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::http::routes::reddit::FallbackBody;
use crate::jobs::tasks::snapshot_refresh;
use crate::jobs::JobError;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum CronApiError {
    #[error("refresh failed: {0}")]
    Job(#[from] JobError),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CronResponse {
    status: &'static str,
    posts: usize,
    comments: usize,
    fetched_at: i64,
}

pub async fn run_refresh(
    State(state): State<AppState>,
) -> Result<Json<CronResponse>, CronApiError> {
    let stats = snapshot_refresh::run(&state).await.inspect_err(|err| {
        warn!(error = %err, "on-demand refresh failed");
    })?;
    info!(?stats, "on-demand refresh complete");
    Ok(Json(CronResponse {
        status: "ok",
        posts: stats.posts,
        comments: stats.comments,
        fetched_at: stats.fetched_at,
    }))
}

impl IntoResponse for CronApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            CronApiError::Job(JobError::Upstream(_)) => StatusCode::BAD_GATEWAY,
            CronApiError::Job(JobError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(FallbackBody::new(self.to_string()))).into_response()
    }
}
