use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::AppState;
use redpulse_core::domain::dashboard::{build_dashboard, DashboardFilter, DashboardView};
use redpulse_core::error::CoreError;
use redpulse_core::types::{Metric, TimeRange};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub range: Option<String>,
    pub metric: Option<String>,
    pub keyword: Option<bool>,
    pub comments_only: Option<bool>,
}

#[derive(Debug, Error)]
pub enum DashboardApiError {
    #[error("{0}")]
    InvalidQuery(#[from] CoreError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, DashboardApiError> {
    let (filter, metric) = parse_query(&query)?;
    let snapshot = state.current_snapshot().await;
    let view = build_dashboard(snapshot.as_deref(), &filter, metric, &Local::now());
    Ok(Json(view))
}

fn parse_query(query: &DashboardQuery) -> Result<(DashboardFilter, Metric), CoreError> {
    let range = query
        .range
        .as_deref()
        .map(TimeRange::parse)
        .transpose()?
        .unwrap_or_default();
    let metric = query
        .metric
        .as_deref()
        .map(Metric::parse)
        .transpose()?
        .unwrap_or_default();
    let filter = DashboardFilter {
        range,
        keyword_only: query.keyword.unwrap_or(false),
        comments_only: query.comments_only.unwrap_or(false),
    };
    Ok((filter, metric))
}

impl IntoResponse for DashboardApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            DashboardApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
