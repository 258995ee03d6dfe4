pub mod scheduler;
pub mod tasks;

use thiserror::Error;
use tracing::{info, warn};

use crate::state::AppState;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("upstream error: {0}")]
    Upstream(#[from] redpulse_infra::reddit::UpstreamError),
    #[error("snapshot store error: {0}")]
    Store(#[from] redpulse_infra::storage::SnapshotStoreError),
}

pub async fn start(state: AppState) -> Result<(), JobError> {
    let interval = state.config.poll_interval;
    info!(interval_secs = interval.as_secs(), "snapshot refresh scheduled");
    let refresh_state = state.clone();
    scheduler::run_interval("snapshot_refresh", interval, move || {
        let state = refresh_state.clone();
        async move {
            match tasks::snapshot_refresh::run(&state).await {
                Ok(stats) => info!(?stats, "snapshot refresh complete"),
                Err(err) => warn!(error = %err, "snapshot refresh failed"),
            }
            Ok(())
        }
    })
    .await
}
