use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::jobs::JobError;
use crate::state::AppState;
use redpulse_core::domain::activity::Snapshot;
use redpulse_infra::storage::{load_snapshot, save_snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshStats {
    pub posts: usize,
    pub comments: usize,
    pub fetched_at: i64,
}

impl From<&Snapshot> for RefreshStats {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            posts: snapshot.posts.len(),
            comments: snapshot.comments.len(),
            fetched_at: snapshot.fetched_at,
        }
    }
}

pub async fn run(state: &AppState) -> Result<RefreshStats, JobError> {
    let _running = state.refresh_lock.lock().await;
    {
        let mut health = state.refresh_health.lock().await;
        health.last_run_at = Some(Utc::now());
    }

    let snapshot = match state.reddit.fetch_snapshot(&state.config.username).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            let mut health = state.refresh_health.lock().await;
            health.last_error = Some(err.to_string());
            return Err(err.into());
        }
    };
    let stats = RefreshStats::from(&snapshot);

    if let Some(path) = state.config.snapshot_path.as_deref() {
        if let Err(err) = save_snapshot(path, &snapshot).await {
            warn!(error = %err, path = %path.display(), "snapshot persist failed");
        }
    }
    state.replace_snapshot(snapshot).await;

    {
        let mut health = state.refresh_health.lock().await;
        health.last_success_at = Some(Utc::now());
        health.last_error = None;
    }
    Ok(stats)
}

pub async fn scrape(state: &AppState, out: &Path) -> Result<RefreshStats, JobError> {
    info!(username = %state.config.username, "scraping user activity");
    let snapshot = state.reddit.fetch_snapshot(&state.config.username).await?;
    save_snapshot(out, &snapshot).await?;
    let stats = RefreshStats::from(&snapshot);
    info!(
        posts = stats.posts,
        comments = stats.comments,
        path = %out.display(),
        "snapshot saved"
    );
    Ok(stats)
}

pub async fn restore(state: &AppState) -> Result<Option<RefreshStats>, JobError> {
    let Some(path) = state.config.snapshot_path.as_deref() else {
        return Ok(None);
    };
    let Some(snapshot) = load_snapshot(path).await? else {
        info!(path = %path.display(), "no stored snapshot yet");
        return Ok(None);
    };
    let stats = RefreshStats::from(&snapshot);
    state.replace_snapshot(snapshot).await;
    info!(?stats, path = %path.display(), "stored snapshot restored");
    Ok(Some(stats))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::state::AppState;
    use crate::wiring::build_state;
    use crate::wiring::tests::{mock_state, mount_single_pages, offline_state};
    use redpulse_infra::storage::load_snapshot;
    use wiremock::MockServer;

    fn snapshot() -> Snapshot {
        Snapshot {
            posts: Vec::new(),
            comments: Vec::new(),
            fetched_at: 7,
        }
    }

    fn state_with_path(path: &Path) -> AppState {
        let mut config = (*offline_state().config).clone();
        config.snapshot_path = Some(path.to_path_buf());
        build_state(config).expect("state")
    }

    #[tokio::test]
    async fn failed_run_keeps_previous_snapshot() {
        let state = offline_state();
        let previous = state.replace_snapshot(snapshot()).await;

        let result = run(&state).await;
        assert!(matches!(result, Err(JobError::Upstream(_))));

        let current = state.current_snapshot().await.expect("snapshot kept");
        assert!(Arc::ptr_eq(&current, &previous));
        let health = state.refresh_health.lock().await.clone();
        assert!(health.last_run_at.is_some());
        assert!(health.last_success_at.is_none());
        assert!(health.last_error.is_some());
    }

    #[tokio::test]
    async fn successful_run_swaps_and_persists_snapshot() {
        let server = MockServer::start().await;
        mount_single_pages(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let state = mock_state(&server, Some(path.clone()));
        let previous = state.replace_snapshot(snapshot()).await;
        state.refresh_health.lock().await.last_error = Some("stale failure".to_string());

        let stats = run(&state).await.unwrap();
        assert_eq!((stats.posts, stats.comments), (1, 1));

        let current = state.current_snapshot().await.expect("snapshot");
        assert!(!Arc::ptr_eq(&current, &previous));
        assert_eq!(current.fetched_at, stats.fetched_at);
        assert_eq!(current.posts[0].created_utc, 1_700_000_000);
        assert!(current.posts[0].mentions_keyword);
        assert!(!current.comments[0].mentions_keyword);

        let stored = load_snapshot(&path).await.unwrap().expect("file written");
        assert_eq!(&stored, current.as_ref());

        let health = state.refresh_health.lock().await.clone();
        assert!(health.last_success_at.is_some());
        assert!(health.last_error.is_none());
    }

    #[tokio::test]
    async fn restore_loads_stored_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        save_snapshot(&path, &snapshot()).await.unwrap();
        let state = state_with_path(&path);

        let stats = restore(&state).await.unwrap();
        assert_eq!(
            stats,
            Some(RefreshStats {
                posts: 0,
                comments: 0,
                fetched_at: 7,
            })
        );
        assert_eq!(state.current_snapshot().await.unwrap().fetched_at, 7);
    }

    #[tokio::test]
    async fn restore_without_file_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_path(&dir.path().join("missing.json"));
        assert_eq!(restore(&state).await.unwrap(), None);
        assert!(state.current_snapshot().await.is_none());
    }
}
