use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::config::AppConfig;
use redpulse_core::domain::activity::Snapshot;
use redpulse_infra::reddit::RedditClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub reddit: RedditClient,
    // Latest snapshot. Readers clone the `Arc`; a refresh swaps it whole.
    pub snapshot: Arc<RwLock<Option<Arc<Snapshot>>>>,
    pub refresh_health: Arc<Mutex<RefreshHealth>>,
    // Serializes pipeline runs between the scheduler and the cron route.
    pub refresh_lock: Arc<Mutex<()>>,
}

#[derive(Debug, Clone, Default)]
pub struct RefreshHealth {
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, reddit: RedditClient) -> Self {
        Self {
            config: Arc::new(config),
            reddit,
            snapshot: Arc::new(RwLock::new(None)),
            refresh_health: Arc::new(Mutex::new(RefreshHealth::default())),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn current_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().await.clone()
    }

    pub async fn replace_snapshot(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        *self.snapshot.write().await = Some(Arc::clone(&snapshot));
        snapshot
    }
}
