use std::io::ErrorKind;
use std::path::Path;

use thiserror::Error;
use tokio::fs;

use redpulse_core::domain::activity::Snapshot;

#[derive(Debug, Error)]
pub enum SnapshotStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub async fn load_snapshot(path: &Path) -> Result<Option<Snapshot>, SnapshotStoreError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

// Writes pretty JSON next to `path` and renames it into place, so readers
// never observe a half-written file.
pub async fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), SnapshotStoreError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec_pretty(snapshot)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
