pub mod snapshot_file;

pub use snapshot_file::{load_snapshot, save_snapshot, SnapshotStoreError};
