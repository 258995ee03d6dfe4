pub mod snapshot_refresh;
