pub mod reddit;
pub mod storage;
