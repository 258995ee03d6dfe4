pub mod client;
mod listing;

pub use client::{ItemKind, RedditClient, UpstreamError, DEFAULT_BASE_URL};
