use chrono::Utc;
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::reddit::listing::{Listing, RawComment, RawPost};
use redpulse_core::domain::activity::{Comment, Post, Snapshot};
use redpulse_core::domain::keyword::KeywordMatcher;

pub const DEFAULT_BASE_URL: &str = "https://www.reddit.com";
const PAGE_LIMIT: &str = "100";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned {status} for {url}")]
    Status { status: StatusCode, url: String },
    #[error("malformed listing from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Submission,
    Comment,
}

impl ItemKind {
    pub fn tag(self) -> &'static str {
        match self {
            ItemKind::Submission => "t3",
            ItemKind::Comment => "t1",
        }
    }

    fn endpoint(self) -> &'static str {
        match self {
            ItemKind::Submission => "submitted",
            ItemKind::Comment => "comments",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ItemKind::Submission => "posts",
            ItemKind::Comment => "comments",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RedditClient {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
    matcher: KeywordMatcher,
}

impl RedditClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
        matcher: KeywordMatcher,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
            matcher,
        }
    }

    pub async fn fetch_snapshot(&self, username: &str) -> Result<Snapshot, UpstreamError> {
        let (posts, comments) = tokio::try_join!(
            self.fetch_posts(username),
            self.fetch_comments(username)
        )?;
        Ok(Snapshot {
            posts,
            comments,
            fetched_at: Utc::now().timestamp_millis(),
        })
    }

    pub async fn fetch_posts(&self, username: &str) -> Result<Vec<Post>, UpstreamError> {
        let raw: Vec<RawPost> = self.fetch_all_pages(username, ItemKind::Submission).await?;
        Ok(raw
            .into_iter()
            .map(|item| item.into_post(&self.matcher))
            .collect())
    }

    pub async fn fetch_comments(&self, username: &str) -> Result<Vec<Comment>, UpstreamError> {
        let raw: Vec<RawComment> = self.fetch_all_pages(username, ItemKind::Comment).await?;
        Ok(raw
            .into_iter()
            .map(|item| item.into_comment(&self.matcher))
            .collect())
    }

    fn listing_url(&self, username: &str, kind: ItemKind) -> String {
        format!("{}/user/{}/{}.json", self.base_url, username, kind.endpoint())
    }

    async fn fetch_all_pages<T>(
        &self,
        username: &str,
        kind: ItemKind,
    ) -> Result<Vec<T>, UpstreamError>
    where
        T: DeserializeOwned,
    {
        let url = self.listing_url(username, kind);
        let mut items = Vec::new();
        let mut after: Option<String> = None;
        let mut pages = 0usize;

        // Pages chain through the cursor, so they stay sequential.
        loop {
            let listing = self.fetch_page(&url, after.as_deref()).await?;
            pages += 1;
            let mut kept = 0usize;
            for child in listing.data.children {
                if child.kind != kind.tag() {
                    continue;
                }
                let item = serde_json::from_value(child.data).map_err(|source| {
                    UpstreamError::Malformed {
                        url: url.clone(),
                        source,
                    }
                })?;
                items.push(item);
                kept += 1;
            }
            debug!(kind = kind.label(), page = pages, kept, "listing page fetched");
            match listing.data.after.filter(|cursor| !cursor.is_empty()) {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        debug!(kind = kind.label(), pages, total = items.len(), "listing complete");
        Ok(items)
    }

    async fn fetch_page(&self, url: &str, after: Option<&str>) -> Result<Listing, UpstreamError> {
        let mut query = vec![("limit", PAGE_LIMIT), ("sort", "new"), ("raw_json", "1")];
        if let Some(cursor) = after {
            query.push(("after", cursor));
        }
        let response = self
            .http
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .query(&query)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status,
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| UpstreamError::Malformed {
            url: url.to_string(),
            source,
        })
    }
}
