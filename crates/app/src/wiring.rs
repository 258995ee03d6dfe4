use reqwest::Client;
use thiserror::Error;

use crate::config::AppConfig;
use crate::state::AppState;
use redpulse_core::domain::keyword::KeywordMatcher;
use redpulse_core::error::CoreError;
use redpulse_infra::reddit::RedditClient;

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("keyword matcher error: {0}")]
    Keyword(#[from] CoreError),
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub fn build_state(config: AppConfig) -> Result<AppState, WiringError> {
    let matcher = match config.keyword_pattern.as_deref() {
        Some(pattern) => KeywordMatcher::new(pattern)?,
        None => KeywordMatcher::default(),
    };
    let client = Client::builder().timeout(config.request_timeout).build()?;
    let reddit = RedditClient::new(
        client,
        config.reddit_base_url.clone(),
        config.user_agent.clone(),
        matcher,
    );
    Ok(AppState::new(config, reddit))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::build_state;
    use crate::config::AppConfig;
    use crate::state::AppState;

    pub(crate) const MOCK_USERNAME: &str = "alice";

    pub(crate) fn offline_state() -> AppState {
        let config = AppConfig {
            reddit_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout: Duration::from_secs(2),
            ..AppConfig::default()
        };
        build_state(config).expect("state")
    }

    pub(crate) fn mock_state(server: &MockServer, snapshot_path: Option<PathBuf>) -> AppState {
        let config = AppConfig {
            username: MOCK_USERNAME.to_string(),
            reddit_base_url: server.uri(),
            request_timeout: Duration::from_secs(2),
            snapshot_path,
            ..AppConfig::default()
        };
        build_state(config).expect("state")
    }

    pub(crate) async fn mount_single_pages(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(format!("/user/{MOCK_USERNAME}/submitted.json")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "Listing",
                "data": {
                    "after": null,
                    "children": [{
                        "kind": "t3",
                        "data": {
                            "id": "p1",
                            "title": "Trying soma health",
                            "subreddit": "rust",
                            "score": 5,
                            "num_comments": 2,
                            "created_utc": 1_700_000_000.5,
                            "selftext": "",
                            "permalink": "/r/rust/comments/p1/"
                        }
                    }]
                }
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/user/{MOCK_USERNAME}/comments.json")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "Listing",
                "data": {
                    "after": null,
                    "children": [{
                        "kind": "t1",
                        "data": {
                            "id": "c1",
                            "subreddit": "tokio",
                            "score": 1,
                            "body": "nice",
                            "created_utc": 1_700_000_100.0,
                            "link_title": "parent",
                            "permalink": "/r/tokio/comments/x/y/c1/"
                        }
                    }]
                }
            })))
            .mount(server)
            .await;
    }

    #[test]
    fn rejects_invalid_keyword_pattern() {
        let config = AppConfig {
            keyword_pattern: Some("(".to_string()),
            ..AppConfig::default()
        };
        assert!(build_state(config).is_err());
    }
}
