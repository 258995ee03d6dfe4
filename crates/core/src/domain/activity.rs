use serde::{Deserialize, Serialize};

pub const REDDIT_ORIGIN: &str = "https://www.reddit.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub subreddit: String,
    pub score: i64,
    // Replies the post received upstream, not the comments fetched here.
    pub num_comments: i64,
    // Epoch seconds.
    pub created_utc: i64,
    pub selftext: String,
    pub permalink: String,
    pub mentions_keyword: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub subreddit: String,
    pub score: i64,
    pub body: String,
    // Epoch seconds.
    pub created_utc: i64,
    pub link_title: String,
    pub permalink: String,
    pub mentions_keyword: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    // Epoch milliseconds.
    pub fetched_at: i64,
}

impl Post {
    pub fn external_url(&self) -> String {
        external_url(&self.permalink)
    }
}

impl Comment {
    pub fn external_url(&self) -> String {
        external_url(&self.permalink)
    }
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && self.comments.is_empty()
    }
}

fn external_url(permalink: &str) -> String {
    if permalink.starts_with("http://") || permalink.starts_with("https://") {
        return permalink.to_string();
    }
    format!("{REDDIT_ORIGIN}{permalink}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            posts: vec![Post {
                id: "abc".to_string(),
                title: "Hello".to_string(),
                subreddit: "rust".to_string(),
                score: -3,
                num_comments: 12,
                created_utc: 1_700_000_123,
                selftext: String::new(),
                permalink: "/r/rust/comments/abc/hello/".to_string(),
                mentions_keyword: true,
            }],
            comments: vec![Comment {
                id: "def".to_string(),
                subreddit: "golang".to_string(),
                score: 7,
                body: "nice \"quote\"\nnext line".to_string(),
                created_utc: 1_700_000_000,
                link_title: "Parent".to_string(),
                permalink: "/r/golang/comments/x/y/def/".to_string(),
                mentions_keyword: false,
            }],
            fetched_at: 1_700_000_999_123,
        }
    }

    #[test]
    fn snapshot_json_round_trip() {
        let snapshot = sample();
        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn snapshot_uses_camel_case_wire_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["fetchedAt"], 1_700_000_999_123_i64);
        assert_eq!(value["posts"][0]["numComments"], 12);
        assert_eq!(value["posts"][0]["createdUtc"], 1_700_000_123);
        assert_eq!(value["posts"][0]["mentionsKeyword"], true);
        assert_eq!(value["comments"][0]["linkTitle"], "Parent");
    }

    #[test]
    fn external_url_prefixes_relative_permalink() {
        let snapshot = sample();
        assert_eq!(
            snapshot.posts[0].external_url(),
            "https://www.reddit.com/r/rust/comments/abc/hello/"
        );
    }
}
