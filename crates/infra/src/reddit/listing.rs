use serde::Deserialize;

use redpulse_core::domain::activity::{Comment, Post};
use redpulse_core::domain::keyword::KeywordMatcher;

#[derive(Debug, Deserialize)]
pub(crate) struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingData {
    #[serde(default)]
    pub children: Vec<ListingChild>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingChild {
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPost {
    id: String,
    #[serde(default)]
    title: Option<String>,
    subreddit: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: i64,
    created_utc: f64,
    #[serde(default)]
    selftext: Option<String>,
    permalink: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawComment {
    id: String,
    subreddit: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    body: Option<String>,
    created_utc: f64,
    #[serde(default)]
    link_title: Option<String>,
    permalink: String,
}

impl RawPost {
    pub fn into_post(self, matcher: &KeywordMatcher) -> Post {
        let title = self.title.unwrap_or_default();
        let selftext = self.selftext.unwrap_or_default();
        let mentions_keyword = matcher.matches_post(&title, &selftext);
        Post {
            id: self.id,
            title,
            subreddit: self.subreddit,
            score: self.score,
            num_comments: self.num_comments,
            created_utc: self.created_utc as i64,
            selftext,
            permalink: self.permalink,
            mentions_keyword,
        }
    }
}

impl RawComment {
    pub fn into_comment(self, matcher: &KeywordMatcher) -> Comment {
        let body = self.body.unwrap_or_default();
        let mentions_keyword = matcher.matches_comment(&body);
        Comment {
            id: self.id,
            subreddit: self.subreddit,
            score: self.score,
            body,
            created_utc: self.created_utc as i64,
            link_title: self.link_title.unwrap_or_default(),
            permalink: self.permalink,
            mentions_keyword,
        }
    }
}
