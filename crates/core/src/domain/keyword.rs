use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::error::CoreError;

// Brand spelling variants: hyphen, space, underscore, dot or no separator,
// plus the bare domain.
pub const DEFAULT_KEYWORD_PATTERN: &str = r"soma[-\s]?health|soma[_.]?health|soma-health\.co";

static DEFAULT_KEYWORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    build_regex(DEFAULT_KEYWORD_PATTERN).expect("invalid default keyword regex")
});

#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    regex: Regex,
}

impl KeywordMatcher {
    pub fn new(pattern: &str) -> Result<Self, CoreError> {
        Ok(Self {
            regex: build_regex(pattern)?,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn matches_post(&self, title: &str, selftext: &str) -> bool {
        self.is_match(selftext) || self.is_match(title)
    }

    pub fn matches_comment(&self, body: &str) -> bool {
        self.is_match(body)
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self {
            regex: DEFAULT_KEYWORD_REGEX.clone(),
        }
    }
}

fn build_regex(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}
