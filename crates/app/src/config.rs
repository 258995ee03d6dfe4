use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use redpulse_infra::reddit::DEFAULT_BASE_URL;

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_USERNAME: &str = "Bulky-Possibility216";
const DEFAULT_USER_AGENT: &str = "RedditAnalytics/1.0 (redpulse)";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 1800;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    pub username: String,
    pub reddit_base_url: String,
    pub user_agent: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub snapshot_path: Option<PathBuf>,
    pub keyword_pattern: Option<String>,
    pub cors_allow_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid socket address: {0}")]
    InvalidSocket(String),
    #[error("invalid integer for {0}: {1}")]
    InvalidNumber(&'static str, String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr_raw = read_string("REDPULSE_HTTP_ADDR", DEFAULT_HTTP_ADDR);
        let http_addr = http_addr_raw
            .parse()
            .map_err(|_| ConfigError::InvalidSocket(http_addr_raw.clone()))?;
        let username = read_string("REDPULSE_USERNAME", DEFAULT_USERNAME)
            .trim()
            .trim_start_matches("u/")
            .to_string();
        if !is_valid_username(&username) {
            return Err(ConfigError::InvalidValue("REDPULSE_USERNAME", username));
        }
        let reddit_base_url = read_string("REDPULSE_REDDIT_BASE_URL", DEFAULT_BASE_URL);
        if !reddit_base_url.starts_with("http://") && !reddit_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "REDPULSE_REDDIT_BASE_URL",
                reddit_base_url,
            ));
        }
        let user_agent = read_string("REDPULSE_USER_AGENT", DEFAULT_USER_AGENT);
        if user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidValue("REDPULSE_USER_AGENT", user_agent));
        }
        let poll_interval_secs =
            read_u64("REDPULSE_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        if poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "REDPULSE_POLL_INTERVAL_SECS",
                poll_interval_secs.to_string(),
            ));
        }
        let request_timeout_secs =
            read_u64("REDPULSE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let snapshot_path = read_optional_string("REDPULSE_SNAPSHOT_PATH").map(PathBuf::from);
        let keyword_pattern = read_optional_string("REDPULSE_KEYWORD_PATTERN");
        let cors_allow_origins = read_optional_string("REDPULSE_CORS_ALLOW_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        Ok(Self {
            http_addr,
            username,
            reddit_base_url,
            user_agent,
            poll_interval: Duration::from_secs(poll_interval_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
            snapshot_path,
            keyword_pattern,
            cors_allow_origins,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            username: DEFAULT_USERNAME.to_string(),
            reddit_base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            snapshot_path: None,
            keyword_pattern: None,
            cors_allow_origins: Vec::new(),
        }
    }
}

pub fn load_dotenv() -> Result<(), std::io::Error> {
    let path = Path::new(".env");
    if !path.exists() {
        return Ok(());
    }
    let contents = std::fs::read_to_string(path)?;
    for (key, value) in parse_dotenv(&contents) {
        if std::env::var_os(&key).is_none() {
            // Safety: runs before any task is spawned, so nothing reads the
            // environment concurrently.
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }
    Ok(())
}

fn read_string(key: &'static str, default: &'static str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn read_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber(key, raw))
}

fn read_optional_string(key: &'static str) -> Option<String> {
    let value = std::env::var(key).unwrap_or_default();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_valid_username(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .filter_map(parse_dotenv_line)
        .collect()
}

fn parse_dotenv_line(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = parse_dotenv_value(value.trim());
    Some((key.to_string(), value))
}

fn parse_dotenv_value(value: &str) -> String {
    if let Some(stripped) = value.strip_prefix('"').and_then(|inner| inner.strip_suffix('"')) {
        return unescape_double_quoted(stripped);
    }
    if let Some(stripped) = value.strip_prefix('\'').and_then(|inner| inner.strip_suffix('\'')) {
        return stripped.to_string();
    }
    value.to_string()
}

fn unescape_double_quoted(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => output.push('\n'),
                Some('r') => output.push('\r'),
                Some('t') => output.push('\t'),
                Some('\\') => output.push('\\'),
                Some('"') => output.push('"'),
                Some(other) => {
                    output.push('\\');
                    output.push(other);
                }
                None => output.push('\\'),
            }
        } else {
            output.push(ch);
        }
    }
    output
}
