use anyhow::Result;
use std::env;
use std::str::FromStr;
use crate::constants::{
    DEFAULT_FEED_PAGE_SIZE, DEFAULT_IDENTITY_HEADER, DEFAULT_SERVER_PORT, MAX_FEED_PAGE_SIZE,
};

/// Which backing store the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreKind::Postgres),
            "memory" | "mem" => Ok(StoreKind::Memory),
            other => Err(anyhow::anyhow!("STORE must be 'postgres' or 'memory', got '{}'", other)),
        }
    }
}

/// How much of a user's sent history `GET /user/reqs/sent` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentFilter {
    /// Every request the user ever sent, whatever its outcome.
    All,
    /// Only requests still waiting on someone.
    Pending,
}

impl FromStr for SentFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SentFilter::All),
            "pending" => Ok(SentFilter::Pending),
            other => Err(anyhow::anyhow!(
                "SENT_REQUESTS_FILTER must be 'all' or 'pending', got '{}'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_FEED_PAGE_SIZE,
            max_page_size: MAX_FEED_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store: StoreKind,
    pub allowed_origins: Vec<String>,
    pub identity_header: String,
    pub feed: FeedConfig,
    pub sent_filter: SentFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVER_PORT,
            store: StoreKind::Postgres,
            allowed_origins: Vec::new(),
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
            feed: FeedConfig::default(),
            sent_filter: SentFilter::All,
        }
    }
}

fn parsed_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store = match env::var("STORE") {
            Ok(value) => value.parse()?,
            Err(_) => StoreKind::Postgres,
        };

        let sent_filter = match env::var("SENT_REQUESTS_FILTER") {
            Ok(value) => value.parse()?,
            Err(_) => SentFilter::All,
        };

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let max_page_size = parsed_or("FEED_MAX_PAGE_SIZE", MAX_FEED_PAGE_SIZE).max(1);
        let default_page_size =
            parsed_or("FEED_DEFAULT_PAGE_SIZE", DEFAULT_FEED_PAGE_SIZE).clamp(1, max_page_size);

        Ok(Self {
            port: parsed_or("PORT", DEFAULT_SERVER_PORT),
            store,
            allowed_origins,
            identity_header: env::var("IDENTITY_HEADER")
                .unwrap_or_else(|_| DEFAULT_IDENTITY_HEADER.to_string())
                .to_ascii_lowercase(),
            feed: FeedConfig {
                default_page_size,
                max_page_size,
            },
            sent_filter,
        })
    }
}
