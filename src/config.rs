use crate::error::{Error, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub cache_ttl_secs: u64,
    pub max_posts: u32,
    pub page_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let client_id = env::var("REDDIT_CLIENT_ID")
            .map_err(|_| Error::Config("REDDIT_CLIENT_ID environment variable not set".to_string()))?;

        let client_secret = env::var("REDDIT_CLIENT_SECRET").map_err(|_| {
            Error::Config("REDDIT_CLIENT_SECRET environment variable not set".to_string())
        })?;

        let user_agent = env::var("REDDIT_USER_AGENT")
            .unwrap_or_else(|_| "subanalyzer/0.1 (discussion analyzer)".to_string());

        let cache_ttl_secs = env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        let max_posts = env::var("MAX_POSTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        let page_size = env::var("PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        Ok(Self {
            client_id,
            client_secret,
            user_agent,
            cache_ttl_secs,
            max_posts,
            page_size,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_posts: u32,
    pub cache_ttl_secs: u64,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_posts: config.max_posts,
            cache_ttl_secs: config.cache_ttl_secs,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_posts: 1000,
            cache_ttl_secs: 3600,
        }
    }
}
