use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use reqwest::{header, Client, StatusCode};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::post::{flatten_comments, Listing, PostData};
use crate::models::record::ContentRecord;
use crate::reddit::paginator::Paginator;
use crate::reddit::rate_limiter::RateLimiter;
use crate::reddit::source::ContentSource;

const AUTH_BASE_URL: &str = "https://www.reddit.com";
const API_BASE_URL: &str = "https://oauth.reddit.com";

// Refresh the app-only token a minute before Reddit expires it.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct RedditClient {
    http: Client,
    rate_limiter: RateLimiter,
    token: Mutex<Option<CachedToken>>,
    client_id: String,
    client_secret: String,
    page_size: u32,
    auth_base: String,
    api_base: String,
}

impl RedditClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)?,
        );

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            rate_limiter: RateLimiter::new(),
            token: Mutex::new(None),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            page_size: config.page_size,
            auth_base: AUTH_BASE_URL.to_string(),
            api_base: API_BASE_URL.to_string(),
        })
    }

    /// App-only OAuth2 token (client-credentials grant), cached until close
    /// to expiry.
    async fn bearer(&self) -> Result<String> {
        let mut guard = self.token.lock().await;

        if let Some(token) = guard.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_EXPIRY_MARGIN {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!("Requesting app-only access token");
        let response = self
            .http
            .post(format!("{}/api/v1/access_token", self.auth_base))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "token request failed: {} - {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;
        let value = token.access_token.clone();
        *guard = Some(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });

        Ok(value)
    }
}

#[async_trait]
impl ContentSource for RedditClient {
    async fn fetch_subreddit_posts(
        &self,
        subreddit: &str,
        start: Option<DateTime<Utc>>,
        end: DateTime<Utc>,
        max_posts: u32,
    ) -> Result<Vec<ContentRecord>> {
        let bearer = self.bearer().await?;
        let base_url = format!("{}/r/{}/new?raw_json=1", self.api_base, subreddit);
        tracing::info!("Fetching posts from r/{}", subreddit);

        let pb = ProgressBar::new_spinner();
        pb.set_message(format!("Collecting posts from r/{}", subreddit));

        let paginator = Paginator::new(&self.http, &self.rate_limiter);
        let posts: Vec<PostData> = paginator
            .fetch_while(&base_url, &bearer, self.page_size, max_posts, |post: &PostData| {
                pb.tick();
                match start {
                    Some(start) => post.created_at() >= start,
                    None => true,
                }
            })
            .await
            .map_err(|e| match e {
                Error::HttpStatus { status: 404, .. } => {
                    Error::SubredditNotFound(subreddit.to_string())
                }
                other => other,
            })?;

        pb.finish_and_clear();

        Ok(posts
            .into_iter()
            .filter(|post| post.created_at() <= end)
            .map(ContentRecord::from)
            .collect())
    }

    async fn fetch_thread(&self, url: &str) -> Result<Vec<ContentRecord>> {
        let article = parse_article_id(url)?;
        let bearer = self.bearer().await?;

        self.rate_limiter.wait().await;
        let request_url = format!(
            "{}/comments/{}?raw_json=1&limit=500&depth=10",
            self.api_base, article
        );
        tracing::info!("Fetching thread {}", article);

        let response = self
            .http
            .get(&request_url)
            .bearer_auth(&bearer)
            .send()
            .await?;
        self.rate_limiter.update_from_response(&response);

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::PostNotFound(url.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RedditApi(format!(
                "Failed to fetch thread {}: {} - {}",
                article, status, body
            )));
        }

        // The comments endpoint answers with a two-element array: the
        // submission listing, then the comment tree.
        let (post_listing, comment_listing): (Listing<PostData>, Listing<serde_json::Value>) =
            response.json().await?;

        let mut records: Vec<ContentRecord> = post_listing
            .data
            .children
            .into_iter()
            .map(|thing| ContentRecord::from(thing.data))
            .collect();

        let comments = flatten_comments(&comment_listing.data.children);
        tracing::info!("Flattened {} comments", comments.len());
        records.extend(comments.into_iter().map(ContentRecord::from));

        Ok(records)
    }
}

/// Extracts the article id from a submission URL. Accepts full permalinks
/// (`…/comments/<id>/<slug>/`) and redd.it short links.
pub fn parse_article_id(url: &str) -> Result<String> {
    let trimmed = url
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");

    let mut segments = trimmed.split('/').filter(|s| !s.is_empty());
    let host = segments.next().unwrap_or_default();
    let rest: Vec<&str> = segments.collect();

    if host.ends_with("redd.it") {
        return rest
            .first()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::InvalidUrl(url.to_string()));
    }

    if let Some(pos) = rest.iter().position(|s| *s == "comments") {
        if let Some(id) = rest.get(pos + 1) {
            return Ok(id.to_string());
        }
    }

    Err(Error::InvalidUrl(url.to_string()))
}
