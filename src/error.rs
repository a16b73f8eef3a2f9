use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Reddit API error: {0}")]
    RedditApi(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Unexpected HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Subreddit not found: {0}")]
    SubredditNotFound(String),

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Invalid post URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}
