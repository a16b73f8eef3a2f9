pub mod client;
pub mod paginator;
pub mod rate_limiter;
pub mod source;

pub use client::RedditClient;
pub use paginator::Paginator;
pub use rate_limiter::RateLimiter;
pub use source::ContentSource;
