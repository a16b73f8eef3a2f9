use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::record::ContentRecord;

/// Fetch boundary consumed by the analysis pipeline. The production
/// implementation is `RedditClient`; tests drive the pipeline with stubs.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Posts from a subreddit's new-listing, newest first, restricted to
    /// `start..=end` on creation time. `start = None` means unbounded.
    async fn fetch_subreddit_posts(
        &self,
        subreddit: &str,
        start: Option<DateTime<Utc>>,
        end: DateTime<Utc>,
        max_posts: u32,
    ) -> Result<Vec<ContentRecord>>;

    /// One submission plus its flattened comment tree.
    async fn fetch_thread(&self, url: &str) -> Result<Vec<ContentRecord>>;
}
