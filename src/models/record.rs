use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::post::{CommentData, PostData};

pub const REDDIT_BASE_URL: &str = "https://www.reddit.com";

const DELETED_AUTHOR: &str = "[deleted]";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecordKind {
    Post,
    Comment,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Post => write!(f, "post"),
            RecordKind::Comment => write!(f, "comment"),
        }
    }
}

/// Flattened view of a fetched post or comment. Read-only once built;
/// missing text fields become empty strings rather than errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub kind: RecordKind,
    pub id: String,
    pub title: String,
    pub body: String,
    pub subreddit: String,
    pub author: String,
    pub created_utc: DateTime<Utc>,
    pub score: i64,
    pub upvote_ratio: Option<f64>,
    pub num_comments: Option<u64>,
    pub total_awards: u32,
    pub flair: Option<String>,
    pub is_original_content: bool,
    pub over_18: bool,
    pub spoiler: bool,
    pub num_crossposts: u32,
    pub parent_id: Option<String>,
    pub is_submitter: Option<bool>,
    pub permalink: String,
    pub url: String,
}

impl From<PostData> for ContentRecord {
    fn from(post: PostData) -> Self {
        let created_utc = post.created_at();
        Self {
            kind: RecordKind::Post,
            id: post.id,
            title: post.title,
            body: post.selftext,
            subreddit: post.subreddit,
            author: post.author.unwrap_or_else(|| DELETED_AUTHOR.to_string()),
            created_utc,
            score: post.score,
            upvote_ratio: post.upvote_ratio,
            num_comments: Some(post.num_comments),
            total_awards: post.total_awards_received,
            flair: post.link_flair_text,
            is_original_content: post.is_original_content,
            over_18: post.over_18,
            spoiler: post.spoiler,
            num_crossposts: post.num_crossposts,
            parent_id: None,
            is_submitter: None,
            permalink: format!("{}{}", REDDIT_BASE_URL, post.permalink),
            url: post.url,
        }
    }
}

impl From<CommentData> for ContentRecord {
    fn from(comment: CommentData) -> Self {
        let created_utc = comment.created_at();
        let permalink = format!("{}{}", REDDIT_BASE_URL, comment.permalink);
        Self {
            kind: RecordKind::Comment,
            id: comment.id,
            title: String::new(),
            body: comment.body,
            subreddit: comment.subreddit,
            author: comment.author.unwrap_or_else(|| DELETED_AUTHOR.to_string()),
            created_utc,
            score: comment.score,
            upvote_ratio: None,
            num_comments: None,
            total_awards: comment.total_awards_received,
            flair: None,
            is_original_content: false,
            over_18: false,
            spoiler: false,
            num_crossposts: 0,
            parent_id: Some(comment.parent_id),
            is_submitter: Some(comment.is_submitter),
            url: permalink.clone(),
            permalink,
        }
    }
}

/// The (category, confidence) pair assigned to one record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub category: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub record: ContentRecord,
    pub classification: Classification,
}
