use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

/// Generic Reddit API envelope: every payload node is `{kind, data}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Thing<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    pub children: Vec<Thing<T>>,
    #[serde(default)]
    pub after: Option<String>,
}

pub type Listing<T> = Thing<ListingData<T>>;

#[derive(Debug, Clone, Deserialize)]
pub struct PostData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    pub subreddit: String,
    #[serde(default)]
    pub author: Option<String>,
    pub created_utc: f64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub upvote_ratio: Option<f64>,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub total_awards_received: u32,
    #[serde(default)]
    pub link_flair_text: Option<String>,
    #[serde(default)]
    pub is_original_content: bool,
    #[serde(default)]
    pub over_18: bool,
    #[serde(default)]
    pub spoiler: bool,
    #[serde(default)]
    pub num_crossposts: u32,
    pub permalink: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentData {
    pub id: String,
    pub parent_id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub author: Option<String>,
    pub created_utc: f64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub total_awards_received: u32,
    pub permalink: String,
    #[serde(default)]
    pub is_submitter: bool,
    /// Either an empty string or a nested comment listing.
    #[serde(default)]
    pub replies: serde_json::Value,
}

pub(crate) fn epoch_to_datetime(secs: f64) -> DateTime<Utc> {
    // Out-of-range timestamps collapse to the epoch rather than failing.
    Utc.timestamp_opt(secs as i64, 0).single().unwrap_or_default()
}

impl PostData {
    pub fn created_at(&self) -> DateTime<Utc> {
        epoch_to_datetime(self.created_utc)
    }
}

impl CommentData {
    pub fn created_at(&self) -> DateTime<Utc> {
        epoch_to_datetime(self.created_utc)
    }
}

/// Flattens a comment tree into depth-first order. Children with kind
/// "more" are unexpanded placeholders and are skipped.
pub fn flatten_comments(children: &[Thing<serde_json::Value>]) -> Vec<CommentData> {
    let mut out = Vec::new();
    for child in children {
        if child.kind != "t1" {
            continue;
        }
        match serde_json::from_value::<CommentData>(child.data.clone()) {
            Ok(comment) => {
                let replies = comment.replies.clone();
                out.push(comment);
                if let Ok(listing) = serde_json::from_value::<Listing<serde_json::Value>>(replies) {
                    out.extend(flatten_comments(&listing.data.children));
                }
            }
            Err(e) => {
                tracing::warn!("Skipping malformed comment node: {}", e);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn comment_node(id: &str, body: &str, replies: serde_json::Value) -> serde_json::Value {
        json!({
            "kind": "t1",
            "data": {
                "id": id,
                "parent_id": "t3_abc",
                "body": body,
                "subreddit": "selfhosted",
                "author": "someone",
                "created_utc": 1700000000.0,
                "score": 3,
                "permalink": format!("/r/selfhosted/comments/abc/x/{}/", id),
                "is_submitter": false,
                "replies": replies
            }
        })
    }

    #[test]
    fn test_listing_deserializes() {
        let raw = json!({
            "kind": "Listing",
            "data": {
                "children": [{
                    "kind": "t3",
                    "data": {
                        "id": "abc",
                        "title": "Self-hosted photo backup?",
                        "selftext": "Looking for recommendations",
                        "subreddit": "selfhosted",
                        "author": "alice",
                        "created_utc": 1700000000.0,
                        "score": 42,
                        "upvote_ratio": 0.97,
                        "num_comments": 12,
                        "permalink": "/r/selfhosted/comments/abc/x/",
                        "url": "https://www.reddit.com/r/selfhosted/comments/abc/x/"
                    }
                }],
                "after": "t3_abc"
            }
        });

        let listing: Listing<PostData> = serde_json::from_value(raw).unwrap();
        assert_eq!(listing.data.children.len(), 1);
        assert_eq!(listing.data.after.as_deref(), Some("t3_abc"));

        let post = &listing.data.children[0].data;
        assert_eq!(post.id, "abc");
        assert_eq!(post.num_comments, 12);
        assert_eq!(post.created_at().timestamp(), 1_700_000_000);
        // Fields absent from the payload fall back to defaults.
        assert!(!post.over_18);
        assert_eq!(post.num_crossposts, 0);
    }

    #[test]
    fn test_flatten_skips_more_nodes_and_keeps_depth_first_order() {
        let nested = json!({
            "kind": "Listing",
            "data": {
                "children": [comment_node("c2", "nested reply", json!(""))],
                "after": null
            }
        });
        let children_raw = json!([
            comment_node("c1", "top level", nested),
            { "kind": "more", "data": { "count": 57, "children": ["d1", "d2"] } },
            comment_node("c3", "second top level", json!(""))
        ]);

        let children: Vec<Thing<serde_json::Value>> = serde_json::from_value(children_raw).unwrap();
        let flat = flatten_comments(&children);

        let ids: Vec<_> = flat.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn test_replies_empty_string_is_accepted() {
        let children: Vec<Thing<serde_json::Value>> =
            serde_json::from_value(json!([comment_node("c1", "hello", json!(""))])).unwrap();
        let flat = flatten_comments(&children);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].body, "hello");
    }
}
