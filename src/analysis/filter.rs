use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::models::record::ClassifiedRecord;

/// Filter thresholds over classified records. Every dimension is optional;
/// an absent dimension constrains nothing. A record passes only when ALL
/// supplied constraints hold.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    pub min_score: Option<i64>,
    pub min_comments: Option<u64>,
    pub min_confidence: Option<f32>,
    pub allowed_categories: Option<HashSet<String>>,
    pub date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub over_18: Option<bool>,
    pub spoiler: Option<bool>,
    pub original_content_only: bool,
}

impl FilterConfig {
    pub fn matches(&self, classified: &ClassifiedRecord) -> bool {
        let record = &classified.record;

        if let Some(min_score) = self.min_score {
            if record.score < min_score {
                return false;
            }
        }

        if let Some(min_comments) = self.min_comments {
            if record.num_comments.unwrap_or(0) < min_comments {
                return false;
            }
        }

        if let Some(min_confidence) = self.min_confidence {
            if classified.classification.confidence < min_confidence {
                return false;
            }
        }

        if let Some(allowed) = &self.allowed_categories {
            if !allowed.contains(&classified.classification.category) {
                return false;
            }
        }

        if let Some((start, end)) = self.date_range {
            if record.created_utc < start || record.created_utc > end {
                return false;
            }
        }

        if let Some(over_18) = self.over_18 {
            if record.over_18 != over_18 {
                return false;
            }
        }

        if let Some(spoiler) = self.spoiler {
            if record.spoiler != spoiler {
                return false;
            }
        }

        if self.original_content_only && !record.is_original_content {
            return false;
        }

        true
    }

    /// Order-preserving filter pass.
    pub fn apply(&self, records: Vec<ClassifiedRecord>) -> Vec<ClassifiedRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
