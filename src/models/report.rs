use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::record::ClassifiedRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
    pub percentage: f64,
}

/// Per-category distribution over the filtered record set. Covers every
/// catalog category, so percentages sum to 100 whenever `total > 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub total: usize,
    pub counts: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Human-readable source: "r/selfhosted" or the thread URL.
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    /// Records fetched before filtering.
    pub total_fetched: usize,
    /// Records that passed the filter, in fetch order.
    pub records: Vec<ClassifiedRecord>,
    pub summary: CategorySummary,
}
