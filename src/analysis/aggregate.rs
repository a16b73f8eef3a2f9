use std::collections::HashMap;

use crate::models::record::ClassifiedRecord;
use crate::models::report::{CategoryCount, CategorySummary};
use crate::taxonomy::CategoryCatalog;

/// Per-category counts and percentages over the filtered set. Every catalog
/// category appears in the result, zero-count ones included; an empty input
/// yields an all-zero summary instead of dividing by zero.
pub fn summarize(catalog: &CategoryCatalog, records: &[ClassifiedRecord]) -> CategorySummary {
    let mut counts_by_name: HashMap<&str, usize> = HashMap::new();
    for classified in records {
        *counts_by_name
            .entry(classified.classification.category.as_str())
            .or_insert(0) += 1;
    }

    let total = records.len();
    let counts = catalog
        .all()
        .map(|category| {
            let count = counts_by_name.get(category.name.as_str()).copied().unwrap_or(0);
            let percentage = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            };
            CategoryCount {
                category: category.name.clone(),
                count,
                percentage,
            }
        })
        .collect();

    CategorySummary { total, counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{Classification, ContentRecord, RecordKind};
    use chrono::{TimeZone, Utc};

    fn classified(category: &str) -> ClassifiedRecord {
        ClassifiedRecord {
            record: ContentRecord {
                kind: RecordKind::Post,
                id: "x".to_string(),
                title: String::new(),
                body: String::new(),
                subreddit: String::new(),
                author: String::new(),
                created_utc: Utc.timestamp_opt(0, 0).single().unwrap(),
                score: 0,
                upvote_ratio: None,
                num_comments: None,
                total_awards: 0,
                flair: None,
                is_original_content: false,
                over_18: false,
                spoiler: false,
                num_crossposts: 0,
                parent_id: None,
                is_submitter: None,
                permalink: String::new(),
                url: String::new(),
            },
            classification: Classification {
                category: category.to_string(),
                confidence: 0.5,
            },
        }
    }

    #[test]
    fn test_percentages_sum_to_100() {
        let catalog = CategoryCatalog::new();
        let records = vec![
            classified("Pain Points"),
            classified("Pain Points"),
            classified("Money Talk"),
            classified("General Discussion"),
        ];

        let summary = summarize(&catalog, &records);
        assert_eq!(summary.total, 4);

        let sum: f64 = summary.counts.iter().map(|c| c.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);

        let pain = summary.counts.iter().find(|c| c.category == "Pain Points").unwrap();
        assert_eq!(pain.count, 2);
        assert!((pain.percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_yields_all_zero_summary() {
        let catalog = CategoryCatalog::new();
        let summary = summarize(&catalog, &[]);

        assert_eq!(summary.total, 0);
        assert_eq!(summary.counts.len(), catalog.scored().len() + 1);
        assert!(summary.counts.iter().all(|c| c.count == 0 && c.percentage == 0.0));
    }

    #[test]
    fn test_every_category_listed_in_catalog_order() {
        let catalog = CategoryCatalog::new();
        let summary = summarize(&catalog, &[classified("Hot Discussions")]);

        let listed: Vec<_> = summary.counts.iter().map(|c| c.category.as_str()).collect();
        let expected: Vec<_> = catalog.all().map(|c| c.name.as_str()).collect();
        assert_eq!(listed, expected);
    }
}
