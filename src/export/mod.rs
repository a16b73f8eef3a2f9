use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::record::ClassifiedRecord;
use crate::models::report::AnalysisReport;

/// One CSV row per record: the flat record fields, with the category name
/// and confidence appended as the last two columns.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    kind: String,
    id: &'a str,
    title: &'a str,
    body: &'a str,
    subreddit: &'a str,
    author: &'a str,
    created_utc: String,
    score: i64,
    upvote_ratio: Option<f64>,
    num_comments: Option<u64>,
    total_awards: u32,
    flair: Option<&'a str>,
    is_original_content: bool,
    over_18: bool,
    spoiler: bool,
    num_crossposts: u32,
    parent_id: Option<&'a str>,
    is_submitter: Option<bool>,
    permalink: &'a str,
    url: &'a str,
    category: &'a str,
    confidence: f32,
}

impl<'a> From<&'a ClassifiedRecord> for ExportRow<'a> {
    fn from(classified: &'a ClassifiedRecord) -> Self {
        let record = &classified.record;
        Self {
            kind: record.kind.to_string(),
            id: &record.id,
            title: &record.title,
            body: &record.body,
            subreddit: &record.subreddit,
            author: &record.author,
            created_utc: record.created_utc.to_rfc3339(),
            score: record.score,
            upvote_ratio: record.upvote_ratio,
            num_comments: record.num_comments,
            total_awards: record.total_awards,
            flair: record.flair.as_deref(),
            is_original_content: record.is_original_content,
            over_18: record.over_18,
            spoiler: record.spoiler,
            num_crossposts: record.num_crossposts,
            parent_id: record.parent_id.as_deref(),
            is_submitter: record.is_submitter,
            permalink: &record.permalink,
            url: &record.url,
            category: &classified.classification.category,
            confidence: classified.classification.confidence,
        }
    }
}

pub fn to_csv(records: &[ClassifiedRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for classified in records {
        writer.serialize(ExportRow::from(classified))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Export(format!("failed to flush csv buffer: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(format!("invalid utf-8 in csv: {}", e)))
}

/// Full report (records plus category summary) as pretty-printed JSON.
pub fn to_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{Classification, ContentRecord, RecordKind};
    use crate::models::report::{CategoryCount, CategorySummary};
    use chrono::{TimeZone, Utc};

    fn classified(id: &str, title: &str, category: &str, confidence: f32) -> ClassifiedRecord {
        ClassifiedRecord {
            record: ContentRecord {
                kind: RecordKind::Post,
                id: id.to_string(),
                title: title.to_string(),
                body: "short body".to_string(),
                subreddit: "selfhosted".to_string(),
                author: "alice".to_string(),
                created_utc: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap(),
                score: 42,
                upvote_ratio: Some(0.97),
                num_comments: Some(12),
                total_awards: 1,
                flair: Some("Help".to_string()),
                is_original_content: false,
                over_18: false,
                spoiler: false,
                num_crossposts: 0,
                parent_id: None,
                is_submitter: None,
                permalink: "https://www.reddit.com/r/selfhosted/comments/abc/".to_string(),
                url: "https://example.com".to_string(),
            },
            classification: Classification {
                category: category.to_string(),
                confidence,
            },
        }
    }

    #[test]
    fn test_csv_has_header_and_one_row_per_record() {
        let records = vec![
            classified("p1", "first", "Pain Points", 0.6),
            classified("p2", "second", "Money Talk", 0.3),
        ];
        let csv = to_csv(&records).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("kind,id,title,body"));
        assert!(lines[0].ends_with("category,confidence"));
        assert!(lines[1].contains("Pain Points"));
        assert!(lines[2].contains("Money Talk"));
    }

    #[test]
    fn test_csv_quotes_multiline_bodies() {
        let mut record = classified("p1", "first", "Pain Points", 0.6);
        record.record.body = "line one\nline two".to_string();
        let csv = to_csv(&[record]).unwrap();
        // The embedded newline must stay inside a quoted field.
        assert!(csv.contains("\"line one\nline two\""));
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        assert_eq!(reader.records().count(), 1);
    }

    #[test]
    fn test_empty_record_set_yields_empty_csv() {
        // Serde-driven headers only appear once a row is written.
        let csv = to_csv(&[]).unwrap();
        assert!(csv.is_empty());
    }

    #[test]
    fn test_json_report_round_trips() {
        let report = AnalysisReport {
            source: "r/selfhosted".to_string(),
            fetched_at: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap(),
            total_fetched: 1,
            records: vec![classified("p1", "first", "Pain Points", 0.6)],
            summary: CategorySummary {
                total: 1,
                counts: vec![CategoryCount {
                    category: "Pain Points".to_string(),
                    count: 1,
                    percentage: 100.0,
                }],
            },
        };

        let json = to_json(&report).unwrap();
        let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].classification.category, "Pain Points");
        assert_eq!(parsed.summary.total, 1);
    }
}
