use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::analysis::aggregate::summarize;
use crate::analysis::classifier::Classifier;
use crate::analysis::filter::FilterConfig;
use crate::cache::{Clock, FetchCache, SystemClock};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::record::{ClassifiedRecord, ContentRecord};
use crate::models::report::AnalysisReport;
use crate::reddit::ContentSource;

/// Fetch window for subreddit listings. Rolling windows are computed
/// against the pipeline clock at fetch time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeWindow {
    All,
    LastWeek,
    LastMonth,
    LastYear,
    Range {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl TimeWindow {
    pub fn bounds(&self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, DateTime<Utc>) {
        match self {
            TimeWindow::All => (None, now),
            TimeWindow::LastWeek => (Some(now - Duration::days(7)), now),
            TimeWindow::LastMonth => (Some(now - Duration::days(30)), now),
            TimeWindow::LastYear => (Some(now - Duration::days(365)), now),
            TimeWindow::Range { start, end } => (Some(*start), *end),
        }
    }

    fn cache_key(&self) -> String {
        match self {
            TimeWindow::All => "all".to_string(),
            TimeWindow::LastWeek => "week".to_string(),
            TimeWindow::LastMonth => "month".to_string(),
            TimeWindow::LastYear => "year".to_string(),
            TimeWindow::Range { start, end } => {
                format!("range:{}:{}", start.timestamp(), end.timestamp())
            }
        }
    }
}

/// Fetch, classify, filter, aggregate. Fetch results are cached with a TTL
/// so repeated runs inside the window reuse the last listing.
pub struct AnalysisPipeline {
    source: Arc<dyn ContentSource>,
    classifier: Classifier,
    cache: Mutex<FetchCache<Vec<ContentRecord>>>,
    clock: Arc<dyn Clock>,
    config: PipelineConfig,
}

impl AnalysisPipeline {
    pub fn new(source: impl ContentSource + 'static, config: PipelineConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        source: impl ContentSource + 'static,
        config: PipelineConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = FetchCache::with_ttl_secs(config.cache_ttl_secs);
        Self {
            source: Arc::new(source),
            classifier: Classifier::new(),
            cache: Mutex::new(cache),
            clock,
            config,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub async fn analyze_subreddit(
        &self,
        subreddit: &str,
        window: TimeWindow,
        filter: &FilterConfig,
    ) -> Result<AnalysisReport> {
        let now = self.clock.now();
        let (start, end) = window.bounds(now);
        let cache_key = format!("r/{}:{}", subreddit, window.cache_key());

        let records = match self.lookup(&cache_key, now).await {
            Some(records) => records,
            None => {
                let fetched = self
                    .source
                    .fetch_subreddit_posts(subreddit, start, end, self.config.max_posts)
                    .await?;
                tracing::info!("Fetched {} posts from r/{}", fetched.len(), subreddit);
                self.store(cache_key, fetched.clone(), now).await;
                fetched
            }
        };

        Ok(self.build_report(format!("r/{}", subreddit), records, filter, now))
    }

    pub async fn analyze_thread(&self, url: &str, filter: &FilterConfig) -> Result<AnalysisReport> {
        let now = self.clock.now();
        let cache_key = format!("thread:{}", url);

        let records = match self.lookup(&cache_key, now).await {
            Some(records) => records,
            None => {
                let fetched = self.source.fetch_thread(url).await?;
                tracing::info!("Fetched {} records from thread", fetched.len());
                self.store(cache_key, fetched.clone(), now).await;
                fetched
            }
        };

        Ok(self.build_report(url.to_string(), records, filter, now))
    }

    async fn lookup(&self, key: &str, now: DateTime<Utc>) -> Option<Vec<ContentRecord>> {
        let cache = self.cache.lock().await;
        let hit = cache.get(key, now);
        if hit.is_some() {
            tracing::debug!("Cache hit for {}", key);
        }
        hit
    }

    async fn store(&self, key: String, records: Vec<ContentRecord>, now: DateTime<Utc>) {
        let mut cache = self.cache.lock().await;
        cache.purge_expired(now);
        cache.insert(key, records, now);
    }

    fn build_report(
        &self,
        source: String,
        records: Vec<ContentRecord>,
        filter: &FilterConfig,
        now: DateTime<Utc>,
    ) -> AnalysisReport {
        let total_fetched = records.len();

        let classified: Vec<ClassifiedRecord> = records
            .into_iter()
            .map(|record| {
                let classification = self.classifier.classify_record(&record);
                ClassifiedRecord {
                    record,
                    classification,
                }
            })
            .collect();

        let filtered = filter.apply(classified);
        let summary = summarize(self.classifier.catalog(), &filtered);

        AnalysisReport {
            source,
            fetched_at: now,
            total_fetched,
            records: filtered,
            summary,
        }
    }
}
