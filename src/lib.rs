pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod reddit;
pub mod taxonomy;

pub use analysis::{AnalysisPipeline, Classifier, FilterConfig, TimeWindow};
pub use cache::{Clock, FetchCache, SystemClock};
pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use reddit::{ContentSource, RedditClient};
pub use taxonomy::CategoryCatalog;
