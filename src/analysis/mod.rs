pub mod aggregate;
pub mod classifier;
pub mod filter;
pub mod pipeline;

pub use aggregate::summarize;
pub use classifier::{Classifier, ClassifierWeights};
pub use filter::FilterConfig;
pub use pipeline::{AnalysisPipeline, TimeWindow};
