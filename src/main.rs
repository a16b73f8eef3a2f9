use chrono::{Duration, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use subanalyzer::models::{AnalysisReport, ClassifiedRecord};
use subanalyzer::{
    export, AnalysisPipeline, CategoryCatalog, Config, FilterConfig, PipelineConfig, RedditClient,
    TimeWindow,
};

#[derive(Parser, Debug)]
#[command(name = "subanalyzer")]
#[command(version = "0.1.0")]
#[command(about = "Analyze subreddit discussions with keyword-based topic classification")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output format (text, markdown, csv, json)
    #[arg(short, long, default_value = "text", global = true)]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<String>,

    #[command(flatten)]
    filters: FilterArgs,
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Keep records with at least this score
    #[arg(long, global = true)]
    min_score: Option<i64>,

    /// Keep posts with at least this many comments
    #[arg(long, global = true)]
    min_comments: Option<u64>,

    /// Keep records classified with at least this confidence (0.0 - 1.0)
    #[arg(long, global = true)]
    min_confidence: Option<f32>,

    /// Restrict to these categories (comma-separated names)
    #[arg(long, value_delimiter = ',', global = true)]
    categories: Vec<String>,

    /// Require the NSFW flag to match (true or false)
    #[arg(long, global = true)]
    nsfw: Option<bool>,

    /// Require the spoiler flag to match (true or false)
    #[arg(long, global = true)]
    spoiler: Option<bool>,

    /// Keep only posts flagged as original content
    #[arg(long, global = true)]
    oc_only: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze recent posts from a subreddit
    Subreddit {
        /// Subreddit name, without the r/ prefix
        name: String,

        /// Time window (all, week, month, year)
        #[arg(long, default_value = "all")]
        window: String,

        /// Start date (YYYY-MM-DD, inclusive); use together with --to
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD, inclusive); use together with --from
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Analyze a single post and its comment tree
    Post {
        /// Full permalink or redd.it short link
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("subanalyzer=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    let catalog = CategoryCatalog::new();
    let filter = build_filter(&args.filters, &catalog)?;

    let client = RedditClient::new(&config)?;
    let pipeline = AnalysisPipeline::new(client, PipelineConfig::from(&config));

    let report = match &args.command {
        Command::Subreddit {
            name,
            window,
            from,
            to,
        } => {
            let window = resolve_window(window, *from, *to)?;
            tracing::info!("Starting analysis for r/{}", name);
            pipeline.analyze_subreddit(name, window, &filter).await?
        }
        Command::Post { url } => {
            tracing::info!("Starting analysis for {}", url);
            pipeline.analyze_thread(url, &filter).await?
        }
    };

    output_report(&report, &catalog, &args)?;
    Ok(())
}

fn build_filter(args: &FilterArgs, catalog: &CategoryCatalog) -> anyhow::Result<FilterConfig> {
    if let Some(confidence) = args.min_confidence {
        if !(0.0..=1.0).contains(&confidence) {
            anyhow::bail!("--min-confidence must be between 0.0 and 1.0");
        }
    }

    // Canonicalize category names so the allow-list matches classifier output.
    let allowed_categories = if args.categories.is_empty() {
        None
    } else {
        let mut allowed = std::collections::HashSet::new();
        for name in &args.categories {
            let category = catalog
                .get(name)
                .ok_or_else(|| anyhow::anyhow!("unknown category '{}'", name))?;
            allowed.insert(category.name.clone());
        }
        Some(allowed)
    };

    Ok(FilterConfig {
        min_score: args.min_score,
        min_comments: args.min_comments,
        min_confidence: args.min_confidence,
        allowed_categories,
        date_range: None,
        over_18: args.nsfw,
        spoiler: args.spoiler,
        original_content_only: args.oc_only,
    })
}

fn resolve_window(
    window: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> anyhow::Result<TimeWindow> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            anyhow::bail!("--from must not be after --to");
        }
        let start = from.and_time(NaiveTime::MIN).and_utc();
        let end = to.and_time(NaiveTime::MIN).and_utc() + Duration::days(1) - Duration::seconds(1);
        return Ok(TimeWindow::Range { start, end });
    }
    if from.is_some() || to.is_some() {
        anyhow::bail!("--from and --to must be supplied together");
    }

    match window {
        "all" => Ok(TimeWindow::All),
        "week" => Ok(TimeWindow::LastWeek),
        "month" => Ok(TimeWindow::LastMonth),
        "year" => Ok(TimeWindow::LastYear),
        other => anyhow::bail!("unknown window '{}', expected all|week|month|year", other),
    }
}

fn output_report(
    report: &AnalysisReport,
    catalog: &CategoryCatalog,
    args: &Args,
) -> anyhow::Result<()> {
    let output = match args.format.as_str() {
        "json" => export::to_json(report)?,
        "csv" => export::to_csv(&report.records)?,
        "markdown" => format_markdown(report, catalog),
        _ => format_text(report, catalog),
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn top_records(report: &AnalysisReport, limit: usize) -> Vec<&ClassifiedRecord> {
    let mut records: Vec<_> = report.records.iter().collect();
    records.sort_by(|a, b| b.record.score.cmp(&a.record.score));
    records.truncate(limit);
    records
}

fn format_text(report: &AnalysisReport, catalog: &CategoryCatalog) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n=== Analysis: {} ===\n\n", report.source));
    output.push_str(&format!("Records fetched: {}\n", report.total_fetched));
    output.push_str(&format!("Matched filters: {}\n", report.records.len()));
    output.push_str(&format!(
        "Fetched at: {}\n",
        report.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str("\nCategory Distribution:\n");
    for count in &report.summary.counts {
        let icon = catalog
            .get(&count.category)
            .map(|c| c.icon.as_str())
            .unwrap_or("");
        output.push_str(&format!(
            "  {} {:<22} {:>5} ({:.1}%)\n",
            icon, count.category, count.count, count.percentage
        ));
    }

    let top = top_records(report, 10);
    if !top.is_empty() {
        output.push_str("\nTop Discussions:\n");
        for classified in top {
            let record = &classified.record;
            let label = if record.title.is_empty() {
                truncate(&record.body, 70)
            } else {
                truncate(&record.title, 70)
            };
            output.push_str(&format!(
                "  - [{}] {} (score {}, {} comments, confidence {:.0}%)\n",
                classified.classification.category,
                label,
                record.score,
                record.num_comments.unwrap_or(0),
                classified.classification.confidence * 100.0
            ));
        }
    }

    output
}

fn format_markdown(report: &AnalysisReport, catalog: &CategoryCatalog) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Analysis: {}\n\n", report.source));
    output.push_str("| Metric | Value |\n|--------|-------|\n");
    output.push_str(&format!("| Records fetched | {} |\n", report.total_fetched));
    output.push_str(&format!("| Matched filters | {} |\n", report.records.len()));
    output.push_str(&format!(
        "| Fetched at | {} |\n",
        report.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str("\n## Category Distribution\n\n");
    output.push_str("| Category | Count | Share |\n|----------|-------|-------|\n");
    for count in &report.summary.counts {
        let icon = catalog
            .get(&count.category)
            .map(|c| c.icon.as_str())
            .unwrap_or("");
        output.push_str(&format!(
            "| {} {} | {} | {:.1}% |\n",
            icon, count.category, count.count, count.percentage
        ));
    }

    let top = top_records(report, 15);
    if !top.is_empty() {
        output.push_str("\n## Top Discussions\n\n");
        output.push_str("| Title | Category | Score | Comments | Confidence |\n");
        output.push_str("|-------|----------|-------|----------|------------|\n");
        for classified in top {
            let record = &classified.record;
            let label = if record.title.is_empty() {
                truncate(&record.body, 60)
            } else {
                truncate(&record.title, 60)
            };
            output.push_str(&format!(
                "| [{}]({}) | {} | {} | {} | {:.0}% |\n",
                label.replace('|', "\\|"),
                record.permalink,
                classified.classification.category,
                record.score,
                record.num_comments.unwrap_or(0),
                classified.classification.confidence * 100.0
            ));
        }
    }

    output.push_str(&format!(
        "\n---\n*Analyzed on {}*\n",
        report.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

fn truncate(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let truncated: String = flat.chars().take(max_chars).collect();
        format!("{}…", truncated.trim_end())
    }
}
