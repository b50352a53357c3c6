use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use pagewise::book::{HeadingDialect, format_duration};
use pagewise::progress::{ProgressSummary, calculate_section_times};
use pagewise::{Config, DocumentParser, ParsedDocument, PlanRequest, plan_targets};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pagewise")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    layout: LayoutArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the document layout stored in the config file
#[derive(Args)]
struct LayoutArgs {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Heading convention (labelled-chapters, labelled-sections, numbered-sections)
    #[arg(long, global = true, value_parser = parse_dialect)]
    dialect: Option<HeadingDialect>,

    /// Document has no chapter headings
    #[arg(long, global = true)]
    flat: bool,

    /// Number of `#` before chapter headings
    #[arg(long, global = true)]
    chapter_depth: Option<usize>,

    /// Number of `#` before section headings
    #[arg(long, global = true)]
    section_depth: Option<usize>,
}

impl LayoutArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(dialect) = self.dialect {
            config.dialect = dialect;
            config.has_chapters = dialect.has_chapters();
        }
        if self.flat {
            config.has_chapters = false;
        }
        if let Some(depth) = self.chapter_depth {
            config.chapter_heading_depth = depth;
        }
        if let Some(depth) = self.section_depth {
            config.section_heading_depth = depth;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show reading progress and performance
    Progress {
        /// Path to the study document
        file: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Plan today's reading targets
    Plan {
        /// Path to the study document
        file: PathBuf,
        /// Day everything should be read by (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: NaiveDate,
        /// First day of the plan (defaults to today)
        #[arg(short, long)]
        start: Option<NaiveDate>,
        /// Fixed pages per day
        #[arg(short, long)]
        quota: Option<u32>,
        /// Start planning at this section number
        #[arg(long)]
        from: Option<String>,
    },
    /// Estimate each section's required time from a reading speed
    Estimate {
        /// Path to the study document
        file: PathBuf,
        /// Minutes needed per page
        #[arg(short, long)]
        minutes_per_page: Option<f64>,
    },
    /// Write the current configuration to the config file
    InitConfig,
}

fn parse_dialect(name: &str) -> std::result::Result<HeadingDialect, String> {
    HeadingDialect::from_name(name).ok_or_else(|| format!("unknown heading dialect: {name}"))
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagewise=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.layout.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.layout.apply(&mut config);

    match cli.command {
        Commands::Progress { file, json } => {
            let doc = load_document(&config, &file)?;
            show_progress(&doc, json)?;
        }
        Commands::Plan { file, deadline, start, quota, from } => {
            let doc = load_document(&config, &file)?;

            let mut request = PlanRequest::new(deadline);
            if let Some(start) = start {
                request = request.starting(start);
            }
            if let Some(quota) = quota.or(config.daily_quota) {
                request = request.with_quota(quota);
            }
            if let Some(from) = from {
                request = request.from_section(from);
            }

            let plan = plan_targets(&doc.sections, &request)?;
            print!("{plan}");
        }
        Commands::Estimate { file, minutes_per_page } => {
            let Some(mpp) = minutes_per_page.or(config.minutes_per_page) else {
                bail!("No reading speed given. Pass --minutes-per-page or set minutes_per_page");
            };
            let doc = load_document(&config, &file)?;
            for section in calculate_section_times(&doc.sections, mpp) {
                println!("{}: {}\n\ttime req: {}", section.number, section.name, section.time_req);
            }
        }
        Commands::InitConfig => {
            let path = match &cli.layout.config {
                Some(path) => path.clone(),
                None => Config::config_path()?,
            };
            config.save_to(&path)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn load_document(config: &Config, path: &Path) -> Result<ParsedDocument> {
    let parser = DocumentParser::new(config.parse_options(), config.dialect.extractor())?;
    let doc = parser.parse_file(path).map_err(|err| {
        if err.is_document_error() {
            warn!("{} needs fixing before it can be analysed", path.display());
        }
        anyhow::Error::new(err)
            .context(format!("Failed to parse study document {}", path.display()))
    })?;
    info!("Loaded {} sections in {} chapters", doc.sections.len(), doc.chapters.len());
    Ok(doc)
}

fn show_progress(doc: &ParsedDocument, json: bool) -> Result<()> {
    let summary = ProgressSummary::from_sections(&doc.sections);

    if json {
        let out = serde_json::to_string_pretty(&summary)
            .with_context(|| "Failed to serialize progress summary")?;
        println!("{out}");
        return Ok(());
    }

    let percent =
        |value: Option<f64>| value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}%"));

    println!(
        "Pages: {}/{} ({})",
        summary.done_pages,
        summary.total_pages,
        percent(summary.progress_percent)
    );
    println!("Sections done: {}/{}", summary.done_sections, summary.sections);
    println!("Average performance: {}", percent(summary.average_performance));
    println!("Time efficiency: {}", percent(summary.time_efficiency));
    println!("Time spent: {}", format_duration(summary.time_done));
    if summary.questions > 0 {
        println!("Questions: {}/{}", summary.questions_done, summary.questions);
    }

    let chapters = doc.chapters_in_order();
    if !chapters.is_empty() {
        println!();
        for chapter in chapters {
            let marker = if chapter.is_done() { " (done)" } else { "" };
            println!(
                "  {} {}: {}{}",
                chapter.number,
                chapter.name,
                percent(chapter.progress_percent().ok()),
                marker
            );
        }
    }

    Ok(())
}
