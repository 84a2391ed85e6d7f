mod classify;
mod config;
mod error;
mod fetch;
mod filter;
mod keywords;
mod links;
mod models;
mod output;
mod pipeline;
mod salary;
mod scrapers;
mod telemetry;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{AppConfig, DEFAULT_LOG_LEVEL};
use fetch::{Fetcher, HttpFetcher};
use filter::JobFilter;
use models::{ExperienceLevel, WorkMode};
use output::OutputFormat;
use scrapers::{GreenhouseScraper, JobSource, LeverScraper, WorkdayScraper};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "jobseek")]
#[command(about = "Aggregate job postings from Greenhouse, Lever and Workday boards")]
struct Cli {
    /// Config file (default: platform config dir/jobseek/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "jobseek=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a Greenhouse board
    Greenhouse {
        /// Company identifier from the Greenhouse URL
        #[arg(long)]
        company: String,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Scrape a Lever board
    Lever {
        /// Company identifier from the Lever URL
        #[arg(long)]
        company: String,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Scrape a Workday board
    Workday {
        /// Company name for display
        #[arg(long)]
        company_name: String,

        /// Full Workday jobs URL
        #[arg(long)]
        url: String,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Scrape every configured source, merge and dedupe
    Fetch,
}

#[derive(Args)]
struct FilterArgs {
    /// Keep titles containing any of these keywords
    #[arg(long, num_args = 1..)]
    keywords: Vec<String>,

    /// Keep locations containing any of these
    #[arg(long, num_args = 1..)]
    location: Vec<String>,

    #[arg(long, value_enum, num_args = 1..)]
    work_mode: Vec<WorkMode>,

    #[arg(long, value_enum, num_args = 1..)]
    experience: Vec<ExperienceLevel>,

    /// Minimum salary; postings without salary data are kept
    #[arg(long)]
    min_salary: Option<f64>,
}

impl FilterArgs {
    /// Axes given on the command line replace the configured ones.
    fn over(self, base: &JobFilter) -> JobFilter {
        fn pick<T: Clone>(cli: Vec<T>, base: &[T]) -> Vec<T> {
            if cli.is_empty() { base.to_vec() } else { cli }
        }

        JobFilter {
            title_keywords: pick(self.keywords, &base.title_keywords),
            locations: pick(self.location, &base.locations),
            work_modes: pick(self.work_mode, &base.work_modes),
            experience_levels: pick(self.experience, &base.experience_levels),
            min_salary: self.min_salary.or(base.min_salary),
        }
    }
}

#[derive(Args)]
struct OutputArgs {
    #[arg(short, long, value_enum, default_value = "console")]
    format: OutputFormat,

    /// Write results to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include keywords and description previews
    #[arg(short, long)]
    verbose: bool,
}

fn run_board(
    scraper: &dyn JobSource,
    fetcher: &dyn Fetcher,
    filter: &JobFilter,
    args: &OutputArgs,
) -> Result<()> {
    eprintln!("Scraping {} jobs...", scraper.source());
    let jobs = scraper.scrape(fetcher);
    eprintln!("Found {} jobs", jobs.len());

    let total = jobs.len();
    let jobs = filter.apply(jobs);
    if jobs.len() < total {
        eprintln!("Filtered to {} jobs", jobs.len());
    }

    let rendered = output::render(&jobs, args.format, args.verbose)?;
    match &args.output {
        Some(path) => {
            output::write_to_file(path, &rendered)?;
            eprintln!("Results written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let directive = telemetry::resolve_filter(
        std::env::var(telemetry::LOG_ENV_VAR).ok(),
        cli.log_level.as_deref(),
        config.logging.level.as_deref(),
        DEFAULT_LOG_LEVEL,
    );
    telemetry::init(&directive)?;

    match &config.path {
        Some(path) => tracing::debug!("Loaded config from {}", path.display()),
        None => tracing::debug!("No config file, using defaults"),
    }

    // Built outside any async runtime; the blocking client owns its own.
    let fetcher = HttpFetcher::new(&config.http.user_agent, config.http.timeout())?;

    match cli.command {
        Commands::Greenhouse {
            company,
            filters,
            output,
        } => {
            let scraper = GreenhouseScraper::new(&company)?;
            run_board(&scraper, &fetcher, &filters.over(&config.filters), &output)?;
        }

        Commands::Lever {
            company,
            filters,
            output,
        } => {
            let scraper = LeverScraper::new(&company)?;
            run_board(&scraper, &fetcher, &filters.over(&config.filters), &output)?;
        }

        Commands::Workday {
            company_name,
            url,
            filters,
            output,
        } => {
            let scraper = WorkdayScraper::new(&company_name, &url)?;
            run_board(&scraper, &fetcher, &filters.over(&config.filters), &output)?;
        }

        Commands::Fetch => {
            let sources = config.build_sources()?;
            if sources.is_empty() {
                bail!("No sources configured. Add [[sources]] entries to the config file.");
            }
            let sinks = config.build_sinks();

            // main keeps a handle so the blocking client is dropped outside
            // the runtime.
            let fetcher: Arc<dyn Fetcher> = Arc::new(fetcher);

            eprintln!("Scraping {} sources...", sources.len());
            let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
            let report = runtime.block_on(pipeline::run_pipeline(
                sources,
                Arc::clone(&fetcher),
                &config.filters,
                &sinks,
            ))?;

            let elapsed = report.finished_at - report.started_at;
            eprintln!(
                "Found {} jobs from {} sources ({} unique), kept {} in {:.1}s",
                report.scraped,
                report.sources,
                report.unique,
                report.matched,
                elapsed.num_milliseconds() as f64 / 1000.0
            );
        }
    }

    Ok(())
}
