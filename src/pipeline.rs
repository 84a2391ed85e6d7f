use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::fetch::Fetcher;
use crate::filter::JobFilter;
use crate::models::Job;
use crate::output::{self, OutputFormat};
use crate::scrapers::JobSource;

pub trait JobSink: Send + Sync {
    fn name(&self) -> &str;

    fn write(&self, jobs: &[Job]) -> Result<()>;
}

/// Prints the console rendering to stdout.
pub struct ConsoleSink {
    pub verbose: bool,
}

impl JobSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn write(&self, jobs: &[Job]) -> Result<()> {
        println!("{}", output::to_console(jobs, self.verbose));
        Ok(())
    }
}

pub struct FileSink {
    pub path: PathBuf,
    pub format: OutputFormat,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }
}

impl JobSink for FileSink {
    fn name(&self) -> &str {
        match self.format {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Console => "text",
        }
    }

    fn write(&self, jobs: &[Job]) -> Result<()> {
        let rendered = output::render(jobs, self.format, false)?;
        output::write_to_file(&self.path, &rendered)?;
        eprintln!("Wrote {} jobs to {}", jobs.len(), self.path.display());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sources: usize,
    pub scraped: usize,
    pub unique: usize,
    pub matched: usize,
}

/// Drop repeated postings, keeping the first occurrence of each id.
pub fn dedupe(jobs: Vec<Job>) -> Vec<Job> {
    let mut seen = HashSet::new();
    jobs.into_iter().filter(|job| seen.insert(job.id())).collect()
}

/// Scrape every source concurrently, then dedupe, filter and fan the
/// result out to each sink in turn.
pub async fn run_pipeline(
    sources: Vec<Arc<dyn JobSource>>,
    fetcher: Arc<dyn Fetcher>,
    filter: &JobFilter,
    sinks: &[Box<dyn JobSink>],
) -> Result<PipelineReport> {
    let started_at = Utc::now();
    let source_count = sources.len();

    let handles: Vec<_> = sources
        .into_iter()
        .map(|source| {
            let fetcher = Arc::clone(&fetcher);
            let label = format!("{}:{}", source.source(), source.company());
            let handle = tokio::task::spawn_blocking(move || source.scrape(fetcher.as_ref()));
            (label, handle)
        })
        .collect();

    let mut scraped = Vec::new();
    for (label, handle) in handles {
        match handle.await {
            Ok(jobs) => {
                info!(source = %label, count = jobs.len(), "source finished");
                scraped.extend(jobs);
            }
            Err(err) => {
                error!(source = %label, error = %err, "source task failed");
            }
        }
    }

    let scraped_count = scraped.len();
    let unique = dedupe(scraped);
    let unique_count = unique.len();
    let matched = filter.apply(unique);

    for sink in sinks {
        sink.write(&matched)
            .with_context(|| format!("Failed to write to {} sink", sink.name()))?;
    }

    Ok(PipelineReport {
        started_at,
        finished_at: Utc::now(),
        sources: source_count,
        scraped: scraped_count,
        unique: unique_count,
        matched: matched.len(),
    })
}
