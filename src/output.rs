use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::models::Job;

const BANNER_WIDTH: usize = 80;
const PREVIEW_CHARS: usize = 200;
const WRAP_WIDTH: usize = 76;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Console,
}

pub fn render(jobs: &[Job], format: OutputFormat, verbose: bool) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(jobs),
        OutputFormat::Csv => to_csv(jobs),
        OutputFormat::Console => Ok(to_console(jobs, verbose)),
    }
}

pub fn to_json(jobs: &[Job]) -> Result<String> {
    serde_json::to_string_pretty(jobs).context("Failed to serialize jobs as JSON")
}

#[derive(Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    company: &'a str,
    location: &'a str,
    url: &'a str,
    source: &'a str,
    work_mode: &'a str,
    experience_level: &'a str,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    salary_currency: &'a str,
    posted_date: Option<&'a str>,
    linkedin_url: Option<&'a str>,
    keywords: String,
}

impl<'a> From<&'a Job> for CsvRow<'a> {
    fn from(job: &'a Job) -> Self {
        Self {
            title: &job.title,
            company: &job.company,
            location: &job.location,
            url: &job.url,
            source: job.source().as_str(),
            work_mode: job.work_mode.as_str(),
            experience_level: job.experience_level.as_str(),
            salary_min: job.salary_min(),
            salary_max: job.salary_max(),
            salary_currency: job.salary_currency(),
            posted_date: job.posted_date.as_deref(),
            linkedin_url: job.linkedin_url.as_deref(),
            keywords: job.keywords.join(","),
        }
    }
}

/// One row per job under a fixed header. No jobs means no header either.
pub fn to_csv(jobs: &[Job]) -> Result<String> {
    if jobs.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for job in jobs {
        writer
            .serialize(CsvRow::from(job))
            .context("Failed to write CSV row")?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Whole-dollar amount with thousands separators.
fn format_amount(amount: f64) -> String {
    let digits = format!("{:.0}", amount.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn description_preview(description: &str) -> String {
    if description.chars().count() > PREVIEW_CHARS {
        let head: String = description.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        description.to_string()
    }
}

pub fn to_console(jobs: &[Job], verbose: bool) -> String {
    if jobs.is_empty() {
        return "No jobs found.".to_string();
    }

    let rule = "=".repeat(BANNER_WIDTH);
    let mut lines = vec![
        String::new(),
        rule.clone(),
        format!("Found {} job(s)", jobs.len()),
        rule,
        String::new(),
    ];

    for (i, job) in jobs.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, job.title));
        lines.push(format!("   Company: {}", job.company));
        lines.push(format!("   Location: {}", job.location));
        lines.push(format!("   Work Mode: {}", job.work_mode));
        lines.push(format!("   Experience: {}", job.experience_level));

        if let (Some(min), Some(max)) = (job.salary_min(), job.salary_max()) {
            lines.push(format!(
                "   Salary: ${} - ${} {}",
                format_amount(min),
                format_amount(max),
                job.salary_currency()
            ));
        }

        lines.push(format!("   URL: {}", job.url));
        if let Some(linkedin) = &job.linkedin_url {
            lines.push(format!("   LinkedIn Search: {}", linkedin));
        }

        if verbose {
            if !job.keywords.is_empty() {
                lines.push(format!("   Keywords: {}", job.keywords.join(", ")));
            }
            if !job.description.is_empty() {
                let text = format!("Description: {}", description_preview(&job.description));
                let options = textwrap::Options::new(WRAP_WIDTH)
                    .initial_indent("   ")
                    .subsequent_indent("     ");
                lines.push(textwrap::fill(&text, options));
            }
        }

        lines.push(format!("   Source: {}", job.source()));
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Write rendered output, creating parent directories as needed.
pub fn write_to_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
