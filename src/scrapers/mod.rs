mod greenhouse;
mod lever;
mod workday;

pub use greenhouse::GreenhouseScraper;
pub use lever::LeverScraper;
pub use workday::WorkdayScraper;

use scraper::{ElementRef, Selector};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::PayloadError;
use crate::fetch::{Accept, Fetcher};
use crate::models::{Job, Source};

/// Descriptions are cut to this many characters before storage.
pub const DESCRIPTION_LIMIT: usize = 500;
/// Leading description characters fed to the work mode classifier.
pub const CLASSIFY_DESCRIPTION_CHARS: usize = 200;

/// A raw listing as fetched from a board.
#[derive(Debug, Clone)]
pub enum Payload {
    Json(Value),
    Html(String),
}

impl Payload {
    pub fn json(body: &str) -> Result<Self, PayloadError> {
        Ok(Payload::Json(serde_json::from_str(body)?))
    }
}

/// How a board reacts when its structured endpoint lets it down.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPolicy {
    pub require_json_content_type: bool,
    pub fallback_on_empty: bool,
    pub fallback_on_transport_error: bool,
}

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub structured: String,
    pub markup: String,
    pub policy: FallbackPolicy,
}

/// One ATS board. Implementations hold only their construction
/// arguments, so a scraper can be shared across threads.
pub trait JobSource: Send + Sync {
    fn source(&self) -> Source;

    fn company(&self) -> &str;

    fn endpoints(&self) -> Endpoints;

    /// Normalize a fetched listing. Malformed entries are skipped; only a
    /// structured payload of the wrong overall shape is an error.
    fn parse(&self, payload: &Payload) -> Result<Vec<Job>, PayloadError>;

    /// Fetch and parse the board, preferring the structured endpoint and
    /// falling back to markup. Fetch failures yield no jobs.
    fn scrape(&self, fetcher: &dyn Fetcher) -> Vec<Job> {
        let source = self.source();
        let company = self.company();
        let Endpoints {
            structured,
            markup,
            policy,
        } = self.endpoints();

        match fetcher.get(&structured, Accept::Json) {
            Ok(page)
                if page.is_success() && (page.is_json() || !policy.require_json_content_type) =>
            {
                match Payload::json(&page.body).and_then(|payload| self.parse(&payload)) {
                    Ok(jobs) if jobs.is_empty() && policy.fallback_on_empty => {
                        debug!(%source, company, "structured listing empty, trying markup");
                    }
                    Ok(jobs) => {
                        info!(%source, company, count = jobs.len(), "parsed structured listing");
                        return jobs;
                    }
                    Err(err) => {
                        warn!(
                            %source,
                            company,
                            error = %err,
                            "structured listing unusable, trying markup"
                        );
                    }
                }
            }
            Ok(page) => {
                debug!(
                    %source,
                    company,
                    status = page.status,
                    "structured endpoint unavailable, trying markup"
                );
            }
            Err(err) if policy.fallback_on_transport_error => {
                debug!(
                    %source,
                    company,
                    error = %err,
                    "structured endpoint unreachable, trying markup"
                );
            }
            Err(err) => {
                warn!(%source, company, error = %err, "scrape failed");
                return Vec::new();
            }
        }

        match fetcher.get(&markup, Accept::Html) {
            Ok(page) if page.is_success() => match self.parse(&Payload::Html(page.body)) {
                Ok(jobs) => {
                    info!(%source, company, count = jobs.len(), "parsed markup listing");
                    jobs
                }
                Err(err) => {
                    warn!(%source, company, error = %err, "markup listing unusable");
                    Vec::new()
                }
            },
            Ok(page) => {
                warn!(%source, company, status = page.status, url = %markup, "scrape failed");
                Vec::new()
            }
            Err(err) => {
                warn!(%source, company, error = %err, "scrape failed");
                Vec::new()
            }
        }
    }
}

/// Deserialize each entry and build a job from it, skipping entries that
/// do not fit the expected shape.
pub(crate) fn collect_entries<'a, T, F>(
    source: Source,
    entries: impl IntoIterator<Item = &'a Value>,
    build: F,
) -> Vec<Job>
where
    T: DeserializeOwned,
    F: Fn(T) -> Job,
{
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match T::deserialize(entry) {
            Ok(raw) => Some(build(raw)),
            Err(err) => {
                warn!(%source, index, error = %err, "skipping malformed posting");
                None
            }
        })
        .collect()
}

/// Compile a list of CSS selectors, dropping any that fail to parse.
pub(crate) fn selectors(css: &[&str]) -> Vec<Selector> {
    css.iter().filter_map(|c| Selector::parse(c).ok()).collect()
}

/// First descendant matching any of the selectors, tried in order.
pub(crate) fn find_first<'a>(
    element: ElementRef<'a>,
    selectors: &[Selector],
) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|sel| element.select(sel).next())
}

pub(crate) fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub(crate) fn head_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
