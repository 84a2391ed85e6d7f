use reqwest::Url;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use super::{
    collect_entries, element_text, find_first, head_chars, selectors, Endpoints, FallbackPolicy,
    JobSource, Payload, CLASSIFY_DESCRIPTION_CHARS, DESCRIPTION_LIMIT,
};
use crate::classify::{classify_experience_level, classify_work_mode};
use crate::error::{PayloadError, SetupError};
use crate::keywords::extract_keywords;
use crate::links::absolutize;
use crate::models::{Job, Source, DEFAULT_LOCATION};
use crate::salary::extract_salary;

/// Keys that may hold the posting list when the payload is an object.
const LISTING_KEYS: &[&str] = &["jobPostings", "jobs", "results"];

// Field names drift between Workday API versions, so each one is probed
// in order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkdayPosting {
    title: Option<String>,
    job_title: Option<String>,
    location: Option<String>,
    location_name: Option<String>,
    locations_text: Option<String>,
    url: Option<String>,
    external_path: Option<String>,
    id: Option<PostingId>,
    job_id: Option<PostingId>,
    description: Option<String>,
    job_description: Option<String>,
    posted_on: Option<String>,
    posting_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PostingId {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for PostingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostingId::Text(id) => f.write_str(id),
            PostingId::Number(id) => write!(f, "{}", id),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Workday boards have no fixed URL scheme, so the caller supplies the
/// board URL along with a display name for the company.
#[derive(Debug, Clone)]
pub struct WorkdayScraper {
    company: String,
    board: String,
    board_url: Url,
}

impl WorkdayScraper {
    pub fn new(company: &str, url: &str) -> Result<Self, SetupError> {
        let company = company.trim();
        if company.is_empty() {
            return Err(SetupError::MissingCompany(Source::Workday));
        }

        let url = url.trim();
        if url.is_empty() {
            return Err(SetupError::MissingWorkdayUrl);
        }

        let invalid = || SetupError::InvalidWorkdayUrl {
            url: url.to_string(),
        };
        let board_url = Url::parse(url).map_err(|_| invalid())?;
        if !matches!(board_url.scheme(), "http" | "https") || board_url.host_str().is_none() {
            return Err(invalid());
        }

        Ok(Self {
            company: company.to_string(),
            board: url.to_string(),
            board_url,
        })
    }

    /// The structured endpoint: the board URL cut back to its `/jobs`
    /// segment when it has one.
    fn api_url(&self) -> String {
        if !self.board.contains("/jobs") {
            return self.board.clone();
        }

        let trimmed = self.board.trim_end_matches('/');
        let base = trimmed.strip_suffix("/jobs").unwrap_or(trimmed);
        format!("{}/jobs", base)
    }

    fn posting_url(&self, url: Option<String>, id: Option<PostingId>) -> String {
        match url {
            Some(url) => absolutize(&self.board_url, &url),
            None => id
                .map(|id| format!("{}/{}", self.board.trim_end_matches('/'), id))
                .unwrap_or_default(),
        }
    }

    fn build_from_json(&self, raw: WorkdayPosting) -> Job {
        let title = non_empty(raw.title).or(raw.job_title).unwrap_or_default();
        let location = non_empty(raw.location)
            .or_else(|| non_empty(raw.location_name))
            .or(raw.locations_text)
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());
        let url = self.posting_url(
            non_empty(raw.url).or_else(|| non_empty(raw.external_path)),
            raw.id.or(raw.job_id),
        );
        let description = non_empty(raw.description)
            .or(raw.job_description)
            .unwrap_or_default();
        let posted_date = raw.posted_on.or(raw.posting_date);

        let context = format!(
            "{} {} {}",
            title,
            location,
            head_chars(&description, CLASSIFY_DESCRIPTION_CHARS)
        );

        Job::new(Source::Workday, title.as_str(), &self.company, location, url)
            .with_work_mode(classify_work_mode(&context))
            .with_experience_level(classify_experience_level(&title))
            .with_salary(extract_salary(&description))
            .with_keywords(extract_keywords(&title, &description))
            .with_description(head_chars(&description, DESCRIPTION_LIMIT))
            .with_posted_date(posted_date)
    }

    fn parse_json(&self, data: &Value) -> Result<Vec<Job>, PayloadError> {
        let entries: &[Value] = match data {
            Value::Array(entries) => entries.as_slice(),
            Value::Object(object) => LISTING_KEYS
                .iter()
                .filter_map(|key| object.get(*key).and_then(Value::as_array))
                .find(|entries| !entries.is_empty())
                .map(Vec::as_slice)
                .unwrap_or_default(),
            _ => {
                return Err(PayloadError::UnexpectedShape {
                    expected: "an array of postings or an object wrapping one",
                });
            }
        };

        Ok(collect_entries(Source::Workday, entries, |raw: WorkdayPosting| {
            self.build_from_json(raw)
        }))
    }

    fn parse_html(&self, html: &str) -> Vec<Job> {
        let document = Html::parse_document(html);
        let titles = selectors(&["a[data-automation-id=\"jobTitle\"]", "h3", "a"]);
        let locations = selectors(&["dd[data-automation-id=\"location\"]", "span.location"]);
        let dates = selectors(&["dd[data-automation-id=\"postedOn\"]"]);

        // Layouts differ per tenant; use the first listing selector that
        // finds anything.
        let listings = selectors(&[
            "li.css-1q2dra3",
            "div[data-automation-id=\"compositeContainer\"]",
            "article",
        ])
        .into_iter()
        .map(|sel| document.select(&sel).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
        .unwrap_or_default();

        listings
            .into_iter()
            .filter_map(|listing| {
                let title_element = find_first(listing, &titles)?;
                let title = element_text(title_element);
                let href = title_element.value().attr("href").unwrap_or("");
                let location = find_first(listing, &locations)
                    .map(element_text)
                    .unwrap_or_else(|| DEFAULT_LOCATION.to_string());
                let posted_date = find_first(listing, &dates).map(element_text);

                let context = format!("{} {}", title, location);
                let url = absolutize(&self.board_url, href);

                Some(
                    Job::new(Source::Workday, title.as_str(), &self.company, location, url)
                        .with_work_mode(classify_work_mode(&context))
                        .with_experience_level(classify_experience_level(&title))
                        .with_posted_date(posted_date),
                )
            })
            .collect()
    }
}

impl JobSource for WorkdayScraper {
    fn source(&self) -> Source {
        Source::Workday
    }

    fn company(&self) -> &str {
        &self.company
    }

    fn endpoints(&self) -> Endpoints {
        Endpoints {
            structured: self.api_url(),
            markup: self.board.clone(),
            policy: FallbackPolicy {
                require_json_content_type: true,
                fallback_on_empty: true,
                fallback_on_transport_error: true,
            },
        }
    }

    fn parse(&self, payload: &Payload) -> Result<Vec<Job>, PayloadError> {
        match payload {
            Payload::Json(data) => self.parse_json(data),
            Payload::Html(html) => Ok(self.parse_html(html)),
        }
    }
}
