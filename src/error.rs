use thiserror::Error;

use crate::models::Source;

/// Invalid scraper construction arguments. These are the only failures
/// that leave a scraper.
#[derive(Debug, Error, PartialEq)]
pub enum SetupError {
    #[error("company name is required for the {0} scraper")]
    MissingCompany(Source),

    #[error("a Workday board URL is required for the Workday scraper")]
    MissingWorkdayUrl,

    #[error("Workday URL must be a complete http(s) URL, got '{url}'")]
    InvalidWorkdayUrl { url: String },

    #[error("cannot build a board URL for company '{company}'")]
    InvalidCompany { company: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}

/// A structured payload that cannot be used. Scrapers treat this as a
/// signal to fall back to the markup listing.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected payload shape: expected {expected}")]
    UnexpectedShape { expected: &'static str },
}
