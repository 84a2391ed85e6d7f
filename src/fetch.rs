use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

use crate::error::FetchError;

pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 ",
    "(KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
);
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    Json,
    Html,
}

impl Accept {
    fn header_value(&self) -> &'static str {
        match self {
            Accept::Json => "application/json",
            Accept::Html => "text/html,application/xhtml+xml",
        }
    }
}

/// A fetched response. Non-2xx statuses are still pages.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
    }
}

pub trait Fetcher: Send + Sync {
    fn get(&self, url: &str, accept: Accept) -> Result<Page, FetchError>;
}

/// Shared HTTP handle for a run. Owned by the caller and lent to
/// scrapers; the connection pool goes away when it is dropped.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str, accept: Accept) -> Result<Page, FetchError> {
        let transport = |err: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            reason: err.to_string(),
        };

        tracing::debug!(url, ?accept, "fetching");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept.header_value())
            .send()
            .map_err(transport)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().map_err(transport)?;

        Ok(Page {
            status,
            content_type,
            body,
        })
    }
}
