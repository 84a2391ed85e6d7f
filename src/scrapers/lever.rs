use reqwest::Url;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

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

const BOARD_ROOT: &str = "https://jobs.lever.co";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeverPosting {
    text: Option<String>,
    hosted_url: Option<String>,
    description: Option<String>,
    #[serde(default)]
    categories: LeverCategories,
}

#[derive(Debug, Default, Deserialize)]
struct LeverCategories {
    location: Option<String>,
    team: Option<String>,
    commitment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LeverScraper {
    company: String,
    board_url: Url,
}

impl LeverScraper {
    pub fn new(company: &str) -> Result<Self, SetupError> {
        let company = company.trim();
        if company.is_empty() {
            return Err(SetupError::MissingCompany(Source::Lever));
        }

        let board_url = Url::parse(&format!("{}/{}/", BOARD_ROOT, company)).map_err(|_| {
            SetupError::InvalidCompany {
                company: company.to_string(),
            }
        })?;

        Ok(Self {
            company: company.to_string(),
            board_url,
        })
    }

    fn parse_json(&self, data: &Value) -> Result<Vec<Job>, PayloadError> {
        let Some(entries) = data.as_array() else {
            return Err(PayloadError::UnexpectedShape {
                expected: "an array of postings",
            });
        };

        Ok(collect_entries(Source::Lever, entries, |raw: LeverPosting| {
            let title = raw.text.unwrap_or_default();
            let description = raw.description.unwrap_or_default();
            let LeverCategories {
                location,
                team,
                commitment,
            } = raw.categories;
            let location = location.unwrap_or_else(|| DEFAULT_LOCATION.to_string());

            let context = format!(
                "{} {} {} {} {}",
                title,
                location,
                team.unwrap_or_default(),
                commitment.unwrap_or_default(),
                head_chars(&description, CLASSIFY_DESCRIPTION_CHARS)
            );
            let url = absolutize(&self.board_url, raw.hosted_url.as_deref().unwrap_or(""));

            Job::new(Source::Lever, title.as_str(), &self.company, location, url)
                .with_work_mode(classify_work_mode(&context))
                .with_experience_level(classify_experience_level(&title))
                .with_salary(extract_salary(&description))
                .with_keywords(extract_keywords(&title, &description))
                .with_description(head_chars(&description, DESCRIPTION_LIMIT))
        }))
    }

    fn parse_html(&self, html: &str) -> Vec<Job> {
        let document = Html::parse_document(html);
        let postings = selectors(&["div.posting"]);
        let titles = selectors(&["h5"]);
        let links = selectors(&["a.posting-btn-submit", "a"]);
        let locations = selectors(&["span.sort-by-location", "span.posting-categories"]);
        let commitments = selectors(&["span.sort-by-commitment"]);

        postings
            .iter()
            .flat_map(|sel| document.select(sel))
            .filter_map(|posting| {
                let title = element_text(find_first(posting, &titles)?);
                let href = find_first(posting, &links)
                    .and_then(|link| link.value().attr("href"))
                    .unwrap_or("");
                let location = find_first(posting, &locations)
                    .map(element_text)
                    .unwrap_or_else(|| DEFAULT_LOCATION.to_string());
                let commitment = find_first(posting, &commitments)
                    .map(element_text)
                    .unwrap_or_default();

                let context = format!("{} {} {}", title, location, commitment);
                let url = absolutize(&self.board_url, href);

                Some(
                    Job::new(Source::Lever, title.as_str(), &self.company, location, url)
                        .with_work_mode(classify_work_mode(&context))
                        .with_experience_level(classify_experience_level(&title)),
                )
            })
            .collect()
    }
}

impl JobSource for LeverScraper {
    fn source(&self) -> Source {
        Source::Lever
    }

    fn company(&self) -> &str {
        &self.company
    }

    fn endpoints(&self) -> Endpoints {
        let board = format!("{}/{}", BOARD_ROOT, self.company);
        Endpoints {
            structured: format!("{}?mode=json", board),
            markup: board,
            policy: FallbackPolicy::default(),
        }
    }

    fn parse(&self, payload: &Payload) -> Result<Vec<Job>, PayloadError> {
        match payload {
            Payload::Json(data) => self.parse_json(data),
            Payload::Html(html) => Ok(self.parse_html(html)),
        }
    }
}
