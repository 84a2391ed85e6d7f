use reqwest::Url;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

use super::{
    collect_entries, element_text, find_first, selectors, Endpoints, FallbackPolicy, JobSource,
    Payload,
};
use crate::classify::{classify_experience_level, classify_work_mode};
use crate::error::{PayloadError, SetupError};
use crate::links::absolutize;
use crate::models::{Job, Source, DEFAULT_LOCATION};

const BOARD_ROOT: &str = "https://boards.greenhouse.io";

#[derive(Debug, Deserialize)]
struct GreenhousePosting {
    title: Option<String>,
    location: Option<GreenhouseLocation>,
    absolute_url: Option<String>,
    departments: Option<Vec<GreenhouseDepartment>>,
}

#[derive(Debug, Deserialize)]
struct GreenhouseLocation {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GreenhouseDepartment {
    name: Option<String>,
}

/// Greenhouse boards live at `https://boards.greenhouse.io/{company}`.
#[derive(Debug, Clone)]
pub struct GreenhouseScraper {
    company: String,
    board_url: Url,
}

impl GreenhouseScraper {
    pub fn new(company: &str) -> Result<Self, SetupError> {
        let company = company.trim();
        if company.is_empty() {
            return Err(SetupError::MissingCompany(Source::Greenhouse));
        }

        // Trailing slash so relative links resolve under the company path.
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

    fn build_job(&self, title: String, location: String, url: &str, context: &str) -> Job {
        let work_mode = classify_work_mode(context);
        let experience_level = classify_experience_level(&title);

        Job::new(
            Source::Greenhouse,
            title,
            &self.company,
            location,
            absolutize(&self.board_url, url),
        )
        .with_work_mode(work_mode)
        .with_experience_level(experience_level)
    }

    fn parse_json(&self, data: &Value) -> Result<Vec<Job>, PayloadError> {
        let Some(object) = data.as_object() else {
            return Err(PayloadError::UnexpectedShape {
                expected: "an object with a `jobs` array",
            });
        };

        let entries = object
            .get("jobs")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(collect_entries(Source::Greenhouse, entries, |raw: GreenhousePosting| {
            let title = raw.title.unwrap_or_default();
            let location = raw
                .location
                .and_then(|loc| loc.name)
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string());
            let department = raw
                .departments
                .unwrap_or_default()
                .into_iter()
                .next()
                .and_then(|dept| dept.name)
                .unwrap_or_default();

            let context = format!("{} {} {}", title, location, department);
            let url = raw.absolute_url.unwrap_or_default();
            self.build_job(title, location, &url, &context)
        }))
    }

    fn parse_html(&self, html: &str) -> Vec<Job> {
        let document = Html::parse_document(html);
        let sections = selectors(&["section.level-0"]);
        let openings = selectors(&["div.opening"]);
        let links = selectors(&["a"]);
        let locations = selectors(&["span.location"]);

        let mut jobs = Vec::new();
        for section in sections.iter().flat_map(|sel| document.select(sel)) {
            for opening in openings.iter().flat_map(|sel| section.select(sel)) {
                let Some(link) = find_first(opening, &links) else {
                    continue;
                };

                let title = element_text(link);
                let href = link.value().attr("href").unwrap_or("");
                let location = find_first(opening, &locations)
                    .map(element_text)
                    .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

                let context = format!("{} {}", title, location);
                jobs.push(self.build_job(title, location, href, &context));
            }
        }

        jobs
    }
}

impl JobSource for GreenhouseScraper {
    fn source(&self) -> Source {
        Source::Greenhouse
    }

    fn company(&self) -> &str {
        &self.company
    }

    fn endpoints(&self) -> Endpoints {
        let board = format!("{}/{}", BOARD_ROOT, self.company);
        Endpoints {
            structured: format!("{}.json", board),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceLevel, WorkMode};

    const JSON_BOARD: &str = r#"{
        "jobs": [
            {
                "title": "Senior Backend Engineer",
                "location": {"name": "Remote - US"},
                "absolute_url": "https://boards.greenhouse.io/acme/jobs/1",
                "departments": [{"name": "Engineering"}, {"name": "Platform"}]
            },
            {
                "title": "Office Manager",
                "location": {"name": "New York"},
                "absolute_url": "/acme/jobs/2",
                "departments": []
            },
            "not-an-object",
            {"title": "Data Intern", "location": "Berlin"},
            {"title": "Support Specialist"}
        ]
    }"#;

    fn parse_json(body: &str) -> Vec<Job> {
        let scraper = GreenhouseScraper::new("acme").unwrap();
        scraper.parse(&Payload::json(body).unwrap()).unwrap()
    }

    #[test]
    fn test_new_requires_company() {
        assert_eq!(
            GreenhouseScraper::new("").unwrap_err(),
            SetupError::MissingCompany(Source::Greenhouse)
        );
        assert!(GreenhouseScraper::new("   ").is_err());
    }

    #[test]
    fn test_endpoints() {
        let endpoints = GreenhouseScraper::new("stripe").unwrap().endpoints();
        assert_eq!(endpoints.structured, "https://boards.greenhouse.io/stripe.json");
        assert_eq!(endpoints.markup, "https://boards.greenhouse.io/stripe");
        assert!(!endpoints.policy.fallback_on_transport_error);
    }

    #[test]
    fn test_parse_json_skips_malformed_entries() {
        let jobs = parse_json(JSON_BOARD);
        // 5 entries, 2 malformed
        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].title, "Senior Backend Engineer");
        assert_eq!(jobs[1].title, "Office Manager");
        assert_eq!(jobs[2].title, "Support Specialist");
    }

    #[test]
    fn test_parse_json_fields() {
        let jobs = parse_json(JSON_BOARD);

        let backend = &jobs[0];
        assert_eq!(backend.source(), Source::Greenhouse);
        assert_eq!(backend.company, "acme");
        assert_eq!(backend.location, "Remote - US");
        assert_eq!(backend.url, "https://boards.greenhouse.io/acme/jobs/1");
        assert_eq!(backend.work_mode, WorkMode::Remote);
        assert_eq!(backend.experience_level, ExperienceLevel::Senior);
        assert!(backend.linkedin_url.is_some());

        let office = &jobs[1];
        assert_eq!(office.url, "https://boards.greenhouse.io/acme/jobs/2");
        assert_eq!(office.work_mode, WorkMode::Onsite);
        assert_eq!(office.experience_level, ExperienceLevel::Mid);

        let support = &jobs[2];
        assert_eq!(support.location, "Unknown");
        assert_eq!(support.url, "");
    }

    #[test]
    fn test_parse_json_never_extracts_salary_or_keywords() {
        let body = r#"{"jobs": [
            {"title": "Python Engineer $100k - $150k", "location": {"name": "Remote"}}
        ]}"#;
        let jobs = parse_json(body);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].salary_min(), None);
        assert!(jobs[0].keywords.is_empty());
        assert!(jobs[0].description.is_empty());
    }

    #[test]
    fn test_parse_json_null_departments() {
        let body = r#"{"jobs": [{
            "title": "Engineer",
            "location": {"name": "Remote"},
            "absolute_url": "https://x/1",
            "departments": null
        }]}"#;
        let jobs = parse_json(body);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].url, "https://x/1");
        assert_eq!(jobs[0].work_mode, WorkMode::Remote);
    }

    #[test]
    fn test_parse_json_department_feeds_work_mode() {
        let body = r#"{"jobs": [{
            "title": "Engineer",
            "location": {"name": "Denver"},
            "departments": [{"name": "Remote Engineering"}]
        }]}"#;
        assert_eq!(parse_json(body)[0].work_mode, WorkMode::Remote);
    }

    #[test]
    fn test_parse_json_missing_jobs_key() {
        assert!(parse_json(r#"{"meta": {}}"#).is_empty());
    }

    #[test]
    fn test_parse_json_wrong_shape() {
        let scraper = GreenhouseScraper::new("acme").unwrap();
        let result = scraper.parse(&Payload::json("[1, 2]").unwrap());
        assert!(matches!(result, Err(PayloadError::UnexpectedShape { .. })));
    }

    #[test]
    fn test_parse_html() {
        let html = r#"
            <html><body>
            <section class="level-0">
                <h3>Engineering</h3>
                <div class="opening">
                    <a href="/acme/jobs/100">Frontend Engineer</a>
                    <span class="location">Remote</span>
                </div>
                <div class="opening">
                    <span class="location">Nowhere</span>
                </div>
                <div class="opening">
                    <a href="https://boards.greenhouse.io/acme/jobs/101">Lead Designer</a>
                </div>
            </section>
            <div class="opening"><a href="/acme/jobs/999">Outside any section</a></div>
            </body></html>
        "#;

        let scraper = GreenhouseScraper::new("acme").unwrap();
        let jobs = scraper.parse(&Payload::Html(html.to_string())).unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "Frontend Engineer");
        assert_eq!(jobs[0].url, "https://boards.greenhouse.io/acme/jobs/100");
        assert_eq!(jobs[0].location, "Remote");
        assert_eq!(jobs[0].work_mode, WorkMode::Remote);
        assert_eq!(jobs[0].experience_level, ExperienceLevel::Mid);

        assert_eq!(jobs[1].title, "Lead Designer");
        assert_eq!(jobs[1].location, "Unknown");
        assert_eq!(jobs[1].experience_level, ExperienceLevel::Lead);
        assert_eq!(jobs[1].work_mode, WorkMode::Unknown);
    }
}
