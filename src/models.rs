use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::links::build_linkedin_search_url;
use crate::salary::SalaryRange;

pub const DEFAULT_LOCATION: &str = "Unknown";
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Greenhouse,
    Lever,
    Workday,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Greenhouse => "greenhouse",
            Source::Lever => "lever",
            Source::Workday => "workday",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    Remote,
    Hybrid,
    Onsite,
    #[value(skip)]
    Unknown,
}

impl WorkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::Remote => "remote",
            WorkMode::Hybrid => "hybrid",
            WorkMode::Onsite => "onsite",
            WorkMode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Internship,
    Entry,
    Mid,
    Senior,
    Lead,
    Executive,
    #[value(skip)]
    Unknown,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Internship => "internship",
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
            ExperienceLevel::Executive => "executive",
            ExperienceLevel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job posting normalized from one ATS entry.
///
/// `source` and the salary triple are only settable through the
/// constructor and `with_salary`, so the provenance tag stays fixed and
/// `salary_min`/`salary_max` are always present or absent together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    source: Source,
    pub description: String,
    pub work_mode: WorkMode,
    pub experience_level: ExperienceLevel,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    salary_currency: String,
    pub posted_date: Option<String>,
    pub linkedin_url: Option<String>,
    pub keywords: Vec<String>,
}

impl Job {
    pub fn new(
        source: Source,
        title: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let company = company.into();
        let location = location.into();
        let linkedin_url = Some(build_linkedin_search_url(&company, &title));

        Self {
            title,
            company,
            location: if location.is_empty() {
                DEFAULT_LOCATION.to_string()
            } else {
                location
            },
            url: url.into(),
            source,
            description: String::new(),
            work_mode: WorkMode::Unknown,
            experience_level: ExperienceLevel::Unknown,
            salary_min: None,
            salary_max: None,
            salary_currency: DEFAULT_CURRENCY.to_string(),
            posted_date: None,
            linkedin_url,
            keywords: Vec::new(),
        }
    }

    pub fn with_work_mode(mut self, work_mode: WorkMode) -> Self {
        self.work_mode = work_mode;
        self
    }

    pub fn with_experience_level(mut self, level: ExperienceLevel) -> Self {
        self.experience_level = level;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_salary(mut self, salary: Option<SalaryRange>) -> Self {
        match salary {
            Some(range) => {
                self.salary_min = Some(range.min);
                self.salary_max = Some(range.max);
                self.salary_currency = range.currency;
            }
            None => {
                self.salary_min = None;
                self.salary_max = None;
                self.salary_currency = DEFAULT_CURRENCY.to_string();
            }
        }
        self
    }

    pub fn with_posted_date(mut self, posted_date: Option<String>) -> Self {
        self.posted_date = posted_date;
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn salary_min(&self) -> Option<f64> {
        self.salary_min
    }

    pub fn salary_max(&self) -> Option<f64> {
        self.salary_max
    }

    pub fn salary_currency(&self) -> &str {
        &self.salary_currency
    }

    /// Identity used when merging results from several boards.
    pub fn id(&self) -> String {
        if self.url.is_empty() {
            format!(
                "{}:{}:{}:{}",
                self.source,
                self.company.to_lowercase(),
                self.title.to_lowercase(),
                self.location.to_lowercase()
            )
        } else {
            self.url.clone()
        }
    }
}
