use serde::Deserialize;

use crate::models::{ExperienceLevel, Job, WorkMode};

/// Filter criteria. Every non-empty axis must be satisfied; within an
/// axis any one value is enough. An empty list places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct JobFilter {
    pub title_keywords: Vec<String>,
    pub locations: Vec<String>,
    pub work_modes: Vec<WorkMode>,
    pub experience_levels: Vec<ExperienceLevel>,
    pub min_salary: Option<f64>,
}

fn contains_any_ci(haystack: &str, needles: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    needles
        .iter()
        .any(|needle| haystack.contains(&needle.to_lowercase()))
}

impl JobFilter {
    pub fn is_empty(&self) -> bool {
        self.title_keywords.is_empty()
            && self.locations.is_empty()
            && self.work_modes.is_empty()
            && self.experience_levels.is_empty()
            && self.min_salary.is_none()
    }

    pub fn matches(&self, job: &Job) -> bool {
        if !self.title_keywords.is_empty() && !contains_any_ci(&job.title, &self.title_keywords) {
            return false;
        }

        if !self.locations.is_empty() && !contains_any_ci(&job.location, &self.locations) {
            return false;
        }

        if !self.work_modes.is_empty() && !self.work_modes.contains(&job.work_mode) {
            return false;
        }

        if !self.experience_levels.is_empty()
            && !self.experience_levels.contains(&job.experience_level)
        {
            return false;
        }

        // Postings without salary data are kept.
        if let (Some(threshold), Some(salary_min)) = (self.min_salary, job.salary_min()) {
            if salary_min < threshold {
                return false;
            }
        }

        true
    }

    /// Keep matching jobs, preserving their order.
    pub fn apply(&self, jobs: Vec<Job>) -> Vec<Job> {
        if self.is_empty() {
            return jobs;
        }
        jobs.into_iter().filter(|job| self.matches(job)).collect()
    }
}
