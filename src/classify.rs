use crate::models::{ExperienceLevel, WorkMode};

pub const REMOTE_SIGNALS: &[&str] = &["remote", "work from home", "wfh"];
pub const HYBRID_SIGNALS: &[&str] = &["hybrid", "flexible"];
pub const ONSITE_SIGNALS: &[&str] = &["on-site", "onsite", "in-office", "office"];

/// Experience groups in match priority order. The first group with a
/// matching trigger wins.
pub const EXPERIENCE_SIGNALS: &[(ExperienceLevel, &[&str])] = &[
    (ExperienceLevel::Internship, &["intern", "internship"]),
    (
        ExperienceLevel::Entry,
        &["entry", "junior", "associate", "graduate", "jr."],
    ),
    (ExperienceLevel::Senior, &["senior", "sr.", "staff"]),
    (ExperienceLevel::Lead, &["lead", "principal", "architect"]),
    (
        ExperienceLevel::Executive,
        &["director", "vp", "vice president", "chief", "head of", "executive"],
    ),
    (ExperienceLevel::Mid, &["mid-level", "intermediate"]),
];

/// Level used when no experience signal is present.
pub const DEFAULT_EXPERIENCE_LEVEL: ExperienceLevel = ExperienceLevel::Mid;

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Infer the work mode from free text. A remote signal combined with a
/// hybrid signal reads as hybrid.
pub fn classify_work_mode(text: &str) -> WorkMode {
    let text = text.to_lowercase();
    let remote = contains_any(&text, REMOTE_SIGNALS);
    let hybrid = contains_any(&text, HYBRID_SIGNALS);

    if hybrid {
        WorkMode::Hybrid
    } else if remote {
        WorkMode::Remote
    } else if contains_any(&text, ONSITE_SIGNALS) {
        WorkMode::Onsite
    } else {
        WorkMode::Unknown
    }
}

/// Infer the seniority from free text, usually the title. Falls back to
/// `Mid` rather than `Unknown`.
pub fn classify_experience_level(text: &str) -> ExperienceLevel {
    let text = text.to_lowercase();
    EXPERIENCE_SIGNALS
        .iter()
        .find(|(_, triggers)| contains_any(&text, triggers))
        .map(|(level, _)| *level)
        .unwrap_or(DEFAULT_EXPERIENCE_LEVEL)
}
