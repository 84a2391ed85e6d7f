use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::SetupError;
use crate::fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::filter::JobFilter;
use crate::output::OutputFormat;
use crate::pipeline::{ConsoleSink, FileSink, JobSink};
use crate::scrapers::{GreenhouseScraper, JobSource, LeverScraper, WorkdayScraper};

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Settings read from `config.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub filters: JobFilter,
    pub sources: Vec<SourceConfig>,
    pub sinks: Vec<SinkConfig>,
    /// File the settings were read from, if any.
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum SourceConfig {
    Greenhouse { company: String },
    Lever { company: String },
    Workday { company: String, url: String },
}

impl SourceConfig {
    pub fn build(&self) -> Result<Arc<dyn JobSource>, SetupError> {
        let source: Arc<dyn JobSource> = match self {
            SourceConfig::Greenhouse { company } => Arc::new(GreenhouseScraper::new(company)?),
            SourceConfig::Lever { company } => Arc::new(LeverScraper::new(company)?),
            SourceConfig::Workday { company, url } => Arc::new(WorkdayScraper::new(company, url)?),
        };
        Ok(source)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SinkConfig {
    Console {
        #[serde(default)]
        verbose: bool,
    },
    Json {
        path: PathBuf,
    },
    Csv {
        path: PathBuf,
    },
}

impl SinkConfig {
    pub fn build(&self) -> Box<dyn JobSink> {
        match self {
            SinkConfig::Console { verbose } => Box::new(ConsoleSink { verbose: *verbose }),
            SinkConfig::Json { path } => Box::new(FileSink::new(path, OutputFormat::Json)),
            SinkConfig::Csv { path } => Box::new(FileSink::new(path, OutputFormat::Csv)),
        }
    }
}

impl AppConfig {
    /// Load from `explicit` if given, which must exist. Otherwise the
    /// default location is tried and a missing file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                Self::from_file(path)
            }
            None => match Self::config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::parse(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// `<config dir>/jobseek/config.toml` for the current platform.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "jobseek").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Build every configured source, failing on the first invalid entry.
    pub fn build_sources(&self) -> Result<Vec<Arc<dyn JobSource>>> {
        self.sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                source
                    .build()
                    .with_context(|| format!("Invalid source #{} in config", index + 1))
            })
            .collect()
    }

    /// Configured sinks, or a plain console sink when none are listed.
    pub fn build_sinks(&self) -> Vec<Box<dyn JobSink>> {
        if self.sinks.is_empty() {
            return vec![Box::new(ConsoleSink { verbose: false })];
        }
        self.sinks.iter().map(SinkConfig::build).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Source, WorkMode};

    const FULL_CONFIG: &str = r#"
        [logging]
        level = "debug"

        [http]
        timeout_secs = 30

        [filters]
        title_keywords = ["engineer"]
        work_modes = ["remote"]
        min_salary = 120000.0

        [[sources]]
        platform = "greenhouse"
        company = "stripe"

        [[sources]]
        platform = "workday"
        company = "Acme"
        url = "https://acme.wd1.myworkdayjobs.com/careers"

        [[sinks]]
        kind = "console"
        verbose = true

        [[sinks]]
        kind = "csv"
        path = "out/jobs.csv"
    "#;

    #[test]
    fn test_parse_full_config() {
        let config = AppConfig::parse(FULL_CONFIG).unwrap();

        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
        assert_eq!(config.http.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.filters.work_modes, vec![WorkMode::Remote]);
        assert_eq!(config.filters.min_salary, Some(120_000.0));
        assert_eq!(
            config.sources[0],
            SourceConfig::Greenhouse {
                company: "stripe".to_string()
            }
        );
        assert_eq!(config.sinks[0], SinkConfig::Console { verbose: true });
        assert_eq!(
            config.sinks[1],
            SinkConfig::Csv {
                path: PathBuf::from("out/jobs.csv")
            }
        );
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert!(config.logging.level.is_none());
        assert_eq!(config.http.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.filters.is_empty());
        assert!(config.sources.is_empty());
        assert_eq!(config.build_sinks().len(), 1);
        assert_eq!(config.build_sinks()[0].name(), "console");
    }

    #[test]
    fn test_parse_rejects_unknown_platform() {
        let result = AppConfig::parse("[[sources]]\nplatform = \"taleo\"\ncompany = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_build_sources() {
        let config = AppConfig::parse(FULL_CONFIG).unwrap();
        let sources = config.build_sources().unwrap();

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].source(), Source::Greenhouse);
        assert_eq!(sources[0].company(), "stripe");
        assert_eq!(sources[1].source(), Source::Workday);
    }

    #[test]
    fn test_build_sources_reports_bad_entry() {
        let config = AppConfig::parse(
            r#"
            [[sources]]
            platform = "lever"
            company = "netflix"

            [[sources]]
            platform = "workday"
            company = "Acme"
            url = "acme.wd1.myworkdayjobs.com"
            "#,
        )
        .unwrap();

        let err = config.build_sources().err().unwrap();
        assert!(err.to_string().contains("#2"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, FULL_CONFIG).unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_parse_has_no_path() {
        assert!(AppConfig::parse(FULL_CONFIG).unwrap().path.is_none());
    }

    #[test]
    fn test_load_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("missing.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[http\ntimeout_secs = ").unwrap();

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }
}
