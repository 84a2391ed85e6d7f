use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "JOBSEEK_LOG";

/// Pick the filter directive: `JOBSEEK_LOG`, then the command line, then
/// the config file, then `fallback`.
pub fn resolve_filter(
    env: Option<String>,
    cli: Option<&str>,
    config: Option<&str>,
    fallback: &str,
) -> String {
    env.filter(|value| !value.trim().is_empty())
        .or_else(|| cli.map(str::to_string))
        .or_else(|| config.map(str::to_string))
        .unwrap_or_else(|| fallback.to_string())
}

/// Install the global subscriber. Logs go to stderr so rendered results
/// on stdout stay machine-readable.
pub fn init(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .with_context(|| format!("Invalid log level/filter '{}'", directive))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!("Failed to initialize logging: {}", err))
}
