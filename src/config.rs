use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILE: &str = "whisky_extract";
const ENV_PREFIX: &str = "WHISKY_EXTRACT";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    pub max_retries: u32,
    pub include_debug: bool,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_seconds: 25,
            max_retries: 3,
            include_debug: false,
            log_json: false,
        }
    }
}

impl Config {
    /// Defaults, then the config file (`whisky_extract.toml` unless `path` is given),
    /// then `WHISKY_EXTRACT_*` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let defaults = Config::default();
        let file = match path {
            Some(path) => ::config::File::with_name(path).required(true),
            None => ::config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = ::config::Config::builder()
            .set_default("user_agent", defaults.user_agent)?
            .set_default("request_timeout_seconds", defaults.request_timeout_seconds as i64)?
            .set_default("max_retries", i64::from(defaults.max_retries))?
            .set_default("include_debug", defaults.include_debug)?
            .set_default("log_json", defaults.log_json)?
            .add_source(file)
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Invalid configuration")?;

        if config.max_retries == 0 {
            anyhow::bail!("max_retries must be at least 1");
        }
        Ok(config)
    }
}
