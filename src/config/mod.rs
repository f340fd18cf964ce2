//! Application configuration module
//!
//! Configuration is read from an optional TOML file and then from environment
//! variables with the `ORCHESTRATOR` prefix, using `__` between nested keys.
//! List values given through the environment are separated by `|`.
//!
//! # Example
//!
//! ```no_run
//! use interview_orchestrator::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//!
//! println!("{} main questions", config.interview.questions.len());
//! ```

mod error;
mod interview;
mod logging;

pub use error::{ConfigError, ValidationError};
pub use interview::InterviewConfig;
pub use logging::{LogFormat, LoggingConfig};

use serde::Deserialize;
use std::path::Path;

const ENV_PREFIX: &str = "ORCHESTRATOR";

/// Keys whose environment values are `|`-separated lists.
const LIST_KEYS: [&str; 3] = [
    "interview.questions",
    "interview.background_questions",
    "interview.transition_phrases",
];

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Question catalog, follow-up budgets and fixed texts
    #[serde(default)]
    pub interview: InterviewConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ORCHESTRATOR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `ORCHESTRATOR__INTERVIEW__FOLLOWUP_CAP=2` -> `interview.followup_cap = 2`
    /// - `ORCHESTRATOR__INTERVIEW__QUESTIONS="First?|Second?"` -> two main questions
    /// - `ORCHESTRATOR__LOGGING__FORMAT=json` -> `logging.format = json`
    ///
    /// Every value has a default, so an empty environment yields a usable
    /// configuration. The result is validated before it is returned.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config: Self = config::Config::builder()
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, with environment overrides
    ///
    /// The file must exist. Environment variables take precedence over the
    /// file's values. The result is validated before it is returned.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config: Self = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).format(config::FileFormat::Toml))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.interview.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

fn environment() -> config::Environment {
    LIST_KEYS.iter().fold(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .list_separator("|")
            .try_parsing(true),
        |env, key| env.with_list_parse_key(key),
    )
}
