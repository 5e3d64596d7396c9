//! Run configuration.
//!
//! Settings are an explicit value rather than process-global state: build an
//! [`EvalConfig`] once, from the environment or by hand, and pass it to the
//! pipeline entry point.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable consulted by [`EvalConfig::from_env`].
pub const ENV_VAR: &str = "FINCOT_ENV";

/// Deployment environment selecting a configuration profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development profile.
    Development,
    /// Production profile.
    Production,
}

impl Environment {
    /// The configuration profile for this environment.
    #[must_use]
    pub fn profile(self) -> EvalConfig {
        match self {
            Self::Development => EvalConfig::development(),
            Self::Production => EvalConfig::production(),
        }
    }
}

impl FromStr for Environment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(CoreError::unknown_environment(other)),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Settings for one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Profile this configuration was built from.
    pub environment: Environment,
    /// Path to the dataset JSON file.
    pub dataset_path: PathBuf,
    /// Number of records to keep after the deterministic shuffle.
    pub sample_size: usize,
    /// Seed for the sampler.
    pub seed: u64,
    /// Whether embedded tables are parsed into structured rows.
    pub parse_tables: bool,
    /// Directory receiving outcome and summary CSV files.
    pub output_dir: PathBuf,
    /// Maximum in-flight generation requests. 1 means strictly sequential.
    pub concurrency: usize,
}

impl EvalConfig {
    /// Development profile: the small reproducible sample used while
    /// iterating on prompts and models.
    #[must_use]
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            dataset_path: PathBuf::from("data/train.json"),
            sample_size: 50,
            seed: 10,
            parse_tables: true,
            output_dir: PathBuf::from("output"),
            concurrency: 1,
        }
    }

    /// Production profile: a larger sample with the same determinism
    /// guarantees.
    #[must_use]
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            sample_size: 200,
            ..Self::development()
        }
    }

    /// Select a profile from the `FINCOT_ENV` environment variable.
    ///
    /// A missing variable selects the development profile. An unrecognized
    /// value is an error, not a silent default.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownEnvironment`] when `FINCOT_ENV` is set to
    /// anything other than `development` or `production`.
    pub fn from_env() -> CoreResult<Self> {
        match std::env::var(ENV_VAR) {
            Ok(value) => Ok(value.parse::<Environment>()?.profile()),
            Err(_) => Ok(Self::development()),
        }
    }

    /// Set the dataset path.
    #[must_use]
    pub fn with_dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = path.into();
        self
    }

    /// Set the sample size.
    #[must_use]
    pub fn with_sample_size(mut self, n: usize) -> Self {
        self.sample_size = n;
        self
    }

    /// Set the sampler seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable structured table parsing.
    #[must_use]
    pub fn with_parse_tables(mut self, parse: bool) -> Self {
        self.parse_tables = parse;
        self
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the generation concurrency bound. Clamped to at least 1.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self::development()
    }
}
