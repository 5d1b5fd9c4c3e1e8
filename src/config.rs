//! Configuration management for the autocomplete index.
//!
//! Settings are read from environment variables, with an optional `.env` file
//! loaded first. The library itself never assumes a default Redis endpoint;
//! everything it needs arrives through [`IndexConfig`] and [`ConnectionParams`].

use crate::error::{ConfigError, ConfigResult};
use crate::store::ConnectionParams;
use crate::text::StopWords;
use std::env;

/// Default minimum completion length.
pub const DEFAULT_MIN_COMPLETE: usize = 2;

/// Per-namespace indexing settings.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Namespace ("type") used as the prefix of every key
    pub namespace: String,

    /// Shortest prefix worth indexing, in graphemes
    pub min_complete: usize,

    /// Words excluded from prefix generation
    pub stop_words: StopWords,
}

impl IndexConfig {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            min_complete: DEFAULT_MIN_COMPLETE,
            stop_words: StopWords::default(),
        }
    }

    pub fn with_min_complete(mut self, min_complete: usize) -> Self {
        self.min_complete = min_complete;
        self
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words = StopWords::new(words);
        self
    }

    /// Key of the master prefix registry (a set).
    pub fn index_key(&self) -> String {
        self.namespace.clone()
    }

    /// Key of the raw item hash.
    ///
    /// The doubled separator keeps it apart from every postings key: prefixes
    /// are normalized, so they never contain ':'.
    pub fn data_key(&self) -> String {
        format!("{}::data", self.namespace)
    }

    /// Key of the postings sorted set for `prefix`.
    pub fn postings_key(&self, prefix: &str) -> String {
        format!("{}:{}", self.namespace, prefix)
    }
}

/// Configuration for the command-line loader.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL
    pub redis_url: String,

    /// Redis logical database (default: 0)
    pub redis_database: i64,

    /// Namespace the loader operates on
    pub namespace: String,

    /// Minimum completion length (default: 2)
    pub min_complete: usize,

    /// Stop words, comma separated in the environment
    pub stop_words: Vec<String>,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `REDIS_URL`: Redis connection URL
    /// - `AUTOCOMPLETE_TYPE`: namespace of the index
    ///
    /// Optional environment variables:
    /// - `REDIS_DATABASE`: logical database (default: 0)
    /// - `AUTOCOMPLETE_MIN_COMPLETE`: minimum completion length (default: 2)
    /// - `AUTOCOMPLETE_STOP_WORDS`: comma separated stop words (default: none)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let redis_url =
            env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL".to_string()))?;

        const SCHEMES: [&str; 4] = ["redis://", "rediss://", "unix://", "redis+unix://"];
        if !SCHEMES.iter().any(|scheme| redis_url.starts_with(scheme)) {
            return Err(ConfigError::InvalidValue {
                var: "REDIS_URL".to_string(),
                reason: "Must start with redis://, rediss://, unix:// or redis+unix://"
                    .to_string(),
            });
        }

        let namespace = env::var("AUTOCOMPLETE_TYPE")
            .map_err(|_| ConfigError::MissingVar("AUTOCOMPLETE_TYPE".to_string()))?;
        Self::validate_namespace(&namespace)?;

        let redis_database = Self::parse_env_i64("REDIS_DATABASE", 0)?;
        if redis_database < 0 {
            return Err(ConfigError::InvalidValue {
                var: "REDIS_DATABASE".to_string(),
                reason: "Must not be negative".to_string(),
            });
        }

        let min_complete =
            Self::parse_env_usize("AUTOCOMPLETE_MIN_COMPLETE", DEFAULT_MIN_COMPLETE)?;

        let stop_words = env::var("AUTOCOMPLETE_STOP_WORDS")
            .map(|raw| Self::split_list(&raw))
            .unwrap_or_default();

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            redis_url,
            redis_database,
            namespace,
            min_complete,
            stop_words,
            log_level,
        })
    }

    /// Indexing settings for the configured namespace.
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig::new(self.namespace.clone())
            .with_min_complete(self.min_complete)
            .with_stop_words(&self.stop_words)
    }

    /// Connection parameters for the configured Redis endpoint.
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams::new(self.redis_url.clone()).with_database(self.redis_database)
    }

    fn validate_namespace(namespace: &str) -> ConfigResult<()> {
        if namespace.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "AUTOCOMPLETE_TYPE".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }
        // ':' separates the namespace from prefixes and "data"
        if namespace.contains(':') {
            return Err(ConfigError::InvalidValue {
                var: "AUTOCOMPLETE_TYPE".to_string(),
                reason: "Cannot contain ':'".to_string(),
            });
        }
        Ok(())
    }

    fn split_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|word| !word.is_empty())
            .map(String::from)
            .collect()
    }

    /// Parse an environment variable as i64 with a default value.
    fn parse_env_i64(var_name: &str, default: i64) -> ConfigResult<i64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<i64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}
