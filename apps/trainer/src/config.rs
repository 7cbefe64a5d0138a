//! Runtime configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Dataset location used when `VOCAB_DATASET` is unset.
pub const DEFAULT_DATASET: &str = "words/english_words.json";

/// Delay between a correct answer and the next card.
pub const DEFAULT_ADVANCE_DELAY_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a whole number of milliseconds, got {value:?}")]
    InvalidDelay { name: &'static str, value: String },
}

/// Where the vocabulary dataset is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Path(PathBuf),
    Url(String),
}

impl DatasetSource {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::Path(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dataset: DatasetSource,
    pub db_path: PathBuf,
    pub advance_delay: Duration,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let dataset = DatasetSource::parse(
            &non_empty("VOCAB_DATASET").unwrap_or_else(|| DEFAULT_DATASET.to_string()),
        );

        let db_path = non_empty("VOCAB_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let advance_delay = match non_empty("VOCAB_ADVANCE_DELAY_MS") {
            Some(value) => {
                let ms = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidDelay {
                        name: "VOCAB_ADVANCE_DELAY_MS",
                        value: value.clone(),
                    })?;
                Duration::from_millis(ms)
            }
            None => Duration::from_millis(DEFAULT_ADVANCE_DELAY_MS),
        };

        Ok(Self {
            dataset,
            db_path,
            advance_delay,
        })
    }
}

fn default_db_path() -> PathBuf {
    // Use the local data directory, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-trainer")
        .join("progress.db")
}
