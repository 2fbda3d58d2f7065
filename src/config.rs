use std::path::PathBuf;

use thiserror::Error;

pub const DATASET_VAR: &str = "ENSEMBLE_DATASET";
pub const WORKERS_VAR: &str = "ENSEMBLE_WORKERS";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineConfig {
    /// Compressed ensemble to serve; the built-in sample is used when unset.
    pub dataset_path: Option<PathBuf>,
    /// Fixed number of distance workers; one per core when unset.
    pub workers: Option<usize>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidWorkers { var: &'static str, value: String },
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dataset_path = lookup(DATASET_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let workers = match lookup(WORKERS_VAR) {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(ConfigError::InvalidWorkers {
                        var: WORKERS_VAR,
                        value,
                    })
                }
            },
            None => None,
        };

        Ok(EngineConfig {
            dataset_path,
            workers,
        })
    }
}
