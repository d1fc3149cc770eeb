//! Controller configuration from environment variables.

use crate::error::ControllerError;
use std::path::PathBuf;

/// Default number of concurrent reconciliations
pub const DEFAULT_WORKERS: usize = 4;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Deployment state document (`DEPLOYMENT_STATE`)
    pub state_path: PathBuf,

    /// Report destination (`PLAN_OUTPUT`), stdout when unset
    pub output_path: Option<PathBuf>,

    /// Maximum reconciliations in flight (`RECONCILE_WORKERS`)
    pub workers: usize,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ControllerError> {
        let state_path = lookup("DEPLOYMENT_STATE")
            .map(PathBuf::from)
            .ok_or_else(|| ControllerError::InvalidConfig("DEPLOYMENT_STATE environment variable is required".to_string()))?;
        let output_path = lookup("PLAN_OUTPUT").map(PathBuf::from);

        let workers = match lookup("RECONCILE_WORKERS") {
            Some(value) => value.parse::<usize>().map_err(|e| {
                ControllerError::InvalidConfig(format!("RECONCILE_WORKERS '{value}' is not a number: {e}"))
            })?,
            None => DEFAULT_WORKERS,
        };
        if workers == 0 {
            return Err(ControllerError::InvalidConfig(
                "RECONCILE_WORKERS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            state_path,
            output_path,
            workers,
        })
    }
}
