use crate::goal::GoalFormula;
use std::{env, path::PathBuf};
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";
const DEFAULT_RETENTION_DAYS: u32 = 365;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub data_path: PathBuf,
    pub goal_formula: GoalFormula,
    /// Days of intake history kept by the midnight rollover.
    pub retention_days: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let goal_formula = match lookup("GOAL_FORMULA") {
            Some(value) => value.parse().map_err(|reason| ConfigError::Invalid {
                key: "GOAL_FORMULA",
                value,
                reason,
            })?,
            None => GoalFormula::default(),
        };

        let retention_days = match lookup("APP_RETENTION_DAYS") {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(days) if days > 0 => days,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "APP_RETENTION_DAYS",
                        value,
                        reason: "expected a positive number of days".to_string(),
                    });
                }
            },
            None => DEFAULT_RETENTION_DAYS,
        };

        Ok(Self {
            port,
            data_path,
            goal_formula,
            retention_days,
        })
    }
}
