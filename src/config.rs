use std::env;
use thiserror::Error;

use crate::api_connection::endpoints::DEFAULT_FOOD_CLASSIFIER_MODEL;

pub const BOT_TOKEN_ENV_VAR: &str = "BOT_TOKEN";
pub const APP_ID_ENV_VAR: &str = "APP_ID";
pub const APP_KEY_ENV_VAR: &str = "APP_KEY";
pub const HF_API_TOKEN_ENV_VAR: &str = "HF_API_TOKEN";
pub const CLASSIFIER_MODEL_ENV_VAR: &str = "FOOD_CLASSIFIER_MODEL";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    MissingVar(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutritionixCredentials {
    pub app_id: String,
    pub app_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub api_token: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bot_token: String,
    pub nutritionix: NutritionixCredentials,
    /// `None` when no inference token is configured; photo analysis is then unavailable.
    pub classifier: Option<ClassifierConfig>,
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::MissingVar(key))
}

// Blank values count as unset.
fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl NutritionixCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            app_id: required(&lookup, APP_ID_ENV_VAR)?,
            app_key: required(&lookup, APP_KEY_ENV_VAR)?,
        })
    }
}

impl ClassifierConfig {
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = optional(&lookup, HF_API_TOKEN_ENV_VAR)?;
        let model = optional(&lookup, CLASSIFIER_MODEL_ENV_VAR)
            .unwrap_or_else(|| DEFAULT_FOOD_CLASSIFIER_MODEL.to_string());
        Some(Self { api_token, model })
    }
}

impl Config {
    /// Reads the bot configuration from the process environment. Call
    /// `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            bot_token: required(&lookup, BOT_TOKEN_ENV_VAR)?,
            nutritionix: NutritionixCredentials::from_lookup(&lookup)?,
            classifier: ClassifierConfig::from_lookup(&lookup),
        })
    }
}
