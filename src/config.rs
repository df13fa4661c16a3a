use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default access token lifetime in minutes (24 hours).
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60 * 24;

/// Default gateway request timeout in seconds.
const DEFAULT_LLM_TIMEOUT_SECONDS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout_seconds: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let jwt_secret = vars
            .get("JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?
            .clone();

        if jwt_secret.len() < 32 {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET".to_string(),
                format!("expected at least 32 bytes, got {}", jwt_secret.len()),
            ));
        }

        let token_ttl_minutes = match vars.get("ACCESS_TOKEN_TTL_MINUTES") {
            Some(raw) => raw.parse::<i64>().map_err(|e| {
                ConfigError::InvalidValue("ACCESS_TOKEN_TTL_MINUTES".to_string(), e.to_string())
            })?,
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };

        if token_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue(
                "ACCESS_TOKEN_TTL_MINUTES".to_string(),
                format!("must be positive, got {}", token_ttl_minutes),
            ));
        }

        let llm_base_url = vars
            .get("LLM_BASE_URL")
            .cloned()
            .unwrap_or_else(|| "http://ollama:11434".to_string());

        let llm_model = vars
            .get("LLM_MODEL")
            .cloned()
            .unwrap_or_else(|| "llama3".to_string());

        let llm_timeout_seconds = match vars.get("LLM_TIMEOUT_SECONDS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("LLM_TIMEOUT_SECONDS".to_string(), e.to_string())
            })?,
            None => DEFAULT_LLM_TIMEOUT_SECONDS,
        };

        Ok(Config {
            database_url,
            bind_address,
            jwt_secret,
            token_ttl_minutes,
            llm_base_url,
            llm_model,
            llm_timeout_seconds,
        })
    }
}
