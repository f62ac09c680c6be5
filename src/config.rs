//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Front end origin allowed by CORS
    pub frontend_url: String,
    /// Directory of GeoJSON solution files
    pub solutions_dir: PathBuf,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            solutions_dir: PathBuf::from("data/solutions"),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (environment, test maps).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            None => 8080,
        };

        Ok(Self {
            port,
            frontend_url: lookup("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            solutions_dir: lookup("SOLUTIONS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/solutions")),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
