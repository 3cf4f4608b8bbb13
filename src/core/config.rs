use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://cinefeed.db?mode=rwc";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: String,
    pub language: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub database_url: String,
}

impl AppConfig {
    /// Reads `.env.local` if present, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::from_filename(".env.local");
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = read("CINEFEED_API_KEY").ok_or(ConfigError::Missing("CINEFEED_API_KEY"))?;
        let timeout_secs = match read("CINEFEED_HTTP_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "CINEFEED_HTTP_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
        };

        Ok(Self {
            api: ApiSettings {
                base_url: read("CINEFEED_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                api_key,
                language: read("CINEFEED_API_LANGUAGE")
                    .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
            database_url: read("CINEFEED_DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
        })
    }
}
