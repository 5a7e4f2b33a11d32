use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::i18n::LanguageRegistry;

/// Process-wide environment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Response caching is bypassed entirely.
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => bail!(
                "Unknown environment '{}' (expected 'development' or 'production')",
                other
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Environment
    pub environment: Environment,

    // Cache
    pub cache_ttl_content: Duration,
    pub cache_ttl_static: Duration,

    // Languages
    pub supported_languages: Vec<String>,
    pub default_language: String,

    // Content
    pub content_seed_file: String,

    // Server
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            // Environment
            environment: lookup("ENVIRONMENT")
                .map(|v| v.parse::<Environment>())
                .transpose()
                .context("ENVIRONMENT is invalid")?
                .unwrap_or(Environment::Production),

            // Cache
            cache_ttl_content: parse_ttl(&lookup, "CACHE_TTL_CONTENT", 300)?,
            cache_ttl_static: parse_ttl(&lookup, "CACHE_TTL_STATIC", 3600)?,

            // Languages
            supported_languages: lookup("SUPPORTED_LANGUAGES")
                .unwrap_or_else(|| "en,es".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            default_language: lookup("DEFAULT_LANGUAGE").unwrap_or_else(|| "en".to_string()),

            // Content
            content_seed_file: lookup("CONTENT_SEED_FILE")
                .unwrap_or_else(|| "data/content.json".to_string()),

            // Server
            port: lookup("PORT")
                .map(|v| v.trim().parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(8080),
        };

        // Fail at startup rather than on the first request
        config.language_registry()?;

        Ok(config)
    }

    /// Build the language registry described by this configuration.
    pub fn language_registry(&self) -> Result<LanguageRegistry> {
        LanguageRegistry::new(&self.supported_languages, &self.default_language)
            .context("SUPPORTED_LANGUAGES / DEFAULT_LANGUAGE are invalid")
    }

    /// Whether responses are cached (everywhere except development).
    pub fn cache_enabled(&self) -> bool {
        self.environment != Environment::Development
    }
}

fn parse_ttl<F>(lookup: &F, key: &str, default_secs: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{} must be a whole number of seconds", key))?,
        None => default_secs,
    };

    if secs == 0 {
        bail!("{} must be greater than zero", key);
    }

    Ok(Duration::from_secs(secs))
}
