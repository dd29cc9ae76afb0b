use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::ConfigError;
use crate::validation::{EmbeddedSchema, SchemaFailure};

static CONFIG_SCHEMA: EmbeddedSchema =
    EmbeddedSchema::new("config-v1", include_str!("../../../../schema/config-v1.json"));

/// Environment variable that overrides the configured backend base URL.
pub const BASE_URL_ENV: &str = "GIFTCAT_BASE_URL";

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    log::debug!("Loading config from {}", path.display());

    std::fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|content| load_config_from_str(&content))
}

/// Parses, schema-checks, deserializes and semantically checks a config document.
pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let document: serde_json::Value = serde_json::from_str(content)?;
    validate_schema(&document)?;

    let config: Config = serde_json::from_value(document)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    CONFIG_SCHEMA.validate(json_value).map_err(|failure| match failure {
        SchemaFailure::Unavailable(message) => ConfigError::Validation { message },
        SchemaFailure::Violations(errors) => ConfigError::SchemaValidation {
            errors: errors.join("; "),
        },
    })
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.polling.max_attempts == 0 {
        return Err(ConfigError::Validation {
            message: "polling.max_attempts must be at least 1".to_string(),
        });
    }

    if let Some(base_url) = &config.base_url {
        validate_base_url(base_url)?;
    }

    Ok(())
}

fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(base_url).map_err(|e| ConfigError::Validation {
        message: format!(
            "Invalid base_url '{}': {}",
            crate::sanitize::redact_url(base_url),
            e
        ),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            message: format!("base_url must use http or https, got '{}'", parsed.scheme()),
        });
    }

    Ok(())
}

impl Config {
    /// Picks the backend base URL: explicit override, then `GIFTCAT_BASE_URL`,
    /// then the config file.
    pub fn resolve_base_url(&self, override_url: Option<&str>) -> Result<String, ConfigError> {
        let env_url = std::env::var(BASE_URL_ENV).ok().filter(|v| !v.is_empty());
        let chosen = override_url
            .map(str::to_string)
            .or(env_url)
            .or_else(|| self.base_url.clone())
            .ok_or_else(|| ConfigError::Validation {
                message: format!(
                    "No backend base URL: set base_url in the config file or {}",
                    BASE_URL_ENV
                ),
            })?;

        validate_base_url(&chosen)?;
        Ok(chosen)
    }

    /// Session store path, falling back to the per-user default location.
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store
            .path
            .clone()
            .or_else(crate::store::default_store_path)
    }
}
