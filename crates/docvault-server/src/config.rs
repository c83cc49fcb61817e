//! Server configuration read from environment variables.
//!
//! - `DOCVAULT_DATA_DIR`: directory holding the snapshot slot (default: "docvault-data")
//! - `DOCVAULT_PORT`: listen port (default: "3000")
//! - `DOCVAULT_MAX_UPLOAD_BYTES`: request body limit (default: 20 MiB)
//! - `GEMINI_API_KEY` (or `API_KEY`): enables the assistant when set
//! - `DOCVAULT_MODEL`: model name (default: "gemini-2.5-flash")
//! - `DOCVAULT_AI_BASE_URL`: API base URL (default: Google's v1beta endpoint)

use std::path::PathBuf;

use thiserror::Error;

use crate::assistant::AssistantConfig;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the HTTP server binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub max_upload_bytes: usize,
    /// `None` when no API key is configured; assistant routes then answer 503.
    pub assistant: Option<AssistantConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values are
    /// treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let data_dir = get("DOCVAULT_DATA_DIR").unwrap_or_else(|| "docvault-data".to_string());
        let port = match get("DOCVAULT_PORT") {
            Some(raw) => parse_var("DOCVAULT_PORT", &raw)?,
            None => 3000,
        };
        let max_upload_bytes = match get("DOCVAULT_MAX_UPLOAD_BYTES") {
            Some(raw) => parse_var("DOCVAULT_MAX_UPLOAD_BYTES", &raw)?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let assistant = get("GEMINI_API_KEY")
            .or_else(|| get("API_KEY"))
            .map(|api_key| AssistantConfig {
                api_key,
                model: get("DOCVAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: get("DOCVAULT_AI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string()),
            });

        Ok(ServerConfig {
            data_dir: PathBuf::from(data_dir),
            port,
            max_upload_bytes,
            assistant,
        })
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|err: T::Err| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("docvault-data"));
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert!(config.assistant.is_none());
    }

    #[test]
    fn api_key_enables_assistant_with_defaults() {
        let config = config_from(&[("API_KEY", "secret")]).unwrap();
        let assistant = config.assistant.unwrap();
        assert_eq!(assistant.api_key, "secret");
        assert_eq!(assistant.model, DEFAULT_MODEL);
        assert_eq!(assistant.base_url, DEFAULT_AI_BASE_URL);
    }

    #[test]
    fn gemini_key_wins_over_generic_key() {
        let config = config_from(&[("API_KEY", "generic"), ("GEMINI_API_KEY", "gemini")]).unwrap();
        assert_eq!(config.assistant.unwrap().api_key, "gemini");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = config_from(&[("DOCVAULT_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("DOCVAULT_PORT"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("DOCVAULT_PORT", "  "), ("GEMINI_API_KEY", "")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.assistant.is_none());
    }
}
