//! Configuration management for Term Translate

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub bedrock: BedrockConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Amazon Bedrock target
#[derive(Debug, Clone, Deserialize)]
pub struct BedrockConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Overrides `https://bedrock-runtime.{region}.amazonaws.com`
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            model_id: default_model_id(),
            endpoint_url: None,
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_model_id() -> String {
    "anthropic.claude-3-sonnet-20240229-v1:0".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl Config {
    /// Load configuration from translate.toml (or `$TRANSLATE_CONFIG`)
    pub fn load() -> Result<Self> {
        let path = std::env::var("TRANSLATE_CONFIG").unwrap_or_else(|_| "translate.toml".to_string());
        Self::load_from(path)
    }

    /// Load configuration from a specific path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;

            let mut config = Self::from_toml(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?;

            config.expand_env_vars();
            return Ok(config);
        }

        // Fall back to environment variables only
        Self::from_env()
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration entirely from environment variables
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", raw))?,
            Err(_) => default_port(),
        };

        Ok(Config {
            server: ServerConfig {
                host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
                port,
            },
            bedrock: BedrockConfig {
                region: std::env::var("AWS_REGION")
                    .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
                    .unwrap_or_else(|_| default_region()),
                model_id: std::env::var("BEDROCK_MODEL_ID").unwrap_or_else(|_| default_model_id()),
                endpoint_url: std::env::var("BEDROCK_ENDPOINT_URL").ok(),
            },
            logging: LoggingConfig {
                format: std::env::var("LOG_FORMAT")
                    .map(|f| LogFormat::parse(&f))
                    .unwrap_or_default(),
            },
        })
    }

    /// Expand ${VAR} patterns in string fields
    fn expand_env_vars(&mut self) {
        self.server.host = expand_env(&self.server.host);
        self.bedrock.region = expand_env(&self.bedrock.region);
        self.bedrock.model_id = expand_env(&self.bedrock.model_id);
        if let Some(ref mut url) = self.bedrock.endpoint_url {
            *url = expand_env(url);
        }
    }
}

/// Expand ${VAR} patterns in a string. Substituted text is not expanded again.
fn expand_env(s: &str) -> String {
    let mut result = s.to_string();
    let mut cursor = 0;

    while let Some(offset) = result[cursor..].find("${") {
        let start = cursor + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let replacement = std::env::var(var_name).unwrap_or_default();
        result.replace_range(start..start + end + 1, &replacement);
        cursor = start + replacement.len();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_env() {
        std::env::set_var("TERM_TRANSLATE_TEST_VAR", "hello");
        assert_eq!(expand_env("${TERM_TRANSLATE_TEST_VAR}"), "hello");
        assert_eq!(
            expand_env("prefix_${TERM_TRANSLATE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(expand_env("no_vars_here"), "no_vars_here");
        assert_eq!(expand_env("${unterminated"), "${unterminated");
        std::env::remove_var("TERM_TRANSLATE_TEST_VAR");
    }

    #[test]
    fn test_expand_env_does_not_reexpand_values() {
        std::env::set_var("TERM_TRANSLATE_SELF_REF", "${TERM_TRANSLATE_SELF_REF}");
        assert_eq!(
            expand_env("a-${TERM_TRANSLATE_SELF_REF}-b"),
            "a-${TERM_TRANSLATE_SELF_REF}-b"
        );
        std::env::set_var("TERM_TRANSLATE_NESTED", "${TERM_TRANSLATE_SELF_REF}x");
        assert_eq!(
            expand_env("${TERM_TRANSLATE_NESTED}${TERM_TRANSLATE_MISSING_VAR}!"),
            "${TERM_TRANSLATE_SELF_REF}x!"
        );
        std::env::remove_var("TERM_TRANSLATE_SELF_REF");
        std::env::remove_var("TERM_TRANSLATE_NESTED");
    }

    #[test]
    fn test_toml_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.bedrock.region, "us-east-1");
        assert_eq!(config.bedrock.model_id, "anthropic.claude-3-sonnet-20240229-v1:0");
        assert_eq!(config.bedrock.endpoint_url, None);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_toml_overrides() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 9090

            [bedrock]
            region = "sa-east-1"
            model_id = "anthropic.claude-3-haiku-20240307-v1:0"
            endpoint_url = "http://localhost:4566"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.bedrock.region, "sa-east-1");
        assert_eq!(config.bedrock.model_id, "anthropic.claude-3-haiku-20240307-v1:0");
        assert_eq!(config.bedrock.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" json "), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Pretty);
    }
}
