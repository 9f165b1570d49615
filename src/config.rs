//! Process configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first when present.
//! Every setting has a default except the provider API key, which is checked
//! when the completion client is built.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};

use crate::llm::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::models::MAX_TAGS;
use crate::tagger::{DEFAULT_MODEL, MAX_INPUT_CHARS};

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_PORT: u16 = 9090;
pub const DEFAULT_BIND: &str = "0.0.0.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub provider: ProviderConfig,
    pub tagging: TaggingConfig,
    pub server: ServerConfig,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Logical provider key used to pick an entry from `models`.
    pub name: String,
    /// Logical provider key → provider model identifier.
    pub models: BTreeMap<String, String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggingConfig {
    pub max_input_chars: usize,
    pub max_tags: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unknown log format '{other}' (expected 'text' or 'json')"),
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut models = BTreeMap::new();
        models.insert(DEFAULT_PROVIDER.to_string(), DEFAULT_MODEL.to_string());
        if let Some(raw) = get("TAGSMITH_MODELS") {
            models.extend(parse_model_map(&raw).context("Invalid TAGSMITH_MODELS")?);
        }

        let provider = ProviderConfig {
            api_key: get("GROQ_API_KEY"),
            base_url: get("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            name: get("TAGSMITH_PROVIDER").unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
            models,
            timeout_secs: parse_var(&get, "TAGSMITH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
        };

        let tagging = TaggingConfig {
            max_input_chars: parse_limit(&get, "TAGSMITH_MAX_INPUT_CHARS", MAX_INPUT_CHARS)?,
            max_tags: parse_limit(&get, "TAGSMITH_MAX_TAGS", MAX_TAGS)?,
        };

        let server = ServerConfig {
            bind: get("TAGSMITH_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: parse_var(&get, "PORT", DEFAULT_PORT)?,
        };

        let log_format = parse_var(&get, "TAGSMITH_LOG_FORMAT", LogFormat::default())?;

        let config = Self {
            provider,
            tagging,
            server,
            log_format,
        };
        config.model()?;

        Ok(config)
    }

    /// Returns the model identifier mapped to the selected provider.
    pub fn model(&self) -> Result<&str> {
        self.provider
            .models
            .get(&self.provider.name)
            .map(String::as_str)
            .ok_or_else(|| {
                let known: Vec<&str> = self.provider.models.keys().map(String::as_str).collect();
                anyhow!(
                    "unknown provider '{}' (configured: {})",
                    self.provider.name,
                    known.join(", ")
                )
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_secs)
    }

    /// Returns the `host:port` string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

fn parse_var<G, T>(get: &G, key: &str, default: T) -> Result<T>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {key}='{raw}': {e}")),
        None => Ok(default),
    }
}

/// Like [`parse_var`], for limits that must be at least 1.
fn parse_limit<G>(get: &G, key: &str, default: usize) -> Result<usize>
where
    G: Fn(&str) -> Option<String>,
{
    let value = parse_var(get, key, default)?;
    if value == 0 {
        bail!("Invalid {key}='0': must be at least 1");
    }
    Ok(value)
}

/// Parses `key=model` pairs separated by commas.
fn parse_model_map(raw: &str) -> Result<BTreeMap<String, String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (key, model) = entry
                .split_once('=')
                .ok_or_else(|| anyhow!("expected 'provider=model', got '{entry}'"))?;
            let (key, model) = (key.trim(), model.trim());
            if key.is_empty() || model.is_empty() {
                bail!("expected 'provider=model', got '{entry}'");
            }
            Ok((key.to_string(), model.to_string()))
        })
        .collect()
}
