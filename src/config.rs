// ⚙️ Configuration - environment (and optional .env file)

use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Default filter when RUST_LOG is unset
    pub log_level: String,
    pub log_format: LogFormat,
    /// Bank the batch driver seeds the store with
    pub bank_code: String,
    pub bank_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            bank_code: "001".to_string(),
            bank_name: "Pix Bank".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env file if present

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let log_format = match lookup("PIX_LOG_FORMAT") {
            Some(raw) => parse_log_format(&raw).context("PIX_LOG_FORMAT")?,
            None => defaults.log_format,
        };

        Ok(Config {
            log_level: lookup("PIX_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format,
            bank_code: lookup("PIX_BANK_CODE").unwrap_or(defaults.bank_code),
            bank_name: lookup("PIX_BANK_NAME").unwrap_or(defaults.bank_name),
        })
    }
}

fn parse_log_format(raw: &str) -> Result<LogFormat> {
    match raw.trim().to_lowercase().as_str() {
        "text" | "pretty" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => bail!("unsupported log format '{}', expected 'text' or 'json'", other),
    }
}
