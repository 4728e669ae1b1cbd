use std::time::Duration;

use anyhow::{Context, Result};

use crate::compile::CompileConfig;
use crate::sync::SyncConfig;

const DEFAULT_LATEX_API_URL: &str = "https://latex.ytotech.com/builds/sync";
const DEFAULT_AI_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_AI_MODEL: &str = "qwen/qwen-2.5-coder-32b-instruct:free";

/// Application configuration loaded from environment variables.
/// Everything has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub latex_api_url: String,
    pub latex_compiler: String,
    pub ai_api_url: String,
    /// AI routes answer with a notice instead of calling out when unset.
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    /// Template a fresh workspace starts with.
    pub default_template: String,
    pub sync: SyncConfig,
    pub compile: CompileConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            latex_api_url: env_or("LATEX_API_URL", DEFAULT_LATEX_API_URL),
            latex_compiler: env_or("LATEX_COMPILER", "pdflatex"),
            ai_api_url: env_or("AI_API_URL", DEFAULT_AI_API_URL),
            ai_api_key: std::env::var("AI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            ai_model: env_or("AI_MODEL", DEFAULT_AI_MODEL),
            default_template: env_or("DEFAULT_TEMPLATE", "classic"),
            sync: SyncConfig {
                visual_debounce: millis_env("SYNC_VISUAL_DEBOUNCE_MS", 300)?,
                code_debounce: millis_env("SYNC_CODE_DEBOUNCE_MS", 500)?,
            },
            compile: CompileConfig {
                debounce: millis_env("COMPILE_DEBOUNCE_MS", 2000)?,
                manual_debounce: millis_env("COMPILE_MANUAL_DEBOUNCE_MS", 100)?,
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn millis_env(key: &str, default: u64) -> Result<Duration> {
    match std::env::var(key) {
        Ok(raw) => parse_millis(&raw).with_context(|| format!("{key} must be a number of milliseconds")),
        Err(_) => Ok(Duration::from_millis(default)),
    }
}

fn parse_millis(raw: &str) -> Result<Duration> {
    Ok(Duration::from_millis(raw.trim().parse::<u64>()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_millis() {
        assert_eq!(parse_millis(" 250 ").unwrap(), Duration::from_millis(250));
        assert!(parse_millis("fast").is_err());
        assert!(parse_millis("-1").is_err());
    }
}
