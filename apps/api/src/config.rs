use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Built once at startup and handed to every client by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub reddit_client_id: String,
    pub reddit_secret: String,
    pub reddit_user_agent: String,
    /// Directory receiving `{username}_persona.json` and `{username}_persona.png`.
    pub output_dir: PathBuf,
    /// Preferred TrueType face. Missing or unreadable falls back to the bitmap glyphs.
    pub font_path: PathBuf,
    /// Per-kind fetch limit handed to the activity source.
    pub fetch_limit: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            reddit_client_id: require_env("REDDIT_CLIENT_ID")?,
            reddit_secret: require_env("REDDIT_SECRET")?,
            reddit_user_agent: require_env("REDDIT_USER_AGENT")?,
            output_dir: std::env::var("OUTPUT_DIR")
                .unwrap_or_else(|_| "output".to_string())
                .into(),
            font_path: std::env::var("PERSONA_FONT_PATH")
                .unwrap_or_else(|_| "fonts/arial.ttf".to_string())
                .into(),
            fetch_limit: std::env::var("FETCH_LIMIT")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<usize>()
                .context("FETCH_LIMIT must be a non-negative integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
