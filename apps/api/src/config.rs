use anyhow::{ensure, Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    /// Total upstream attempts per generation, including the first one.
    pub llm_max_attempts: u32,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

/// Total upstream attempts when `LLM_MAX_ATTEMPTS` is unset: one call, no retries.
pub const DEFAULT_LLM_MAX_ATTEMPTS: u32 = 1;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let llm_max_attempts = parse_or(&lookup, "LLM_MAX_ATTEMPTS", DEFAULT_LLM_MAX_ATTEMPTS)
            .context("LLM_MAX_ATTEMPTS must be a positive integer")?;
        ensure!(llm_max_attempts >= 1, "LLM_MAX_ATTEMPTS must be at least 1");

        Ok(Config {
            openai_api_key: require(&lookup, "OPENAI_API_KEY")?,
            openai_base_url: lookup("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            llm_max_attempts,
            llm_timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", 120u64)
                .context("LLM_TIMEOUT_SECS must be a number of seconds")?,
            port: parse_or(&lookup, "PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => Ok(raw.trim().parse::<T>()?),
        None => Ok(default),
    }
}
