// src/config/mod.rs
// All values come from the environment (.env supported); defaults below.

use once_cell::sync::Lazy;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct YesmanConfig {
    // ── Completion endpoint (OpenAI-compatible, Groq in production)
    pub groq_base_url: String,
    pub groq_api_key: String,
    pub model: String,

    // ── Identity provider (Supabase-style)
    pub supabase_url: String,
    pub supabase_key: String,

    // ── Session refresh policy
    // Interval must stay strictly shorter than the provider token lifetime
    // (60 minutes); 50 minutes leaves room for a missed cycle.
    pub session_refresh_secs: u64,
    pub session_stale_margin_secs: u64,

    // ── Transcript storage
    pub history_dir: String,

    // ── Server
    pub host: String,
    pub port: u16,
    pub cors_origin: String,

    // ── Logging
    pub log_level: String,
}

// Handles values with trailing comments and extra whitespace.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl YesmanConfig {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }

        Self {
            groq_base_url: env_var_or(
                "GROQ_BASE_URL",
                "https://api.groq.com/openai/v1".to_string(),
            ),
            groq_api_key: env_var_or("GROQ_API_KEY", String::new()),
            model: env_var_or("YESMAN_MODEL", "openai/gpt-oss-20b".to_string()),
            supabase_url: env_var_or("SUPABASE_URL", String::new()),
            supabase_key: env_var_or("SUPABASE_KEY", String::new()),
            session_refresh_secs: env_var_or("SESSION_REFRESH_SECS", 50 * 60),
            session_stale_margin_secs: env_var_or("SESSION_STALE_MARGIN_SECS", 5 * 60),
            history_dir: env_var_or("YESMAN_HISTORY_DIR", "user_chat_history".to_string()),
            host: env_var_or("YESMAN_HOST", "0.0.0.0".to_string()),
            port: env_var_or("YESMAN_PORT", 5000),
            cors_origin: env_var_or("YESMAN_CORS_ORIGIN", "*".to_string()),
            log_level: env_var_or("YESMAN_LOG_LEVEL", "info".to_string()),
        }
    }

    /// Server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<YesmanConfig> = Lazy::new(YesmanConfig::from_env);
