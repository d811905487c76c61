// src/config/mod.rs

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct MnemoConfig {
    // ── OpenAI Configuration
    pub openai_base_url: String,
    pub model: String,
    pub summary_temperature: f32,
    pub summary_max_tokens: usize,

    // ── Database Configuration
    pub database_url: String,
    pub sqlite_max_connections: usize,

    // ── Memory Retrieval Configuration
    pub candidate_limit: usize,
    pub relevant_limit: usize,

    // ── Summarization Configuration
    pub rolling_snapshot_threshold: usize,
    pub persist_summary_threshold: usize,
    pub prompt_recent_window: usize,

    // ── Quota Breaker Configuration
    pub quota_trip_threshold: u32,
    pub quota_cooldown_secs: i64,

    // ── Logging Configuration
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

impl MnemoConfig {
    pub fn from_env() -> Self {
        // Load from .env file first if it exists
        let _ = dotenvy::dotenv();

        Self {
            openai_base_url: env_var_or("OPENAI_BASE_URL", "https://api.openai.com/v1".to_string()),
            model: env_var_or("MNEMO_MODEL", "gpt-4o-mini".to_string()),
            summary_temperature: env_var_or("MNEMO_SUMMARY_TEMPERATURE", 0.7),
            summary_max_tokens: env_var_or("MNEMO_SUMMARY_MAX_TOKENS", 1000),
            database_url: env_var_or("DATABASE_URL", "sqlite:./mnemo.db".to_string()),
            sqlite_max_connections: env_var_or("SQLITE_MAX_CONNECTIONS", 10),
            candidate_limit: env_var_or("MNEMO_CANDIDATE_LIMIT", 20),
            relevant_limit: env_var_or("MNEMO_RELEVANT_LIMIT", 3),
            rolling_snapshot_threshold: env_var_or("MNEMO_ROLLING_SNAPSHOT_THRESHOLD", 5),
            persist_summary_threshold: env_var_or("MNEMO_PERSIST_SUMMARY_THRESHOLD", 8),
            prompt_recent_window: env_var_or("MNEMO_PROMPT_RECENT_WINDOW", 6),
            quota_trip_threshold: env_var_or("MNEMO_QUOTA_TRIP_THRESHOLD", 3),
            quota_cooldown_secs: env_var_or("MNEMO_QUOTA_COOLDOWN_SECS", 3600),
            log_level: env_var_or("MNEMO_LOG_LEVEL", "info".to_string()),
        }
    }

    /// Check if debug logging is enabled
    pub fn is_debug(&self) -> bool {
        self.log_level.to_lowercase() == "debug"
    }
}

impl Default for MnemoConfig {
    fn default() -> Self {
        Self {
            openai_base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            summary_temperature: 0.7,
            summary_max_tokens: 1000,
            database_url: "sqlite:./mnemo.db".to_string(),
            sqlite_max_connections: 10,
            candidate_limit: 20,
            relevant_limit: 3,
            rolling_snapshot_threshold: 5,
            persist_summary_threshold: 8,
            prompt_recent_window: 6,
            quota_trip_threshold: 3,
            quota_cooldown_secs: 3600,
            log_level: "info".to_string(),
        }
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<MnemoConfig> = Lazy::new(MnemoConfig::from_env);
