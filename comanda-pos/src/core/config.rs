//! Application configuration
//!
//! # Environment
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | FIREBASE_WEB_API_KEY | (required for firestore) | Identity Toolkit API key |
//! | FIREBASE_PROJECT_ID | (required for firestore) | Firestore project |
//! | FIRESTORE_DATABASE | (default) | Firestore database id |
//! | GEMINI_API_KEY | | enables the advisory model |
//! | GEMINI_MODEL | gemini-2.5-flash | model name |
//! | LLM_TEMPERATURE | 0.7 | creativity knob |
//! | STORE_BACKEND | firestore | `firestore` or `memory` |
//! | UNPROVISIONED_POLICY | lowest-privilege | or `deny` |
//! | REQUEST_TIMEOUT_SECS | 30 | HTTP client timeout |
//! | LOG_LEVEL | info | tracing level |
//! | LOG_DIR | | daily-rolling log directory |
//! | REPORT_TREND_DAYS | 7 | trailing-N-day trend window, 1 to 3650 |
//! | REPORT_TOP_N | 5 | top products shown |

use std::ops::RangeInclusive;
use std::str::FromStr;

use comanda_client::config::DEFAULT_DATABASE;
use comanda_client::gemini::DEFAULT_GEMINI_MODEL;
use shared::AppError;
use thiserror::Error;

use crate::auth::UnprovisionedPolicy;

/// Longest accepted trend window, in days
pub const MAX_TREND_DAYS: u32 = 3650;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::config(err.to_string())
    }
}

/// Where documents live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Firestore,
    /// In-process store, seeded with demo data
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(Self::Firestore),
            "memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FirebaseSettings {
    pub api_key: String,
    pub project_id: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: StoreBackend,
    /// Present when the backend is Firestore
    pub firebase: Option<FirebaseSettings>,
    /// None disables the advisory model
    pub gemini: Option<GeminiSettings>,
    pub unprovisioned_policy: UnprovisionedPolicy,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub report_trend_days: u32,
    pub report_top_n: usize,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend = parse_or(&get, "STORE_BACKEND", StoreBackend::default())?;

        let firebase = match backend {
            StoreBackend::Firestore => Some(FirebaseSettings {
                api_key: get("FIREBASE_WEB_API_KEY")
                    .ok_or(ConfigError::Missing("FIREBASE_WEB_API_KEY"))?,
                project_id: get("FIREBASE_PROJECT_ID")
                    .ok_or(ConfigError::Missing("FIREBASE_PROJECT_ID"))?,
                database: get("FIRESTORE_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.into()),
            }),
            StoreBackend::Memory => None,
        };

        let gemini = match get("GEMINI_API_KEY") {
            Some(api_key) => Some(GeminiSettings {
                api_key,
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
                temperature: parse_or(&get, "LLM_TEMPERATURE", 0.7_f32)?,
            }),
            None => None,
        };

        Ok(Self {
            backend,
            firebase,
            gemini,
            unprovisioned_policy: parse_or(
                &get,
                "UNPROVISIONED_POLICY",
                UnprovisionedPolicy::default(),
            )?,
            request_timeout_secs: parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: get("LOG_DIR"),
            report_trend_days: parse_in(&get, "REPORT_TREND_DAYS", 7, 1..=MAX_TREND_DAYS)?,
            report_top_n: parse_or(&get, "REPORT_TOP_N", 5)?,
        })
    }

    pub fn advisory_enabled(&self) -> bool {
        self.gemini.is_some()
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_in<T, G>(
    get: &G,
    key: &'static str,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + ToString,
    G: Fn(&str) -> Option<String>,
{
    let value = parse_or(get, key, default)?;
    if !range.contains(&value) {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        });
    }
    Ok(value)
}
