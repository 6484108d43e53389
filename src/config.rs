// src/config.rs

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `questions_<tier>.txt`.
    pub questions_dir: PathBuf,
    pub token_secret: String,
    /// Lifetime of the difficulty token and its cookie, in seconds.
    pub token_expiration: u64,
    /// Seconds without activity after which a session is evicted.
    pub session_idle_timeout: u64,
    pub session_sweep_interval: u64,
    pub cache_question_banks: bool,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub static_dir: Option<PathBuf>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::load().0
    }

    /// Like `from_env`, but also returns a message for every variable that was
    /// set to an unparsable value and fell back to its default. Config is read
    /// before logging is up, so the caller logs these once tracing is initialized.
    pub fn load() -> (Self, Vec<String>) {
        dotenv().ok();
        let mut warnings = Vec::new();

        let questions_dir = env::var("QUESTIONS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./questions"));

        let token_secret = env::var("TOKEN_SECRET")
            .expect("TOKEN_SECRET must be set");

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let config = Self {
            questions_dir,
            token_secret,
            token_expiration: parse_var("TOKEN_EXPIRATION", 86_400, &mut warnings),
            session_idle_timeout: parse_var("SESSION_IDLE_TIMEOUT", 1_800, &mut warnings),
            session_sweep_interval: parse_var("SESSION_SWEEP_INTERVAL", 60, &mut warnings),
            cache_question_banks: parse_var("CACHE_QUESTION_BANKS", false, &mut warnings),
            port: parse_var("PORT", 8080, &mut warnings),
            allowed_origins,
            static_dir: env::var("STATIC_DIR").ok().map(PathBuf::from),
            rust_log,
        };
        (config, warnings)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout)
    }

    pub fn sweep_interval(&self) -> Duration {
        // tokio's interval panics on a zero period
        Duration::from_secs(self.session_sweep_interval.max(1))
    }
}

fn parse_var<T: FromStr>(key: &str, default: T, warnings: &mut Vec<String>) -> T {
    parse_value(key, env::var(key).ok(), default, warnings)
}

fn parse_value<T: FromStr>(
    key: &str,
    raw: Option<String>,
    default: T,
    warnings: &mut Vec<String>,
) -> T {
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warnings.push(format!("Ignoring invalid value '{}' for {}", raw, key));
            default
        }),
        None => default,
    }
}
