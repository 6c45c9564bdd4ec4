use crate::state::wheel::DEFAULT_SPIN_DURATION;
use log::{LevelFilter, warn};
use sheet_feed::DEFAULT_SHEET_URL;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_SHEET_URL: &str = "LUCKYDRAW_SHEET_URL";
pub const ENV_SPIN_MS: &str = "LUCKYDRAW_SPIN_MS";
pub const ENV_SEED: &str = "LUCKYDRAW_SEED";
pub const ENV_FEED_TIMEOUT_SECS: &str = "LUCKYDRAW_FEED_TIMEOUT_SECS";
pub const ENV_LOG: &str = "LUCKYDRAW_LOG";

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub sheet_url: String,
    pub spin_duration: Duration,
    /// Fixed RNG seed for reproducible draws.
    pub seed: Option<u64>,
    pub feed_timeout: Option<Duration>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            sheet_url: DEFAULT_SHEET_URL.to_string(),
            spin_duration: DEFAULT_SPIN_DURATION,
            seed: None,
            feed_timeout: None,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value source. Unparseable values keep the
    /// default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Self::default();

        if let Some(url) = get(ENV_SHEET_URL) {
            settings.sheet_url = url;
        }
        if let Some(ms) = get(ENV_SPIN_MS).and_then(|v| parse_or_warn::<u64>(ENV_SPIN_MS, &v)) {
            settings.spin_duration = Duration::from_millis(ms);
        }
        settings.seed = get(ENV_SEED).and_then(|v| parse_or_warn(ENV_SEED, &v));
        settings.feed_timeout = get(ENV_FEED_TIMEOUT_SECS)
            .and_then(|v| parse_or_warn::<u64>(ENV_FEED_TIMEOUT_SECS, &v))
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        settings.log_level = get(ENV_LOG).and_then(|v| parse_or_warn(ENV_LOG, &v));

        settings
    }
}

fn parse_or_warn<T: FromStr>(key: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring invalid {key}={value:?}");
            None
        }
    }
}
