use std::env;
use std::time::Duration;

use crate::contest_page::ContestIsland;
use crate::time_oracle::parse_timestamp;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAGE_SIZE: u32 = 15;
const MAX_PAGE_SIZE: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub page_url: Option<String>,
    pub request_timeout: Duration,
    pub page_size: u32,
    pub demo: bool,
    pub contest_fallback: Option<ContestIsland>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_url: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            demo: false,
            contest_fallback: None,
        }
    }
}

/// Loads `.env.local` then `.env`; variables already set win.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(opt_env)
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

        let request_timeout = Duration::from_secs(
            u64_or_default(get("SCOREBOARD_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS)
                .max(1),
        );
        let page_size = u64_or_default(get("SCOREBOARD_PAGE_SIZE"), DEFAULT_PAGE_SIZE as u64)
            .clamp(1, MAX_PAGE_SIZE as u64) as u32;
        let demo = get("SCOREBOARD_DEMO").is_some_and(|raw| parse_flag(&raw));

        let contest_fallback = get("CONTEST_ID").map(|id| ContestIsland {
            id: id.trim().to_string(),
            start_time: get("CONTEST_START_TIME")
                .map(|raw| parse_timestamp(&raw))
                .unwrap_or(0),
            end_time: get("CONTEST_END_TIME")
                .map(|raw| parse_timestamp(&raw))
                .unwrap_or(0),
            frozen_time: get("CONTEST_FROZEN_TIME").map(|raw| parse_timestamp(&raw)),
            status: get("CONTEST_STATUS").unwrap_or_default(),
        });

        Self {
            page_url: get("SCOREBOARD_URL").map(|url| url.trim().to_string()),
            request_timeout,
            page_size,
            demo,
            contest_fallback,
        }
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|val| if val.trim().is_empty() { None } else { Some(val) })
}

fn u64_or_default(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
