//! Service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default subgraph serving the transactions collection.
const DEFAULT_TRANSACTIONS_SUBGRAPH_URL: &str =
    "https://graph.tetu.io/subgraphs/name/sacra-sonic-transactions";

/// First timestamp considered for incremental transaction ingestion.
const DEFAULT_START_TIMESTAMP: i64 = 1_741_564_800;

/// Configuration loaded from environment variables
///
/// Loaded once at startup with sensible defaults; only `SUBGRAPH_URL` is
/// required.
#[derive(Debug, Clone)]
pub struct Config {
    /// Main game subgraph (positions and account activity).
    pub subgraph_url: String,

    /// Transactions subgraph.
    pub transactions_subgraph_url: String,

    /// Records requested per page.
    pub page_size: usize,

    /// Retry bound for full-refresh page fetches (no backoff).
    pub max_retries: u32,

    /// Retry bound for transaction page fetches (linear backoff).
    pub transactions_max_retries: u32,

    /// Interval between pawnshop position refreshes.
    pub positions_interval: Duration,

    /// Interval between transaction refreshes.
    pub transactions_interval: Duration,

    /// Interval between account activity refreshes.
    pub accounts_interval: Duration,

    /// Lower timestamp bound for the first transactions fetch.
    pub start_timestamp: i64,

    /// Hero action codes counted toward account stats.
    pub hero_action_codes: Vec<i64>,

    /// Item action codes counted toward account stats.
    pub item_action_codes: Vec<i64>,

    /// HTTP listen port.
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `SUBGRAPH_URL` (required)
    /// - `TRANSACTIONS_SUBGRAPH_URL`
    /// - `PAWNSHOP_FIRST` (default: 1000)
    /// - `PAWNSHOP_MAX_RETRIES` (default: 10)
    /// - `TRANSACTIONS_MAX_RETRIES` (default: 3)
    /// - `POSITIONS_REFRESH_SECS` / `TRANSACTIONS_REFRESH_SECS` /
    ///   `ACCOUNTS_REFRESH_SECS` (default: 60 each)
    /// - `START_TIMESTAMP` (default: 1741564800)
    /// - `HERO_ACTION_CODES` (default: "3,4")
    /// - `ITEM_ACTION_CODES` (default: "0,2,3,4,7")
    /// - `PORT` (default: 3000)
    pub fn from_env() -> Self {
        let subgraph_url = env::var("SUBGRAPH_URL").expect("SUBGRAPH_URL must be set in .env file");

        let transactions_subgraph_url = env::var("TRANSACTIONS_SUBGRAPH_URL")
            .unwrap_or_else(|_| DEFAULT_TRANSACTIONS_SUBGRAPH_URL.to_string());

        let hero_action_codes = env::var("HERO_ACTION_CODES")
            .map(|raw| parse_codes(&raw))
            .unwrap_or_else(|_| vec![3, 4]);

        let item_action_codes = env::var("ITEM_ACTION_CODES")
            .map(|raw| parse_codes(&raw))
            .unwrap_or_else(|_| vec![0, 2, 3, 4, 7]);

        Self {
            subgraph_url,
            transactions_subgraph_url,
            page_size: env_or("PAWNSHOP_FIRST", 1000),
            max_retries: env_or("PAWNSHOP_MAX_RETRIES", 10),
            transactions_max_retries: env_or("TRANSACTIONS_MAX_RETRIES", 3),
            positions_interval: Duration::from_secs(env_or("POSITIONS_REFRESH_SECS", 60)),
            transactions_interval: Duration::from_secs(env_or("TRANSACTIONS_REFRESH_SECS", 60)),
            accounts_interval: Duration::from_secs(env_or("ACCOUNTS_REFRESH_SECS", 60)),
            start_timestamp: env_or("START_TIMESTAMP", DEFAULT_START_TIMESTAMP),
            hero_action_codes,
            item_action_codes,
            port: env_or("PORT", 3000),
        }
    }
}

fn env_or<T: FromStr + Copy>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn parse_codes(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|code| code.trim().parse().ok())
        .collect()
}
