use std::{env, fmt::Display, str::FromStr, time::Duration};

use blockonomics_tools::BlockonomicsConfig;
use brew_common::{parse_boolean_flag, parse_number, Secret};
use brew_payment_engine::ReconciliationPolicy;
use log::*;

const DEFAULT_BBC_HOST: &str = "127.0.0.1";
const DEFAULT_BBC_PORT: u16 = 3001;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/cafe.db";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_PUSH_WATCH_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Where orders are kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreKind {
    #[default]
    Sqlite,
    /// Orders vanish when the server stops. Handy for demos.
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            _ => Err(format!("{s} is not a supported store. Use 'sqlite' or 'memory'")),
        }
    }
}

impl Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Sqlite => f.write_str("sqlite"),
            StoreKind::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PushWatcherConfig {
    /// When true, every newly issued Bitcoin address is watched on the Blockonomics push channel.
    pub enabled: bool,
    /// How long a single address is watched before giving up.
    pub watch_timeout: Duration,
}

impl Default for PushWatcherConfig {
    fn default() -> Self {
        Self { enabled: false, watch_timeout: DEFAULT_PUSH_WATCH_TIMEOUT }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub database_url: String,
    pub blockonomics: BlockonomicsConfig,
    /// If set, requests to `/callback` must carry this value in the `secret` query parameter.
    pub callback_secret: Option<Secret<String>>,
    /// The storefront origin that browsers are allowed to call us from.
    pub cors_origin: String,
    pub reconciliation: ReconciliationPolicy,
    pub push_watcher: PushWatcherConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BBC_HOST.to_string(),
            port: DEFAULT_BBC_PORT,
            store: StoreKind::default(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            blockonomics: BlockonomicsConfig::default(),
            callback_secret: None,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            reconciliation: ReconciliationPolicy::default(),
            push_watcher: PushWatcherConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("BBC_HOST").ok().unwrap_or_else(|| DEFAULT_BBC_HOST.into());
        let port = env::var("BBC_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for BBC_PORT. {e} Using the default, {DEFAULT_BBC_PORT}, instead."
                    );
                    DEFAULT_BBC_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_BBC_PORT);
        let store = env::var("BBC_STORE")
            .ok()
            .and_then(|s| {
                s.parse::<StoreKind>()
                    .map_err(|e| warn!("🪛️ Invalid value for BBC_STORE. {e}. Using sqlite instead."))
                    .ok()
            })
            .unwrap_or_default();
        let database_url = env::var("BBC_DATABASE_URL").ok().unwrap_or_else(|| {
            if store == StoreKind::Sqlite {
                info!("🪛️ BBC_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}");
            }
            DEFAULT_DATABASE_URL.to_string()
        });
        let blockonomics = BlockonomicsConfig::new_from_env_or_default();
        let callback_secret = env::var("BBC_CALLBACK_SECRET").ok().filter(|s| !s.is_empty()).map(Secret::new);
        if callback_secret.is_none() {
            warn!("🪛️ BBC_CALLBACK_SECRET is not set. Anyone who can reach /callback can update order status.");
        }
        let cors_origin = env::var("BBC_CORS_ORIGIN").ok().unwrap_or_else(|| DEFAULT_CORS_ORIGIN.into());
        let reconciliation = reconciliation_policy(env::var("BBC_STRICT_MONOTONIC").ok());
        if reconciliation == ReconciliationPolicy::LastWriteWins {
            warn!(
                "🪛️ Strict monotonic reconciliation is disabled. Out-of-order callbacks can move orders backwards."
            );
        }
        let push_watcher = PushWatcherConfig::from_env_or_default();
        Self {
            host,
            port,
            store,
            database_url,
            blockonomics,
            callback_secret,
            cors_origin,
            reconciliation,
            push_watcher,
        }
    }
}

/// `BBC_STRICT_MONOTONIC` takes either a policy name (`monotonic`, `last-write-wins`, `lww`) or a boolean flag.
fn reconciliation_policy(value: Option<String>) -> ReconciliationPolicy {
    if let Some(policy) = value.as_deref().and_then(|s| s.trim().parse::<ReconciliationPolicy>().ok()) {
        return policy;
    }
    ReconciliationPolicy::from_strict_flag(parse_boolean_flag(value, true))
}

impl PushWatcherConfig {
    pub fn from_env_or_default() -> Self {
        let enabled = parse_boolean_flag(env::var("BBC_PUSH_WATCHER").ok(), false);
        let watch_timeout = parse_number::<u64>(env::var("BBC_PUSH_WATCH_TIMEOUT").ok())
            .map_err(|e| warn!("🪛️ Invalid value for BBC_PUSH_WATCH_TIMEOUT. {e}"))
            .ok()
            .flatten()
            .map(|mins| Duration::from_secs(mins * 60))
            .unwrap_or(DEFAULT_PUSH_WATCH_TIMEOUT);
        Self { enabled, watch_timeout }
    }
}
