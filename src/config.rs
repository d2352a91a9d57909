//! Configuration module
//!
//! Values are resolved as: command line > process environment > agent.conf > defaults.
//! agent.conf uses the same `KEY=VALUE` format as a `.env` file.

use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use crate::constants;
use crate::error::ConfigError;
use crate::logic::drift::rules::{parse_rules, SuspicionRule};

/// Command-line overrides
#[derive(Debug, Default, Clone, Parser)]
#[command(name = "sentinel-agent", version, about = "Sentinel host response agent")]
pub struct CliArgs {
    /// Controller base URL, overrides API_SERVER
    #[arg(long)]
    pub server: Option<String>,

    /// agent.conf to read instead of the search paths
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Accept self-signed controller certificates
    #[arg(long)]
    pub tls_skip_verify: bool,
}

/// Agent configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Controller base URL (no trailing slash)
    pub api_server: String,

    /// Accept self-signed controller certificates
    pub tls_skip_verify: bool,

    /// Push-channel server address
    pub listen_addr: SocketAddr,

    /// Command poll period
    pub poll_interval: Duration,

    /// Drift scan period
    pub scan_interval: Duration,

    /// Process snapshot period
    pub snapshot_interval: Duration,

    /// Timeout for the poll GET
    pub poll_timeout: Duration,

    /// Timeout for every other HTTP exchange, inbound and outbound
    pub http_timeout: Duration,

    pub process_monitoring: bool,
    pub behavioral_analysis: bool,
    pub vulnerability_scanning: bool,

    /// Parent/child suspicion table for the drift detector
    pub suspicious_pairs: Vec<SuspicionRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from flags, the environment and agent.conf.
    /// An explicitly named config file must be readable.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file_values = match config_path(cli, env::var("SENTINEL_CONFIG").ok()) {
            Some(path) => {
                let values = read_config_file(&path)?;
                tracing::info!("Loaded configuration from {}", path.display());
                values
            }
            None => discover_config_file(),
        };

        Ok(Self::from_sources(cli, |key| env::var(key).ok(), &file_values))
    }

    /// Layer flags over `env_lookup` over file values
    pub fn from_sources<E>(cli: &CliArgs, env_lookup: E, file_values: &HashMap<String, String>) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|key| {
            let flag = match key {
                "API_SERVER" => cli.server.clone(),
                // The flag can only switch verification off
                "TLS_SKIP_VERIFY" if cli.tls_skip_verify => Some("true".to_string()),
                _ => None,
            };
            flag.or_else(|| env_lookup(key))
                .or_else(|| file_values.get(key).cloned())
        })
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_server = lookup("API_SERVER")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| constants::DEFAULT_API_SERVER.to_string());

        let mut tls_skip_verify = read_bool(&lookup, "TLS_SKIP_VERIFY", false);
        if !tls_skip_verify && is_development_url(&api_server) {
            tracing::info!("Auto-enabled TLS skip verification for development URL: {}", api_server);
            tls_skip_verify = true;
        }

        if api_server == constants::DEFAULT_API_SERVER {
            tracing::warn!("Using default API server {}; set API_SERVER for remote deployments", api_server);
        }

        let listen_addr = lookup("LISTEN_ADDR")
            .and_then(|raw| match raw.trim().parse() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    tracing::warn!("Invalid LISTEN_ADDR '{}', using default", raw);
                    None
                }
            })
            .unwrap_or_else(default_listen_addr);

        let suspicious_pairs = lookup("SUSPICIOUS_PAIRS")
            .map(|raw| parse_rules(&raw))
            .filter(|rules| !rules.is_empty())
            .unwrap_or_else(|| parse_rules(constants::DEFAULT_SUSPICIOUS_PAIRS));

        Self {
            api_server,
            tls_skip_verify,
            listen_addr,
            poll_interval: read_duration(&lookup, "POLL_INTERVAL", constants::DEFAULT_POLL_INTERVAL),
            scan_interval: read_duration(&lookup, "SCAN_INTERVAL", constants::DEFAULT_SCAN_INTERVAL),
            snapshot_interval: read_duration(&lookup, "SNAPSHOT_INTERVAL", constants::DEFAULT_SNAPSHOT_INTERVAL),
            poll_timeout: read_duration(&lookup, "POLL_TIMEOUT", constants::DEFAULT_POLL_TIMEOUT),
            http_timeout: read_duration(&lookup, "HTTP_TIMEOUT", constants::DEFAULT_HTTP_TIMEOUT),
            process_monitoring: read_bool(&lookup, "PROCESS_MONITORING", true),
            behavioral_analysis: read_bool(&lookup, "BEHAVIORAL_ANALYSIS", true),
            vulnerability_scanning: read_bool(&lookup, "VULNERABILITY_SCANNING", true),
            suspicious_pairs,
        }
    }

    /// Drift monitoring needs both switches on
    pub fn drift_enabled(&self) -> bool {
        self.process_monitoring && self.behavioral_analysis
    }
}

/// Read a KEY=VALUE file into a map
pub fn read_config_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| ConfigError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut values = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| ConfigError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        values.insert(key, value);
    }
    Ok(values)
}

/// `--config` wins over `SENTINEL_CONFIG`
fn config_path(cli: &CliArgs, env_value: Option<String>) -> Option<PathBuf> {
    cli.config
        .clone()
        .or_else(|| env_value.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
}

fn discover_config_file() -> HashMap<String, String> {
    let Some(path) = constants::CONFIG_SEARCH_PATHS
        .iter()
        .map(Path::new)
        .find(|p| p.is_file())
    else {
        tracing::info!("No agent.conf found, using built-in defaults");
        return HashMap::new();
    };

    match read_config_file(path) {
        Ok(values) => {
            tracing::info!("Loaded configuration from {}", path.display());
            values
        }
        Err(e) => {
            tracing::warn!("Ignoring config file: {}", e);
            HashMap::new()
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 9090))
}

fn is_development_url(url: &str) -> bool {
    url.contains("localhost") || url.contains("127.0.0.1") || url.contains(".local")
}

fn read_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            other => {
                tracing::warn!("Invalid boolean for {}: '{}', using {}", key, other, default);
                default
            }
        },
        None => default,
    }
}

fn read_duration<F>(lookup: &F, key: &str, default_secs: u64) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    let default = Duration::from_secs(default_secs);
    match lookup(key) {
        Some(raw) => parse_duration(&raw).unwrap_or_else(|| {
            tracing::warn!("Invalid duration for {}: '{}', using {:?}", key, raw, default);
            default
        }),
        None => default,
    }
}

/// Parse `10`, `500ms`, `10s`, `5m` or `1h`
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let value: u64 = digits.parse().ok()?;

    match unit {
        "" | "s" => Some(Duration::from_secs(value)),
        "ms" => Some(Duration::from_millis(value)),
        "m" => Some(Duration::from_secs(value * 60)),
        "h" => Some(Duration::from_secs(value * 3600)),
        _ => None,
    }
}
