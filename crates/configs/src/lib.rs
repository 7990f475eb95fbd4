use std::{io, path::PathBuf, time::Duration};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

/// Complete configuration for both services. Every section is optional in
/// the TOML file; missing keys fall back to defaults and may be overridden
/// from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "ServerConfig::users_default")]
    pub users: ServerConfig,
    #[serde(default = "ServerConfig::flights_default")]
    pub flights: ServerConfig,
    #[serde(default)]
    pub user_service: UserServiceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            users: ServerConfig::users_default(),
            flights: ServerConfig::flights_default(),
            user_service: UserServiceConfig::default(),
        }
    }
}

/// Listener and backing store of one collection service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// 0 (or absent) means the service's published default port.
    #[serde(default)]
    pub port: u16,
    /// `memory://` or `file://<path>`
    #[serde(default = "default_store_url")]
    pub store_url: String,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

/// Where the flight service reaches the user service.
#[derive(Debug, Clone, Deserialize)]
pub struct UserServiceConfig {
    #[serde(default = "default_user_service_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self { base_url: default_user_service_url(), timeout_ms: default_timeout_ms() }
    }
}

pub const DEFAULT_USERS_PORT: u16 = 3001;
pub const DEFAULT_FLIGHTS_PORT: u16 = 3002;

fn default_host() -> String { "127.0.0.1".into() }
fn default_store_url() -> String { "memory://".into() }
fn default_user_service_url() -> String { format!("http://127.0.0.1:{DEFAULT_USERS_PORT}") }
fn default_timeout_ms() -> u64 { 2000 }

impl ServerConfig {
    fn with_port(port: u16) -> Self {
        Self { host: default_host(), port, store_url: default_store_url(), worker_threads: None }
    }

    pub fn users_default() -> Self { Self::with_port(DEFAULT_USERS_PORT) }

    pub fn flights_default() -> Self { Self::with_port(DEFAULT_FLIGHTS_PORT) }

    /// `host:port` suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn apply_env<F>(&mut self, prefix: &str, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(&format!("{prefix}_HOST")) {
            self.host = host;
        }
        if let Some(port) = lookup(&format!("{prefix}_PORT")) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("{prefix}_PORT must be a port number, got {port:?}"))?;
        }
        if let Some(url) = lookup(&format!("{prefix}_STORE_URL")) {
            self.store_url = url;
        }
        if let Some(w) = lookup(&format!("{prefix}_WORKER_THREADS")) {
            let threads = w
                .trim()
                .parse()
                .with_context(|| format!("{prefix}_WORKER_THREADS must be a thread count, got {w:?}"))?;
            self.worker_threads = Some(threads);
        }
        Ok(())
    }

    fn normalize(&mut self, section: &str, default_port: u16) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            self.port = default_port;
        }
        if self.store_url.trim().is_empty() {
            self.store_url = default_store_url();
        }
        self.store_url = self.store_url.trim().to_string();
        StoreLocation::parse(&self.store_url).with_context(|| format!("invalid {section}.store_url"))?;
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }
}

impl UserServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn apply_env<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("USER_SERVICE_URL") {
            self.base_url = url;
        }
        if let Some(ms) = lookup("USER_SERVICE_TIMEOUT_MS") {
            self.timeout_ms = ms
                .trim()
                .parse()
                .with_context(|| format!("USER_SERVICE_TIMEOUT_MS must be milliseconds, got {ms:?}"))?;
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        let lower = trimmed.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("user_service.base_url must start with http:// or https://"));
        }
        if self.timeout_ms == 0 {
            return Err(anyhow!("user_service.timeout_ms must be positive"));
        }
        self.base_url = trimmed;
        Ok(())
    }
}

/// Where a record store keeps its data, parsed from a store URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// `memory://`
    Memory,
    /// `file://<path>`
    File(PathBuf),
}

const MEMORY_SCHEME: &str = "memory://";
const FILE_SCHEME: &str = "file://";

impl StoreLocation {
    /// Accepts exactly `memory://` (or an empty string) and `file://<path>`
    /// with a non-empty path. Schemes are case-sensitive.
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() || url == MEMORY_SCHEME {
            return Ok(Self::Memory);
        }
        match url.strip_prefix(FILE_SCHEME) {
            Some(path) if !path.trim().is_empty() => Ok(Self::File(PathBuf::from(path))),
            _ => Err(anyhow!("unsupported store url {url:?}; expected memory:// or file://<path>")),
        }
    }
}

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).with_context(|| format!("cannot read config file {path}"))?;
    parse(&content).with_context(|| format!("invalid config file {path}"))
}

/// Like `load_from_file`, but a missing file yields the defaults. Any other
/// failure (unreadable, malformed) is returned.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
    match load_from_file(path) {
        Ok(cfg) => Ok(cfg),
        Err(e) if is_missing_file(&e) => Ok(AppConfig::default()),
        Err(e) => Err(e),
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.chain()
        .filter_map(|c| c.downcast_ref::<io::Error>())
        .any(|io| io.kind() == io::ErrorKind::NotFound)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// File (if present) -> environment overrides -> validation.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path(), |k| std::env::var(k).ok())
    }

    pub fn load_and_validate_from<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = load_or_default(path)?;
        cfg.apply_env_with(lookup)?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.users.apply_env("USERS", &lookup)?;
        self.flights.apply_env("FLIGHTS", &lookup)?;
        self.user_service.apply_env(&lookup)?;
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.users.normalize("users", DEFAULT_USERS_PORT)?;
        self.flights.normalize("flights", DEFAULT_FLIGHTS_PORT)?;
        self.user_service.validate()?;
        Ok(())
    }
}
