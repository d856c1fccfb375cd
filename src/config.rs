use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_DIR_NAME: &str = "llm-playground";
pub const DEFAULT_PORT: u16 = 8787;

/// 설정 파일 (config.toml)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub port: u16,
    pub bind: IpAddr,
    /// Overrides the platform config directory for data files
    pub data_dir: Option<PathBuf>,
    pub login_delay_ms: u64,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    pub webhook_url: Option<String>,
    pub webhook_enabled: bool,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            data_dir: None,
            login_delay_ms: 800,
            min_latency_ms: 500,
            max_latency_ms: 2500,
            webhook_url: None,
            webhook_enabled: false,
        }
    }
}

impl PlaygroundConfig {
    /// Load from the default location, then apply environment overrides.
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn default_path() -> PathBuf {
        Self::platform_dir().join("config.toml")
    }

    fn platform_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }

    /// PLAYGROUND_PORT and PLAYGROUND_DEV overrides
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PLAYGROUND_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if is_truthy(lookup("PLAYGROUND_DEV").as_deref()) {
            // Dev 모드: 포트 +1
            self.port = self.port.saturating_add(1);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_latency_ms > self.max_latency_ms {
            anyhow::bail!(
                "min_latency_ms ({}) must not exceed max_latency_ms ({})",
                self.min_latency_ms,
                self.max_latency_ms
            );
        }
        if self.webhook_enabled && self.webhook_url.is_none() {
            anyhow::bail!("webhook_enabled requires webhook_url");
        }
        Ok(())
    }

    pub fn is_dev_mode() -> bool {
        is_truthy(std::env::var("PLAYGROUND_DEV").ok().as_deref())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(Self::platform_dir)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    pub fn database_path(&self) -> PathBuf {
        let file = if Self::is_dev_mode() { "data-dev.db" } else { "data.db" };
        self.data_dir().join(file)
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir().join("local_storage.json")
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    pub fn latency_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_latency_ms),
            Duration::from_millis(self.max_latency_ms),
        )
    }

    pub fn active_webhook(&self) -> Option<&str> {
        if self.webhook_enabled {
            self.webhook_url.as_deref()
        } else {
            None
        }
    }
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true") | Some("yes"))
}
