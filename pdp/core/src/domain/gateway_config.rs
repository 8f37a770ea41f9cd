// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Gateway Configuration Types
//
// Defines the configuration schema for the AEGIS policy decision point:
// - Upstream policy engine and device posture service endpoints
// - Bounded timeouts for decision calls and health probes
// - HTTP listener settings
// - Optional identity catalog file

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "AEGIS_PDP_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// External policy engine (OPA data API)
    #[serde(default = "default_policy_engine")]
    pub policy_engine: UpstreamConfig,

    /// Device posture service
    #[serde(default = "default_device_posture")]
    pub device_posture: UpstreamConfig,

    /// Timeout for `/health` probes of both upstreams
    #[serde(default = "default_health_probe_timeout", with = "humantime_serde")]
    pub health_probe_timeout: Duration,

    #[serde(default)]
    pub server: ServerConfig,

    /// YAML identity catalog. The built-in demo identities are used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL, without the API path
    pub url: String,

    /// Bound on every decision-path call to this upstream
    #[serde(default = "default_upstream_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            policy_engine: default_policy_engine(),
            device_posture: default_device_posture(),
            health_probe_timeout: default_health_probe_timeout(),
            server: ServerConfig::default(),
            identity_catalog: None,
        }
    }
}

fn default_policy_engine() -> UpstreamConfig {
    UpstreamConfig {
        url: "http://opa:8181".to_string(),
        timeout: default_upstream_timeout(),
    }
}

fn default_device_posture() -> UpstreamConfig {
    UpstreamConfig {
        url: "http://device-posture:8082".to_string(),
        timeout: default_upstream_timeout(),
    }
}

fn default_upstream_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_health_probe_timeout() -> Duration {
    Duration::from_secs(2)
}

fn first_existing(paths: Vec<PathBuf>) -> Option<PathBuf> {
    paths.into_iter().find(|path| path.exists())
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl GatewayConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Candidate config locations, in precedence order
    /// 1. AEGIS_PDP_CONFIG_PATH environment variable
    /// 2. ./aegis-pdp.yaml (working directory)
    /// 3. ~/.aegis/pdp.yaml (user home)
    /// 4. /etc/aegis/pdp.yaml (system, Unix) or C:\ProgramData\Aegis\pdp.yaml (Windows)
    pub fn search_paths() -> Vec<PathBuf> {
        Self::search_paths_from(
            std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from),
            dirs::home_dir(),
        )
    }

    fn search_paths_from(env_path: Option<PathBuf>, home: Option<PathBuf>) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(path) = env_path {
            paths.push(path);
        }

        paths.push(PathBuf::from("./aegis-pdp.yaml"));

        if let Some(home) = home {
            paths.push(home.join(".aegis").join("pdp.yaml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/aegis/pdp.yaml"));
        #[cfg(windows)]
        paths.push(PathBuf::from("C:\\ProgramData\\Aegis\\pdp.yaml"));

        paths
    }

    /// First existing config file from [`Self::search_paths`]
    pub fn discover_config() -> Option<PathBuf> {
        first_existing(Self::search_paths())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // 1. Explicit CLI path (Fail if missing/invalid)
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        // 2. Discovery (Env -> Cwd -> Home -> System)
        let mut config = if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            Self::from_yaml_file(config_path)?
        } else {
            tracing::info!("No configuration file found in standard locations. Using defaults.");
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    /// This allows container deployments to override upstream URLs via env vars
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // POLICY_URL wins over the legacy OPA_URL
        let policy_url = lookup("POLICY_URL")
            .map(|url| ("POLICY_URL", url))
            .or_else(|| lookup("OPA_URL").map(|url| ("OPA_URL", url)));
        if let Some((key, url)) = policy_url.filter(|(_, url)| !url.is_empty()) {
            tracing::info!("Environment override: {}={}", key, url);
            self.policy_engine.url = url;
        }

        if let Some(url) = lookup("DEVICE_POSTURE_URL").filter(|url| !url.is_empty()) {
            tracing::info!("Environment override: DEVICE_POSTURE_URL={}", url);
            self.device_posture.url = url;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, upstream) in [
            ("policy_engine", &self.policy_engine),
            ("device_posture", &self.device_posture),
        ] {
            let parsed = url::Url::parse(&upstream.url)
                .map_err(|e| anyhow::anyhow!("{}.url '{}' is not a valid URL: {}", name, upstream.url, e))?;

            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("{}.url must use http or https, got '{}'", name, parsed.scheme());
            }

            if upstream.timeout.is_zero() {
                anyhow::bail!("{}.timeout must be greater than zero", name);
            }
        }

        if self.health_probe_timeout.is_zero() {
            anyhow::bail!("health_probe_timeout must be greater than zero");
        }

        if self.server.bind_address.is_empty() {
            anyhow::bail!("server.bind_address cannot be empty");
        }

        if let Some(path) = &self.identity_catalog {
            if !path.exists() {
                anyhow::bail!("identity_catalog {:?} does not exist", path);
            }
        }

        Ok(())
    }
}
