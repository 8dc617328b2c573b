use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use diary_core::crypto::KdfParams;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "diary-server.toml";
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub const ENV_SECRET: &str = "DIARY_SECRET";
pub const ENV_BIND: &str = "DIARY_BIND";
pub const ENV_DATA_DIR: &str = "DIARY_DATA_DIR";

/// On-disk server configuration (`diary-server.toml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub auth: AuthSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kdf: Option<KdfParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            data_dir: default_data_dir(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_data_dir() -> String {
    DEFAULT_DATA_DIR.to_string()
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Everything the running server needs, after env overrides and validation.
#[derive(Debug)]
pub struct Settings {
    pub bind: SocketAddr,
    pub data_dir: PathBuf,
    pub max_body_bytes: usize,
    pub secret: SecretString,
    pub kdf: KdfParams,
}

impl ServerConfig {
    /// Apply env overrides and check the result is servable.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a closure.
    pub fn resolve<F>(mut self, lookup: F) -> anyhow::Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = non_empty(lookup(ENV_SECRET)) {
            self.auth.secret = Some(secret);
        }
        if let Some(bind) = non_empty(lookup(ENV_BIND)) {
            self.server.bind = bind;
        }
        if let Some(data_dir) = non_empty(lookup(ENV_DATA_DIR)) {
            self.server.data_dir = data_dir;
        }

        let secret = non_empty(self.auth.secret).ok_or_else(|| {
            anyhow::anyhow!(
                "No shared secret configured. Run `diary-server set-password` or set {}.",
                ENV_SECRET
            )
        })?;
        let bind: SocketAddr = self
            .server
            .bind
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", self.server.bind, e))?;
        if self.server.max_body_bytes == 0 {
            anyhow::bail!("max_body_bytes must be greater than zero");
        }
        let kdf = self.kdf.unwrap_or(KdfParams::LegacySha256);
        kdf.validate()
            .map_err(|e| anyhow::anyhow!("Invalid [kdf] section: {}", e))?;

        Ok(Settings {
            bind,
            data_dir: PathBuf::from(self.server.data_dir),
            max_body_bytes: self.server.max_body_bytes,
            secret: SecretString::from(secret),
            kdf,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Read the config file, falling back to defaults when it does not exist.
pub fn read_config_or_default(path: &Path) -> anyhow::Result<ServerConfig> {
    if path.exists() {
        read_config(path)
    } else {
        Ok(ServerConfig::default())
    }
}

pub fn read_config(path: &Path) -> anyhow::Result<ServerConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &ServerConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                )
            })?;
        }
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}
