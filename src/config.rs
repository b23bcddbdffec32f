//! Application configuration.
//!
//! Settings merge from three layers, later layers winning: the TOML config
//! file, `SLEEPHQ_`-prefixed environment variables, and CLI overrides.
//! `setup` writes the file in the first place.

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api;
use crate::core::models::Credentials;

/// Default config file location, relative to the working directory.
pub const CONFIG_FILE: &str = "sleephq.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// OAuth client id from the SleepHQ account's API key page.
    pub client_id: String,
    pub client_secret: String,
    pub team_id: String,
    /// Machine serial number to attach imports to, or "any".
    pub device_serial: String,
    /// Directory holding the device files to upload.
    pub data_dir: PathBuf,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub json_logs: bool,
    #[serde(default)]
    pub ntfy: NtfyConfig,
    /// Optional local archiving of the device files by date.
    #[serde(default)]
    pub archive: Option<ArchiveConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NtfyConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Where the device's SD card is mounted.
    pub mount_path: PathBuf,
    /// Root of the dated archive tree (YYYY/MM/DD is appended).
    pub archive_dir: PathBuf,
}

fn default_api_base() -> String {
    api::DEFAULT_BASE_URL.to_string()
}

impl AppConfig {
    /// Load configuration, optionally merging serialized CLI args on top.
    pub fn load<A: Serialize>(path: &Path, overrides: Option<&A>) -> Result<Self> {
        let mut figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("SLEEPHQ_").split("__"));
        if let Some(args) = overrides {
            figment = figment.merge(Serialized::defaults(args));
        }
        figment.extract().with_context(|| {
            format!(
                "failed to load configuration from {} (run `sleephq-uploader setup` to create it)",
                path.display()
            )
        })
    }

    /// Write the config file with owner-only permissions; it holds secrets.
    pub fn write(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config file {}", path.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("failed to set permissions on {}", path.display()))?;
        }
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            team_id: self.team_id.clone(),
            device_serial: self.device_serial.clone(),
        }
    }
}
