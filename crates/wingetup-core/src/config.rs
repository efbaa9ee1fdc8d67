use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_TOOL: &str = "winget";

pub const DEFAULT_ARTIFACT_URL: &str = "https://sourceforge.net/projects/windows-package-manager.mirror/files/v1.11.430/Microsoft.DesktopAppInstaller_8wekyb3d8bbwe.msixbundle/download";

pub const DEFAULT_ARTIFACT_FILE_NAME: &str = "Microsoft.DesktopAppInstaller_8wekyb3d8bbwe.msixbundle";

/// Flags that keep `winget upgrade` from stopping at a prompt.
pub const REQUIRED_UPGRADE_FLAGS: [&str; 4] = [
    "--all",
    "--accept-source-agreements",
    "--accept-package-agreements",
    "--disable-interactivity",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapConfig {
    pub tool: String,
    pub artifact_url: String,
    pub artifact_file_name: String,
    pub artifact_dir: Option<PathBuf>,
    pub artifact_sha256: Option<String>,
    pub upgrade_args: Vec<String>,
    pub launch_timeout_ms: u64,
    pub post_install_settle_ms: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
            artifact_url: DEFAULT_ARTIFACT_URL.to_string(),
            artifact_file_name: DEFAULT_ARTIFACT_FILE_NAME.to_string(),
            artifact_dir: None,
            artifact_sha256: None,
            upgrade_args: default_upgrade_args(),
            launch_timeout_ms: 3_000,
            post_install_settle_ms: 500,
        }
    }
}

pub fn default_upgrade_args() -> Vec<String> {
    std::iter::once("upgrade")
        .chain(REQUIRED_UPGRADE_FLAGS)
        .map(str::to_string)
        .collect()
}

impl BootstrapConfig {
    pub fn from_toml_str(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tool.trim().is_empty() {
            return Err(ConfigError::Invalid("tool must not be empty".to_string()));
        }
        if !(self.artifact_url.starts_with("https://") || self.artifact_url.starts_with("http://"))
        {
            return Err(ConfigError::Invalid(format!(
                "artifact_url must be an http(s) URL: {}",
                self.artifact_url
            )));
        }
        if self.artifact_file_name.trim().is_empty()
            || self.artifact_file_name.contains(['/', '\\'])
            || self.artifact_file_name == ".."
        {
            return Err(ConfigError::Invalid(format!(
                "artifact_file_name must be a plain file name: '{}'",
                self.artifact_file_name
            )));
        }
        if let Some(sha256) = &self.artifact_sha256 {
            if sha256.len() != 64 || !sha256.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::Invalid(format!(
                    "artifact_sha256 must be 64 hex characters: '{sha256}'"
                )));
            }
        }
        if self.launch_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "launch_timeout_ms must be greater than zero".to_string(),
            ));
        }
        let missing = REQUIRED_UPGRADE_FLAGS
            .iter()
            .filter(|flag| !self.upgrade_args.iter().any(|arg| arg == *flag))
            .copied()
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "upgrade_args must keep the non-interactive flags; missing: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    pub fn artifact_path(&self) -> PathBuf {
        let dir = self
            .artifact_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        dir.join(&self.artifact_file_name)
    }

    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.launch_timeout_ms)
    }

    pub fn post_install_settle(&self) -> Duration {
        Duration::from_millis(self.post_install_settle_ms)
    }
}
