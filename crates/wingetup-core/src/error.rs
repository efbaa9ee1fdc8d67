use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network unreachable while fetching {url}: {reason}")]
    NetworkUnreachable { url: String, reason: String },
    #[error("server answered HTTP {code} for {url}")]
    HttpStatus { url: String, code: u16 },
    #[error("failed to write download to {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("checksum mismatch for {}: expected sha256 {expected}, got {actual}", path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("installer exited with code {code}: {diagnostic}")]
    NonZeroExit { code: i32, diagnostic: String },
    #[error("failed to start installer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl InstallError {
    pub fn diagnostic(&self) -> String {
        match self {
            Self::NonZeroExit { diagnostic, .. } => diagnostic.clone(),
            Self::Spawn { source, .. } => source.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("unsupported platform: {platform}; only Windows 10 and Windows 11 are supported")]
    UnsupportedPlatform { platform: String },
    #[error("elevation request failed: {reason}")]
    ElevationFailed { reason: String },
    #[error("failed to download the package manager: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to install the package manager: {0}")]
    Install(#[from] InstallError),
    #[error("installer reported success but '{tool}' is still not on the search path")]
    InstalledButNotDetected { tool: String },
    #[error("failed to start '{command}': {reason}")]
    LaunchFailed { command: String, reason: String },
    #[error("upgrade finished with an error (code={exit_code})")]
    UpgradeFailed { exit_code: i32, abnormal: bool },
}

impl BootstrapError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedPlatform { .. } => "unsupported-platform",
            Self::ElevationFailed { .. } => "elevation-failed",
            Self::Fetch(_) => "fetch-error",
            Self::Install(_) => "install-error",
            Self::InstalledButNotDetected { .. } => "installed-but-not-detected",
            Self::LaunchFailed { .. } => "launch-failed",
            Self::UpgradeFailed { .. } => "upgrade-exit-non-zero",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnsupportedPlatform { .. } => 2,
            Self::ElevationFailed { .. } => 3,
            Self::Fetch(_) => 4,
            Self::Install(_) => 5,
            Self::InstalledButNotDetected { .. } => 6,
            Self::LaunchFailed { .. } => 7,
            Self::UpgradeFailed { .. } => 8,
        }
    }
}
