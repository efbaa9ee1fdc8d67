mod config;
mod error;
mod model;
mod orchestrator;
mod presenter;
mod steps;

pub use config::{
    default_upgrade_args, BootstrapConfig, ConfigError, DEFAULT_ARTIFACT_FILE_NAME,
    DEFAULT_ARTIFACT_URL, DEFAULT_TOOL, REQUIRED_UPGRADE_FLAGS,
};
pub use error::{BootstrapError, FetchError, InstallError};
pub use model::{
    percent_of, DownloadTask, ElevationStatus, ExitReport, HostPlatform, InstallResult,
    OrchestratorState, Progress, Termination, ToolAvailability, UpgradeSession,
};
pub use orchestrator::{Orchestrator, RunOutcome, RunReport};
pub use presenter::{Presenter, PresenterEvent, RecordingPresenter};
pub use steps::{
    Bootstrapper, Collaborators, Fetcher, PrivilegeGate, ToolProbe, UpgradeEvent, UpgradeHandle,
    UpgradeRunner,
};

#[cfg(test)]
mod tests;
