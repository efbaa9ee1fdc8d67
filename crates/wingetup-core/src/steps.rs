use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use crossbeam_channel::Receiver;

use crate::error::{BootstrapError, FetchError, InstallError};
use crate::model::{DownloadTask, ExitReport, InstallResult};

pub trait PrivilegeGate {
    /// Fails closed: an unanswerable query reports `false`.
    fn is_elevated(&self) -> bool;

    /// Asks the OS to start an elevated copy of this program with `args`.
    /// `Ok(())` means the copy was requested and the caller must exit now.
    fn elevate_and_restart(&self, args: &[OsString]) -> Result<(), BootstrapError>;
}

pub trait ToolProbe {
    fn is_available(&self, tool: &str) -> bool;
}

pub trait Fetcher: Sync {
    fn download(
        &self,
        task: &mut DownloadTask,
        on_progress: &mut dyn FnMut(u64, Option<u64>),
    ) -> Result<(), FetchError>;
}

pub trait Bootstrapper: Sync {
    fn install(&self, artifact: &Path) -> Result<InstallResult, InstallError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeEvent {
    Output(String),
    Exited(ExitReport),
}

/// A launched upgrade process. `events` yields output in emission order and
/// then exactly one `Exited`.
#[derive(Debug)]
pub struct UpgradeHandle {
    pub pid: Option<u32>,
    pub events: Receiver<UpgradeEvent>,
}

pub trait UpgradeRunner {
    fn run(
        &self,
        command: &str,
        args: &[String],
        launch_timeout: Duration,
    ) -> Result<UpgradeHandle, BootstrapError>;
}

#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub privilege: &'a dyn PrivilegeGate,
    pub probe: &'a dyn ToolProbe,
    pub fetcher: &'a dyn Fetcher,
    pub bootstrapper: &'a dyn Bootstrapper,
    pub runner: &'a dyn UpgradeRunner,
}
