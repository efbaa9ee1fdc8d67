use std::ffi::OsString;
use std::thread;

use crossbeam_channel::{unbounded, Sender};
use tracing::{debug, info, warn};

use crate::config::BootstrapConfig;
use crate::error::{BootstrapError, FetchError, InstallError};
use crate::model::{
    DownloadTask, ElevationStatus, ExitReport, HostPlatform, InstallResult, OrchestratorState,
    Progress, Termination, ToolAvailability, UpgradeSession,
};
use crate::presenter::Presenter;
use crate::steps::{Bootstrapper, Collaborators, Fetcher, UpgradeEvent};

#[derive(Debug)]
pub enum RunOutcome {
    Succeeded,
    /// An elevated copy was requested; this instance stops without a terminal state.
    Relaunched,
    Failed(BootstrapError),
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Succeeded | Self::Relaunched => 0,
            Self::Failed(err) => err.exit_code(),
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub history: Vec<OrchestratorState>,
    pub session: Option<UpgradeSession>,
}

enum DownloadEvent {
    Progress { transferred: u64, total: Option<u64> },
    Finished(Result<DownloadTask, FetchError>),
}

pub struct Orchestrator<'a> {
    config: &'a BootstrapConfig,
    platform: HostPlatform,
    relaunch_args: Vec<OsString>,
    steps: Collaborators<'a>,
    presenter: &'a mut dyn Presenter,
    state: OrchestratorState,
    history: Vec<OrchestratorState>,
    session: Option<UpgradeSession>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a BootstrapConfig,
        platform: HostPlatform,
        relaunch_args: Vec<OsString>,
        steps: Collaborators<'a>,
        presenter: &'a mut dyn Presenter,
    ) -> Self {
        Self {
            config,
            platform,
            relaunch_args,
            steps,
            presenter,
            state: OrchestratorState::Init,
            history: vec![OrchestratorState::Init],
            session: None,
        }
    }

    pub fn run(mut self) -> RunReport {
        let outcome = match self.drive() {
            Ok(outcome) => outcome,
            Err(err) => self.fail(err),
        };
        RunReport {
            outcome,
            history: self.history,
            session: self.session,
        }
    }

    fn drive(&mut self) -> Result<RunOutcome, BootstrapError> {
        self.presenter.set_status("Initializing...");
        if !self.platform.is_supported() {
            return Err(BootstrapError::UnsupportedPlatform {
                platform: self.platform.describe(),
            });
        }

        self.transition(OrchestratorState::Elevating);
        let elevation = ElevationStatus::from_elevated(self.steps.privilege.is_elevated());
        debug!(?elevation, "queried elevation status");
        if elevation == ElevationStatus::NotElevated {
            self.presenter.append_line("Requesting administrator privileges...");
            self.steps
                .privilege
                .elevate_and_restart(&self.relaunch_args)?;
            info!("elevated instance requested; handing off");
            return Ok(RunOutcome::Relaunched);
        }

        self.transition(OrchestratorState::ProbingTool);
        let tool = self.config.tool.clone();
        self.presenter.append_line(&format!("Checking for {tool}..."));
        let availability = ToolAvailability::from_found(self.steps.probe.is_available(&tool));
        info!(tool = %tool, availability = availability.as_str(), "probed package manager");

        match availability {
            ToolAvailability::Present => {
                self.presenter.append_line(&format!(
                    "{tool} already installed, proceeding to update."
                ));
            }
            ToolAvailability::Absent => {
                self.presenter.append_line(&format!(
                    "{tool} NOT found - starting download and installation."
                ));
                self.bootstrap()?;
                self.presenter.append_line(&format!(
                    "{tool} successfully installed, proceeding to update."
                ));
            }
        }

        self.upgrade()
    }

    fn bootstrap(&mut self) -> Result<(), BootstrapError> {
        self.transition(OrchestratorState::Bootstrapping);
        self.presenter.set_status(&format!("Installing {}...", self.config.tool));
        self.presenter.set_progress(Progress::Indeterminate);

        let task = DownloadTask::new(&self.config.artifact_url, self.config.artifact_path());
        self.presenter.append_line(&format!(
            "Downloading package manager installer... ({})",
            task.source_url
        ));

        self.transition(OrchestratorState::Downloading);
        let task = match self.download_on_worker(task) {
            Ok(task) => task,
            Err(err) => {
                self.presenter.set_progress(Progress::Hidden);
                return Err(err.into());
            }
        };
        self.presenter.append_line(&format!(
            "Saved to {} ({} bytes)",
            task.destination_path.display(),
            task.bytes_transferred
        ));

        self.transition(OrchestratorState::Installing);
        self.presenter.set_progress(Progress::Indeterminate);
        self.presenter.append_line(&format!(
            "Installing App Installer package ({})...",
            self.config.tool
        ));
        let installed = self.install_on_worker(task);
        self.presenter.set_progress(Progress::Hidden);
        let result = installed?;
        for line in result
            .diagnostic_text
            .lines()
            .filter(|line| !line.trim().is_empty())
        {
            self.presenter.append_line(line);
        }
        self.presenter.append_line("Installation completed successfully.");

        self.reprobe_after_install()
    }

    fn download_on_worker(&mut self, task: DownloadTask) -> Result<DownloadTask, FetchError> {
        let fetcher = self.steps.fetcher;
        let (tx, rx) = unbounded();
        let mut last_transferred = 0_u64;
        let mut last_progress = Progress::Indeterminate;
        let mut finished = None;

        thread::scope(|scope| {
            scope.spawn(move || download_worker(fetcher, task, tx));
            for event in rx.iter() {
                match event {
                    DownloadEvent::Progress { transferred, total } => {
                        if transferred < last_transferred {
                            warn!(transferred, last_transferred, "ignoring regressed progress");
                            continue;
                        }
                        last_transferred = transferred;
                        let progress = Progress::from_bytes(transferred, total);
                        if progress != last_progress {
                            self.presenter.set_progress(progress);
                            last_progress = progress;
                        }
                    }
                    DownloadEvent::Finished(result) => finished = Some(result),
                }
            }
        });

        finished.unwrap_or_else(|| {
            Err(FetchError::NetworkUnreachable {
                url: self.config.artifact_url.clone(),
                reason: "download worker stopped without a result".to_string(),
            })
        })
    }

    fn install_on_worker(&mut self, task: DownloadTask) -> Result<InstallResult, InstallError> {
        let bootstrapper = self.steps.bootstrapper;
        let (tx, rx) = unbounded();
        thread::scope(|scope| {
            scope.spawn(move || install_worker(bootstrapper, task, tx));
            rx.recv().unwrap_or_else(|_| {
                Ok(InstallResult {
                    succeeded: false,
                    diagnostic_text: "install worker stopped without a result".to_string(),
                })
            })
        })
        .and_then(|result| {
            if result.succeeded {
                Ok(result)
            } else {
                Err(InstallError::NonZeroExit {
                    code: -1,
                    diagnostic: result.diagnostic_text,
                })
            }
        })
    }

    fn reprobe_after_install(&mut self) -> Result<(), BootstrapError> {
        let tool = self.config.tool.clone();
        if self.steps.probe.is_available(&tool) {
            return Ok(());
        }

        let settle = self.config.post_install_settle();
        warn!(tool = %tool, ?settle, "tool not resolvable right after install; retrying once");
        thread::sleep(settle);
        if self.steps.probe.is_available(&tool) {
            return Ok(());
        }
        Err(BootstrapError::InstalledButNotDetected { tool })
    }

    fn upgrade(&mut self) -> Result<RunOutcome, BootstrapError> {
        self.transition(OrchestratorState::Upgrading);
        self.presenter.append_line("");
        self.presenter.append_line("--- Starting update of all packages ---");
        self.presenter.set_status("Updating...");
        self.presenter.set_progress(Progress::Indeterminate);

        let handle = match self.steps.runner.run(
            &self.config.tool,
            &self.config.upgrade_args,
            self.config.launch_timeout(),
        ) {
            Ok(handle) => handle,
            Err(err) => {
                self.presenter
                    .append_line(&format!("Error: Failed to start {}.", self.config.tool));
                self.presenter.set_progress(Progress::Hidden);
                self.presenter.set_status("Launch error");
                return Err(err);
            }
        };

        let mut session = UpgradeSession::new(handle.pid);
        for event in handle.events.iter() {
            match event {
                UpgradeEvent::Output(chunk) => {
                    self.presenter.append_line(chunk.trim_end_matches(['\r', '\n']));
                    session.push_output(chunk);
                }
                UpgradeEvent::Exited(report) => {
                    session.finish(report);
                    break;
                }
            }
        }
        let report = session.exit.unwrap_or_else(|| {
            warn!("upgrade event stream closed without an exit report");
            ExitReport::abnormal(-1)
        });
        session.exit = Some(report);
        self.session = Some(session);
        self.presenter.set_progress(Progress::Hidden);

        if report.succeeded() {
            self.transition(OrchestratorState::Succeeded);
            self.presenter.set_status("Update completed successfully");
            self.presenter.append_line("");
            self.presenter.append_line("--- Update completed without errors ---");
            info!("upgrade completed");
            return Ok(RunOutcome::Succeeded);
        }

        let code = report.exit_code;
        self.presenter.set_status(&format!("Update error (code={code})"));
        self.presenter.append_line("");
        self.presenter.append_line(&format!("--- Finished with error (code={code}) ---"));
        self.presenter.show_warning(&format!(
            "The update finished with an error (code={code}).\nSee the log above for details."
        ));
        self.transition(OrchestratorState::Failed);
        Ok(RunOutcome::Failed(BootstrapError::UpgradeFailed {
            exit_code: code,
            abnormal: report.termination == Termination::Abnormal,
        }))
    }

    fn fail(&mut self, err: BootstrapError) -> RunOutcome {
        warn!(kind = err.kind(), error = %err, "run failed");
        let message = match &err {
            BootstrapError::Fetch(_) | BootstrapError::Install(_) => {
                format!("{} installation failed.\n{err}", self.config.tool)
            }
            _ => err.to_string(),
        };
        self.presenter.append_line(&format!("Fatal error: {message}"));
        self.presenter.show_fatal(&message);
        self.transition(OrchestratorState::Failed);
        RunOutcome::Failed(err)
    }

    fn transition(&mut self, next: OrchestratorState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {} -> {}",
            self.state.as_str(),
            next.as_str()
        );
        info!(from = self.state.as_str(), to = next.as_str(), "state transition");
        self.state = next;
        self.history.push(next);
    }
}

fn download_worker(fetcher: &dyn Fetcher, mut task: DownloadTask, events: Sender<DownloadEvent>) {
    let result = fetcher.download(&mut task, &mut |transferred, total| {
        let _ = events.send(DownloadEvent::Progress { transferred, total });
    });
    let _ = events.send(DownloadEvent::Finished(result.map(|()| task)));
}

fn install_worker(
    bootstrapper: &dyn Bootstrapper,
    task: DownloadTask,
    events: Sender<Result<InstallResult, InstallError>>,
) {
    debug!(artifact = %task.destination_path.display(), "installing artifact");
    let _ = events.send(bootstrapper.install(&task.destination_path));
}
