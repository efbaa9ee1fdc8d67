use super::*;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crossbeam_channel::unbounded;

struct FakePrivilege {
    elevated: bool,
    relaunch_fails: bool,
    queries: AtomicUsize,
    relaunches: Mutex<Vec<Vec<OsString>>>,
}

impl FakePrivilege {
    fn elevated() -> Self {
        Self::with(true, false)
    }

    fn with(elevated: bool, relaunch_fails: bool) -> Self {
        Self {
            elevated,
            relaunch_fails,
            queries: AtomicUsize::new(0),
            relaunches: Mutex::new(Vec::new()),
        }
    }
}

impl PrivilegeGate for FakePrivilege {
    fn is_elevated(&self) -> bool {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.elevated
    }

    fn elevate_and_restart(&self, args: &[OsString]) -> Result<(), BootstrapError> {
        self.relaunches
            .lock()
            .expect("relaunch log lock")
            .push(args.to_vec());
        if self.relaunch_fails {
            return Err(BootstrapError::ElevationFailed {
                reason: "The operation was canceled by the user.".to_string(),
            });
        }
        Ok(())
    }
}

struct FakeProbe {
    answers: Mutex<VecDeque<bool>>,
    fallback: bool,
    calls: AtomicUsize,
}

impl FakeProbe {
    fn always(found: bool) -> Self {
        Self::sequence(&[], found)
    }

    fn sequence(answers: &[bool], fallback: bool) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }
}

impl ToolProbe for FakeProbe {
    fn is_available(&self, tool: &str) -> bool {
        assert_eq!(tool, "winget");
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .expect("probe answers lock")
            .pop_front()
            .unwrap_or(self.fallback)
    }
}

enum FetchPlan {
    Succeed { total: Option<u64>, chunks: u64 },
    HttpStatus(u16),
}

struct FakeFetcher {
    plan: FetchPlan,
    calls: AtomicUsize,
}

impl FakeFetcher {
    fn new(plan: FetchPlan) -> Self {
        Self {
            plan,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Fetcher for FakeFetcher {
    fn download(
        &self,
        task: &mut DownloadTask,
        on_progress: &mut dyn FnMut(u64, Option<u64>),
    ) -> Result<(), FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.plan {
            FetchPlan::HttpStatus(code) => Err(FetchError::HttpStatus {
                url: task.source_url.clone(),
                code,
            }),
            FetchPlan::Succeed { total, chunks } => {
                let size = total.unwrap_or(chunks * 1_000);
                let chunk_len = size / chunks;
                task.set_total(total);
                on_progress(0, task.bytes_total);
                for _ in 0..chunks {
                    task.record_chunk(chunk_len);
                    on_progress(task.bytes_transferred, task.bytes_total);
                }
                Ok(())
            }
        }
    }
}

struct FakeBootstrapper {
    result: Result<String, (i32, String)>,
    artifacts: Mutex<Vec<PathBuf>>,
}

impl FakeBootstrapper {
    fn succeeding(output: &str) -> Self {
        Self {
            result: Ok(output.to_string()),
            artifacts: Mutex::new(Vec::new()),
        }
    }

    fn failing(code: i32, diagnostic: &str) -> Self {
        Self {
            result: Err((code, diagnostic.to_string())),
            artifacts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.artifacts.lock().expect("artifact log lock").len()
    }
}

impl Bootstrapper for FakeBootstrapper {
    fn install(&self, artifact: &Path) -> Result<InstallResult, InstallError> {
        self.artifacts
            .lock()
            .expect("artifact log lock")
            .push(artifact.to_path_buf());
        match &self.result {
            Ok(output) => Ok(InstallResult {
                succeeded: true,
                diagnostic_text: output.clone(),
            }),
            Err((code, diagnostic)) => Err(InstallError::NonZeroExit {
                code: *code,
                diagnostic: diagnostic.clone(),
            }),
        }
    }
}

enum RunPlan {
    Exit { output: Vec<String>, report: ExitReport },
    StreamClosesEarly { output: Vec<String> },
    LaunchFails,
}

struct FakeRunner {
    plan: RunPlan,
    invocations: Mutex<Vec<(String, Vec<String>, Duration)>>,
}

impl FakeRunner {
    fn new(plan: RunPlan) -> Self {
        Self {
            plan,
            invocations: Mutex::new(Vec::new()),
        }
    }

    fn exiting(output: &[&str], report: ExitReport) -> Self {
        Self::new(RunPlan::Exit {
            output: output.iter().map(|line| line.to_string()).collect(),
            report,
        })
    }

    fn calls(&self) -> usize {
        self.invocations.lock().expect("invocation log lock").len()
    }
}

impl UpgradeRunner for FakeRunner {
    fn run(
        &self,
        command: &str,
        args: &[String],
        launch_timeout: Duration,
    ) -> Result<UpgradeHandle, BootstrapError> {
        self.invocations.lock().expect("invocation log lock").push((
            command.to_string(),
            args.to_vec(),
            launch_timeout,
        ));
        let (tx, rx) = unbounded();
        match &self.plan {
            RunPlan::LaunchFails => {
                return Err(BootstrapError::LaunchFailed {
                    command: command.to_string(),
                    reason: "program not found".to_string(),
                })
            }
            RunPlan::Exit { output, report } => {
                for chunk in output {
                    tx.send(UpgradeEvent::Output(chunk.clone()))
                        .expect("must queue output");
                }
                tx.send(UpgradeEvent::Exited(*report))
                    .expect("must queue exit");
            }
            RunPlan::StreamClosesEarly { output } => {
                for chunk in output {
                    tx.send(UpgradeEvent::Output(chunk.clone()))
                        .expect("must queue output");
                }
            }
        }
        Ok(UpgradeHandle {
            pid: Some(4242),
            events: rx,
        })
    }
}

fn windows(release: &str) -> HostPlatform {
    HostPlatform::new("windows", Some(release))
}

fn test_config() -> BootstrapConfig {
    BootstrapConfig {
        artifact_dir: Some(PathBuf::from("/tmp/wingetup-core-tests")),
        post_install_settle_ms: 0,
        ..BootstrapConfig::default()
    }
}

struct Harness {
    config: BootstrapConfig,
    privilege: FakePrivilege,
    probe: FakeProbe,
    fetcher: FakeFetcher,
    bootstrapper: FakeBootstrapper,
    runner: FakeRunner,
    presenter: RecordingPresenter,
}

impl Harness {
    fn new(probe: FakeProbe, runner: FakeRunner) -> Self {
        Self {
            config: test_config(),
            privilege: FakePrivilege::elevated(),
            probe,
            fetcher: FakeFetcher::new(FetchPlan::Succeed {
                total: Some(15_000_000),
                chunks: 15,
            }),
            bootstrapper: FakeBootstrapper::succeeding(""),
            runner,
            presenter: RecordingPresenter::new(),
        }
    }

    fn run(&mut self, platform: HostPlatform) -> RunReport {
        let steps = Collaborators {
            privilege: &self.privilege,
            probe: &self.probe,
            fetcher: &self.fetcher,
            bootstrapper: &self.bootstrapper,
            runner: &self.runner,
        };
        Orchestrator::new(
            &self.config,
            platform,
            vec![OsString::from("--plain")],
            steps,
            &mut self.presenter,
        )
        .run()
    }

    fn fetch_calls(&self) -> usize {
        self.fetcher.calls.load(Ordering::SeqCst)
    }
}

#[test]
fn unsupported_os_fails_before_any_collaborator_runs() {
    let mut harness = Harness::new(
        FakeProbe::always(true),
        FakeRunner::exiting(&[], ExitReport::normal(0)),
    );

    let report = harness.run(HostPlatform::new("linux", Some("6.8.0")));

    assert!(matches!(
        report.outcome,
        RunOutcome::Failed(BootstrapError::UnsupportedPlatform { .. })
    ));
    assert_eq!(
        report.history,
        vec![OrchestratorState::Init, OrchestratorState::Failed]
    );
    assert_eq!(harness.privilege.queries.load(Ordering::SeqCst), 0);
    assert_eq!(harness.probe.calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.fetch_calls(), 0);
    assert_eq!(harness.bootstrapper.calls(), 0);
    assert_eq!(harness.runner.calls(), 0);
    assert_eq!(harness.presenter.fatals().len(), 1);
    assert!(harness.presenter.fatals()[0].contains("only Windows 10 and Windows 11"));
}

#[test]
fn old_windows_release_is_unsupported() {
    let mut harness = Harness::new(
        FakeProbe::always(true),
        FakeRunner::exiting(&[], ExitReport::normal(0)),
    );

    let report = harness.run(windows("8.1"));

    assert_eq!(report.outcome.exit_code(), 2);
    assert_eq!(harness.privilege.queries.load(Ordering::SeqCst), 0);
}

#[test]
fn not_elevated_relaunches_once_and_stops() {
    let mut harness = Harness::new(
        FakeProbe::always(true),
        FakeRunner::exiting(&[], ExitReport::normal(0)),
    );
    harness.privilege = FakePrivilege::with(false, false);

    let report = harness.run(windows("11"));

    assert!(matches!(report.outcome, RunOutcome::Relaunched));
    assert_eq!(report.outcome.exit_code(), 0);
    assert_eq!(
        report.history,
        vec![OrchestratorState::Init, OrchestratorState::Elevating]
    );
    let relaunches = harness.privilege.relaunches.lock().expect("relaunch log lock");
    assert_eq!(relaunches.len(), 1);
    assert_eq!(relaunches[0], vec![OsString::from("--plain")]);
    assert_eq!(harness.probe.calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.runner.calls(), 0);
    assert!(harness.presenter.fatals().is_empty());
}

#[test]
fn denied_elevation_is_fatal() {
    let mut harness = Harness::new(
        FakeProbe::always(true),
        FakeRunner::exiting(&[], ExitReport::normal(0)),
    );
    harness.privilege = FakePrivilege::with(false, true);

    let report = harness.run(windows("10"));

    assert!(matches!(
        report.outcome,
        RunOutcome::Failed(BootstrapError::ElevationFailed { .. })
    ));
    assert_eq!(report.history.last(), Some(&OrchestratorState::Failed));
    assert_eq!(harness.probe.calls.load(Ordering::SeqCst), 0);
    assert!(harness.presenter.fatals()[0].contains("canceled by the user"));
}

#[test]
fn present_tool_skips_bootstrap_entirely() {
    let mut harness = Harness::new(
        FakeProbe::always(true),
        FakeRunner::exiting(&["No installed package found.\n"], ExitReport::normal(0)),
    );

    let report = harness.run(windows("10"));

    assert!(matches!(report.outcome, RunOutcome::Succeeded));
    assert_eq!(
        report.history,
        vec![
            OrchestratorState::Init,
            OrchestratorState::Elevating,
            OrchestratorState::ProbingTool,
            OrchestratorState::Upgrading,
            OrchestratorState::Succeeded,
        ]
    );
    assert_eq!(harness.fetch_calls(), 0);
    assert_eq!(harness.bootstrapper.calls(), 0);

    let invocations = harness.runner.invocations.lock().expect("invocation log lock");
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].0, "winget");
    assert_eq!(invocations[0].1, default_upgrade_args());
    assert_eq!(invocations[0].2, Duration::from_secs(3));
}

#[test]
fn absent_tool_bootstraps_then_upgrades_to_success() {
    let mut harness = Harness::new(
        FakeProbe::sequence(&[false], true),
        FakeRunner::exiting(
            &["Found 2 upgrades\n", "Successfully installed\n"],
            ExitReport::normal(0),
        ),
    );
    harness.bootstrapper = FakeBootstrapper::succeeding("Deployment operation progress: 100%\n");

    let report = harness.run(windows("11"));

    assert!(matches!(report.outcome, RunOutcome::Succeeded));
    assert_eq!(
        report.history,
        vec![
            OrchestratorState::Init,
            OrchestratorState::Elevating,
            OrchestratorState::ProbingTool,
            OrchestratorState::Bootstrapping,
            OrchestratorState::Downloading,
            OrchestratorState::Installing,
            OrchestratorState::Upgrading,
            OrchestratorState::Succeeded,
        ]
    );
    assert_eq!(harness.fetch_calls(), 1);
    assert_eq!(
        harness
            .bootstrapper
            .artifacts
            .lock()
            .expect("artifact log lock")
            .as_slice(),
        &[PathBuf::from("/tmp/wingetup-core-tests")
            .join("Microsoft.DesktopAppInstaller_8wekyb3d8bbwe.msixbundle")]
    );
    assert_eq!(harness.runner.calls(), 1);
    assert_eq!(
        harness.presenter.last_status(),
        Some("Update completed successfully")
    );
    let lines = harness.presenter.lines();
    let saved = "Saved to /tmp/wingetup-core-tests/Microsoft.DesktopAppInstaller_8wekyb3d8bbwe.msixbundle (15000000 bytes)";
    assert!(lines.contains(&saved));
    assert!(lines.contains(&"Deployment operation progress: 100%"));
    assert!(lines.contains(&"--- Update completed without errors ---"));
}

#[test]
fn download_progress_is_monotonic_and_reaches_full() {
    let mut harness = Harness::new(
        FakeProbe::sequence(&[false], true),
        FakeRunner::exiting(&[], ExitReport::normal(0)),
    );

    harness.run(windows("10"));

    let percents = harness
        .presenter
        .progress_updates()
        .into_iter()
        .filter_map(|progress| match progress {
            Progress::Percent(value) => Some(value),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert!(!percents.is_empty(), "download must report percentages");
    assert!(percents.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(percents.last(), Some(&100));
}

#[test]
fn unknown_download_size_stays_indeterminate() {
    let mut harness = Harness::new(
        FakeProbe::sequence(&[false], true),
        FakeRunner::exiting(&[], ExitReport::normal(0)),
    );
    harness.fetcher = FakeFetcher::new(FetchPlan::Succeed {
        total: None,
        chunks: 4,
    });

    let report = harness.run(windows("10"));

    assert!(matches!(report.outcome, RunOutcome::Succeeded));
    assert!(harness
        .presenter
        .progress_updates()
        .iter()
        .all(|progress| !matches!(progress, Progress::Percent(_))));
}

#[test]
fn http_404_fails_without_running_upgrade() {
    let mut harness = Harness::new(
        FakeProbe::always(false),
        FakeRunner::exiting(&[], ExitReport::normal(0)),
    );
    harness.fetcher = FakeFetcher::new(FetchPlan::HttpStatus(404));

    let report = harness.run(windows("10"));

    match &report.outcome {
        RunOutcome::Failed(BootstrapError::Fetch(FetchError::HttpStatus { code, .. })) => {
            assert_eq!(*code, 404)
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(report.outcome.exit_code(), 4);
    assert_eq!(report.history.last(), Some(&OrchestratorState::Failed));
    assert!(!report.history.contains(&OrchestratorState::Installing));
    assert_eq!(harness.bootstrapper.calls(), 0);
    assert_eq!(harness.runner.calls(), 0);
    assert!(harness.presenter.fatals()[0].starts_with("winget installation failed."));
    assert!(harness.presenter.fatals()[0].contains("HTTP 404"));
}

#[test]
fn failed_install_reports_diagnostic_and_skips_upgrade() {
    let mut harness = Harness::new(
        FakeProbe::always(false),
        FakeRunner::exiting(&[], ExitReport::normal(0)),
    );
    harness.bootstrapper =
        FakeBootstrapper::failing(1, "Deployment failed with HRESULT: 0x80073CF3");

    let report = harness.run(windows("10"));

    assert!(matches!(
        report.outcome,
        RunOutcome::Failed(BootstrapError::Install(InstallError::NonZeroExit { code: 1, .. }))
    ));
    assert_eq!(harness.runner.calls(), 0);
    assert!(harness.presenter.fatals()[0].contains("0x80073CF3"));
    assert!(harness
        .presenter
        .lines()
        .iter()
        .any(|line| line.starts_with("Fatal error: ")));
}

#[test]
fn install_that_leaves_tool_missing_is_reported() {
    let mut harness = Harness::new(
        FakeProbe::always(false),
        FakeRunner::exiting(&[], ExitReport::normal(0)),
    );

    let report = harness.run(windows("11"));

    assert!(matches!(
        report.outcome,
        RunOutcome::Failed(BootstrapError::InstalledButNotDetected { .. })
    ));
    assert_eq!(harness.probe.calls.load(Ordering::SeqCst), 3);
    assert_eq!(harness.runner.calls(), 0);
}

#[test]
fn reprobe_retries_once_after_settle() {
    let mut harness = Harness::new(
        FakeProbe::sequence(&[false, false, true], false),
        FakeRunner::exiting(&[], ExitReport::normal(0)),
    );

    let report = harness.run(windows("11"));

    assert!(matches!(report.outcome, RunOutcome::Succeeded));
    assert_eq!(harness.probe.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn upgrade_exit_code_one_fails_with_warning_and_full_log() {
    let output = [
        "Name   Id   Version  Available\n",
        "Foo    Foo  1.0      2.0\n",
        "Installer failed with exit code: 1603\n",
    ];
    let mut harness = Harness::new(
        FakeProbe::always(true),
        FakeRunner::exiting(&output, ExitReport::normal(1)),
    );

    let report = harness.run(windows("10"));

    assert!(matches!(
        report.outcome,
        RunOutcome::Failed(BootstrapError::UpgradeFailed {
            exit_code: 1,
            abnormal: false
        })
    ));
    assert_eq!(report.history.last(), Some(&OrchestratorState::Failed));
    let lines = harness.presenter.lines();
    for line in output {
        assert!(lines.contains(&line.trim_end()), "missing line: {line}");
    }
    assert!(lines.contains(&"--- Finished with error (code=1) ---"));
    assert_eq!(harness.presenter.last_status(), Some("Update error (code=1)"));
    assert_eq!(harness.presenter.warnings().len(), 1);
    assert!(harness.presenter.warnings()[0].contains("code=1"));
    assert!(harness.presenter.fatals().is_empty());
}

#[test]
fn abnormal_termination_with_zero_code_is_failure() {
    let mut harness = Harness::new(
        FakeProbe::always(true),
        FakeRunner::exiting(&[], ExitReport::abnormal(0)),
    );

    let report = harness.run(windows("10"));

    assert!(matches!(
        report.outcome,
        RunOutcome::Failed(BootstrapError::UpgradeFailed {
            exit_code: 0,
            abnormal: true
        })
    ));
}

#[test]
fn closed_event_stream_counts_as_abnormal_exit() {
    let mut harness = Harness::new(
        FakeProbe::always(true),
        FakeRunner::new(RunPlan::StreamClosesEarly {
            output: vec!["partial\n".to_string()],
        }),
    );

    let report = harness.run(windows("10"));

    assert_eq!(report.outcome.exit_code(), 8);
    let session = report.session.expect("session must be recorded");
    assert_eq!(session.exit, Some(ExitReport::abnormal(-1)));
    assert_eq!(session.transcript(), "partial\n");
}

#[test]
fn launch_failure_is_fatal() {
    let mut harness = Harness::new(FakeProbe::always(true), FakeRunner::new(RunPlan::LaunchFails));

    let report = harness.run(windows("10"));

    assert!(matches!(
        report.outcome,
        RunOutcome::Failed(BootstrapError::LaunchFailed { .. })
    ));
    assert_eq!(report.outcome.exit_code(), 7);
    assert!(report.session.is_none());
    assert!(harness
        .presenter
        .lines()
        .contains(&"Error: Failed to start winget."));
    assert_eq!(harness.presenter.fatals().len(), 1);
    assert!(harness
        .presenter
        .events
        .contains(&PresenterEvent::Status("Launch error".to_string())));
}

#[test]
fn session_transcript_preserves_emitted_text() {
    let output = ["first\r\n", "second\n", "no newline at end"];
    let mut harness = Harness::new(
        FakeProbe::always(true),
        FakeRunner::exiting(&output, ExitReport::normal(0)),
    );

    let report = harness.run(windows("10"));

    let session = report.session.expect("session must be recorded");
    assert_eq!(session.pid, Some(4242));
    assert_eq!(session.output, output);
    assert_eq!(session.transcript(), "first\r\nsecond\nno newline at end");
}

#[test]
fn default_config_is_valid() {
    let config = BootstrapConfig::default();
    config.validate().expect("defaults must validate");
    assert_eq!(config.tool, "winget");
    assert_eq!(config.launch_timeout(), Duration::from_secs(3));
    assert_eq!(
        config.upgrade_args,
        vec![
            "upgrade",
            "--all",
            "--accept-source-agreements",
            "--accept-package-agreements",
            "--disable-interactivity",
        ]
    );
}

#[test]
fn toml_config_overrides_selected_fields() {
    let raw = "artifact_url = \"https://mirror.example.test/AppInstaller.msixbundle\"\nartifact_dir = \"/var/tmp/wingetup\"\nlaunch_timeout_ms = 5000\n";
    let config = BootstrapConfig::from_toml_str(raw, Path::new("wingetup.toml"))
        .expect("config must parse");

    assert_eq!(
        config.artifact_url,
        "https://mirror.example.test/AppInstaller.msixbundle"
    );
    assert_eq!(
        config.artifact_path(),
        PathBuf::from("/var/tmp/wingetup").join(DEFAULT_ARTIFACT_FILE_NAME)
    );
    assert_eq!(config.launch_timeout(), Duration::from_secs(5));
    assert_eq!(config.upgrade_args, default_upgrade_args());
}

#[test]
fn toml_config_rejects_unknown_keys() {
    let err = BootstrapConfig::from_toml_str("retries = 3\n", Path::new("wingetup.toml"))
        .expect_err("unknown key must be rejected");
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn config_rejects_upgrade_args_without_noninteractive_flags() {
    let raw = "upgrade_args = [\"upgrade\", \"--all\", \"--accept-source-agreements\"]\n";
    let err = BootstrapConfig::from_toml_str(raw, Path::new("wingetup.toml"))
        .expect_err("missing flags must be rejected");
    let message = err.to_string();
    assert!(message.contains("--accept-package-agreements"), "{message}");
    assert!(message.contains("--disable-interactivity"), "{message}");
}

#[test]
fn config_rejects_bad_checksum_and_file_name() {
    let config = BootstrapConfig {
        artifact_sha256: Some("abc".to_string()),
        ..BootstrapConfig::default()
    };
    assert!(config.validate().is_err());

    let config = BootstrapConfig {
        artifact_file_name: "..\\evil.msixbundle".to_string(),
        ..BootstrapConfig::default()
    };
    assert!(config.validate().is_err());

    let config = BootstrapConfig {
        artifact_url: "ftp://example.test/a".to_string(),
        ..BootstrapConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn download_task_keeps_transferred_within_total() {
    let mut task = DownloadTask::new("https://example.test/a", PathBuf::from("a"));
    task.set_total(Some(10));
    task.record_chunk(6);
    assert_eq!(percent_of(task.bytes_transferred, task.bytes_total), Some(60));
    task.record_chunk(6);
    assert_eq!(task.bytes_transferred, 12);
    assert_eq!(task.bytes_total, None);
    assert_eq!(percent_of(task.bytes_transferred, task.bytes_total), None);
}

#[test]
fn percent_of_handles_zero_and_unknown_totals() {
    assert_eq!(percent_of(5, None), None);
    assert_eq!(percent_of(5, Some(0)), None);
    assert_eq!(percent_of(7_500_000, Some(15_000_000)), Some(50));
    assert_eq!(Progress::from_bytes(1, None), Progress::Indeterminate);
}

#[test]
fn state_order_forbids_revisits() {
    assert!(OrchestratorState::ProbingTool.can_advance_to(OrchestratorState::Upgrading));
    assert!(OrchestratorState::Downloading.can_advance_to(OrchestratorState::Failed));
    assert!(!OrchestratorState::Installing.can_advance_to(OrchestratorState::ProbingTool));
    assert!(!OrchestratorState::Succeeded.can_advance_to(OrchestratorState::Failed));
}

#[test]
fn host_platform_support_matrix() {
    assert!(windows("10").is_supported());
    assert!(windows("11").is_supported());
    assert!(!windows("7").is_supported());
    assert!(!HostPlatform::new("windows", None).is_supported());
    assert!(!HostPlatform::new("macos", Some("14.5")).is_supported());
    assert_eq!(
        HostPlatform::new("windows", None).describe(),
        "windows (unknown release)"
    );
}
