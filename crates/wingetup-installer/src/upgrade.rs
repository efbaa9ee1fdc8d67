use std::io::{self, BufRead, BufReader, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, select, unbounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, info, warn};
use wingetup_core::{BootstrapError, ExitReport, UpgradeEvent, UpgradeHandle, UpgradeRunner};

/// How long output still buffered in the pipe is forwarded after the child
/// has exited. Descendants that inherited the pipe may keep it open forever.
const OUTPUT_DRAIN_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessUpgradeRunner;

impl UpgradeRunner for ProcessUpgradeRunner {
    fn run(
        &self,
        command: &str,
        args: &[String],
        launch_timeout: Duration,
    ) -> Result<UpgradeHandle, BootstrapError> {
        let mut process = Command::new(command);
        process.args(args);
        spawn_streaming(process, command, launch_timeout)
    }
}

/// Starts `command` with stdout and stderr sharing one pipe and forwards its
/// lines in emission order, followed by one `Exited` event once the process
/// itself has exited.
pub fn spawn_streaming(
    mut command: Command,
    label: &str,
    launch_timeout: Duration,
) -> Result<UpgradeHandle, BootstrapError> {
    command.stdin(Stdio::null());
    debug!(command = ?command, "launching process");

    let (launched_tx, launched_rx) = bounded(1);
    let (events_tx, events_rx) = unbounded();
    let owned_label = label.to_string();
    thread::spawn(move || supervise(command, owned_label, launched_tx, events_tx));

    let launch_failed = |reason: String| BootstrapError::LaunchFailed {
        command: label.to_string(),
        reason,
    };
    match launched_rx.recv_timeout(launch_timeout) {
        Ok(Ok(pid)) => {
            info!(command = label, pid, "process started");
            Ok(UpgradeHandle {
                pid: Some(pid),
                events: events_rx,
            })
        }
        Ok(Err(err)) => Err(launch_failed(err.to_string())),
        Err(RecvTimeoutError::Timeout) => Err(launch_failed(format!(
            "process did not start within {} ms",
            launch_timeout.as_millis()
        ))),
        Err(RecvTimeoutError::Disconnected) => {
            Err(launch_failed("launcher thread exited unexpectedly".to_string()))
        }
    }
}

fn attach_merged_output(command: &mut Command) -> io::Result<io::PipeReader> {
    let (reader, writer) = io::pipe()?;
    command.stdout(writer.try_clone()?).stderr(writer);
    Ok(reader)
}

fn supervise(
    mut command: Command,
    label: String,
    launched: Sender<io::Result<u32>>,
    events: Sender<UpgradeEvent>,
) {
    let output = match attach_merged_output(&mut command) {
        Ok(reader) => reader,
        Err(err) => {
            let _ = launched.send(Err(err));
            return;
        }
    };
    let spawned = command.spawn();
    // Drops the parent's copies of the write end so EOF depends only on the child.
    drop(command);
    let mut child = match spawned {
        Ok(child) => child,
        Err(err) => {
            let _ = launched.send(Err(err));
            return;
        }
    };
    if launched.send(Ok(child.id())).is_err() {
        warn!(command = %label, "launch was abandoned; stopping late process");
        let _ = child.kill();
        let _ = child.wait();
        return;
    }

    let (chunks_tx, chunks_rx) = unbounded();
    thread::spawn(move || forward_lines(output, chunks_tx));
    let (exit_tx, exit_rx) = bounded(1);
    thread::spawn(move || {
        let _ = exit_tx.send(child.wait());
    });

    let waited = loop {
        select! {
            recv(chunks_rx) -> chunk => match chunk {
                Ok(chunk) => {
                    let _ = events.send(UpgradeEvent::Output(chunk));
                }
                Err(_) => break exit_rx.recv(),
            },
            recv(exit_rx) -> waited => break waited,
        }
    };
    drain_remaining(&chunks_rx, &events, OUTPUT_DRAIN_TIMEOUT);

    let report = match waited {
        Ok(Ok(status)) => exit_report(status),
        Ok(Err(err)) => {
            warn!(command = %label, error = %err, "failed to collect exit status");
            ExitReport::abnormal(-1)
        }
        Err(_) => {
            warn!(command = %label, "exit waiter stopped without a status");
            ExitReport::abnormal(-1)
        }
    };
    debug!(command = %label, ?report, "process exited");
    let _ = events.send(UpgradeEvent::Exited(report));
}

fn drain_remaining(chunks: &Receiver<String>, events: &Sender<UpgradeEvent>, timeout: Duration) {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match chunks.recv_timeout(remaining) {
            Ok(chunk) => {
                let _ = events.send(UpgradeEvent::Output(chunk));
            }
            Err(RecvTimeoutError::Disconnected) => return,
            Err(RecvTimeoutError::Timeout) => {
                debug!("output pipe still open after exit; descendants may hold it");
                return;
            }
        }
    }
}

fn forward_lines<R: Read>(stream: R, chunks: Sender<String>) {
    let mut reader = BufReader::new(stream);
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) => break,
            Ok(_) => {
                let chunk = String::from_utf8_lossy(&buffer).into_owned();
                if chunks.send(chunk).is_err() {
                    break;
                }
            }
            Err(err) => {
                warn!(error = %err, "stopped reading process output");
                break;
            }
        }
    }
}

/// A missing exit code means the process was terminated by a signal.
pub(crate) fn exit_report(status: ExitStatus) -> ExitReport {
    match status.code() {
        Some(code) => ExitReport::normal(code),
        None => ExitReport::abnormal(-1),
    }
}
