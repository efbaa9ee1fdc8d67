use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationStatus {
    Elevated,
    NotElevated,
}

impl ElevationStatus {
    pub fn from_elevated(elevated: bool) -> Self {
        if elevated {
            Self::Elevated
        } else {
            Self::NotElevated
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolAvailability {
    Present,
    Absent,
}

impl ToolAvailability {
    pub fn from_found(found: bool) -> Self {
        if found {
            Self::Present
        } else {
            Self::Absent
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlatform {
    pub os: String,
    pub release: Option<String>,
}

impl HostPlatform {
    pub fn new(os: &str, release: Option<&str>) -> Self {
        Self {
            os: os.to_string(),
            release: release.map(str::to_string),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.os == "windows" && matches!(self.release.as_deref(), Some("10") | Some("11"))
    }

    pub fn describe(&self) -> String {
        match &self.release {
            Some(release) => format!("{} {}", self.os, release),
            None => format!("{} (unknown release)", self.os),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub source_url: String,
    pub destination_path: PathBuf,
    pub bytes_total: Option<u64>,
    pub bytes_transferred: u64,
}

impl DownloadTask {
    pub fn new(source_url: &str, destination_path: PathBuf) -> Self {
        Self {
            source_url: source_url.to_string(),
            destination_path,
            bytes_total: None,
            bytes_transferred: 0,
        }
    }

    pub fn set_total(&mut self, total: Option<u64>) {
        self.bytes_total = total.map(|value| value.max(self.bytes_transferred));
    }

    /// Adds a received chunk. A server that sends more than it announced
    /// drops the announced total rather than breaking `transferred <= total`.
    pub fn record_chunk(&mut self, len: u64) {
        self.bytes_transferred = self.bytes_transferred.saturating_add(len);
        if self
            .bytes_total
            .is_some_and(|total| self.bytes_transferred > total)
        {
            self.bytes_total = None;
        }
    }
}

pub fn percent_of(transferred: u64, total: Option<u64>) -> Option<u8> {
    let total = total.filter(|value| *value > 0)?;
    let bounded = transferred.min(total);
    Some(((bounded.saturating_mul(100)) / total) as u8)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    pub succeeded: bool,
    pub diagnostic_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Normal,
    Abnormal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReport {
    pub exit_code: i32,
    pub termination: Termination,
}

impl ExitReport {
    pub fn normal(exit_code: i32) -> Self {
        Self {
            exit_code,
            termination: Termination::Normal,
        }
    }

    pub fn abnormal(exit_code: i32) -> Self {
        Self {
            exit_code,
            termination: Termination::Abnormal,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.termination == Termination::Normal && self.exit_code == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeSession {
    pub pid: Option<u32>,
    pub exit: Option<ExitReport>,
    pub output: Vec<String>,
}

impl UpgradeSession {
    pub fn new(pid: Option<u32>) -> Self {
        Self {
            pid,
            exit: None,
            output: Vec::new(),
        }
    }

    pub fn push_output(&mut self, chunk: String) {
        self.output.push(chunk);
    }

    pub fn finish(&mut self, report: ExitReport) {
        self.exit = Some(report);
    }

    pub fn transcript(&self) -> String {
        self.output.concat()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Init,
    Elevating,
    ProbingTool,
    Bootstrapping,
    Downloading,
    Installing,
    Upgrading,
    Succeeded,
    Failed,
}

impl OrchestratorState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Elevating => "elevating",
            Self::ProbingTool => "probing-tool",
            Self::Bootstrapping => "bootstrapping",
            Self::Downloading => "downloading",
            Self::Installing => "installing",
            Self::Upgrading => "upgrading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    fn rank(self) -> u8 {
        match self {
            Self::Init => 0,
            Self::Elevating => 1,
            Self::ProbingTool => 2,
            Self::Bootstrapping => 3,
            Self::Downloading => 4,
            Self::Installing => 5,
            Self::Upgrading => 6,
            Self::Succeeded | Self::Failed => 7,
        }
    }

    pub fn can_advance_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == Self::Failed {
            return true;
        }
        next.rank() > self.rank()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Hidden,
    Indeterminate,
    Percent(u8),
}

impl Progress {
    pub fn from_bytes(transferred: u64, total: Option<u64>) -> Self {
        match percent_of(transferred, total) {
            Some(percent) => Self::Percent(percent),
            None => Self::Indeterminate,
        }
    }
}
