use crate::model::Progress;

/// Display sink driven by the orchestrator. Only the orchestrator's thread
/// calls into it; worker threads report through channels instead.
pub trait Presenter {
    fn append_line(&mut self, text: &str);
    fn set_progress(&mut self, progress: Progress);
    fn set_status(&mut self, text: &str);
    fn show_warning(&mut self, text: &str);
    fn show_fatal(&mut self, text: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    Line(String),
    Progress(Progress),
    Status(String),
    Warning(String),
    Fatal(String),
}

/// Presenter that keeps every call, for headless runs and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingPresenter {
    pub events: Vec<PresenterEvent>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Line(line) => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|event| match event {
            PresenterEvent::Status(status) => Some(status.as_str()),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Warning(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn fatals(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Fatal(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn progress_updates(&self) -> Vec<Progress> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Progress(progress) => Some(*progress),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn append_line(&mut self, text: &str) {
        self.events.push(PresenterEvent::Line(text.to_string()));
    }

    fn set_progress(&mut self, progress: Progress) {
        self.events.push(PresenterEvent::Progress(progress));
    }

    fn set_status(&mut self, text: &str) {
        self.events.push(PresenterEvent::Status(text.to_string()));
    }

    fn show_warning(&mut self, text: &str) {
        self.events.push(PresenterEvent::Warning(text.to_string()));
    }

    fn show_fatal(&mut self, text: &str) {
        self.events.push(PresenterEvent::Fatal(text.to_string()));
    }
}
