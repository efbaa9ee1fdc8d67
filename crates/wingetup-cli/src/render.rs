use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};
use wingetup_core::{Presenter, Progress};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum BarKind {
    Spinner,
    Percent,
}

/// Stdout presenter. Rich output adds badges and a live progress bar.
pub(crate) struct TerminalPresenter {
    style: OutputStyle,
    status: String,
    bar: Option<(BarKind, ProgressBar)>,
}

impl TerminalPresenter {
    pub(crate) fn new(style: OutputStyle) -> Self {
        Self {
            style,
            status: String::new(),
            bar: None,
        }
    }

    pub(crate) fn finish(&mut self) {
        self.clear_bar();
    }

    fn print(&self, line: &str) {
        match &self.bar {
            Some((_, bar)) => bar.println(line),
            None => println!("{line}"),
        }
    }

    fn print_status(&self, status: &str, message: &str) {
        let line = render_status_line(self.style, status, message);
        let rendered = match self.style {
            OutputStyle::Plain => line,
            OutputStyle::Rich => paint_badge(status, &line),
        };
        self.print(&rendered);
    }

    fn ensure_bar(&mut self, kind: BarKind) -> Option<&ProgressBar> {
        if self.style == OutputStyle::Plain {
            return None;
        }
        if self.bar.as_ref().map(|(current, _)| *current) != Some(kind) {
            self.clear_bar();
            let bar = match kind {
                BarKind::Spinner => ProgressBar::new_spinner(),
                BarKind::Percent => ProgressBar::new(100),
            };
            if let Ok(style) = ProgressStyle::with_template(bar_template(kind)) {
                bar.set_style(style.tick_chars("|/-\\ ").progress_chars("=>-"));
            }
            bar.set_message(self.status.clone());
            bar.enable_steady_tick(Duration::from_millis(80));
            self.bar = Some((kind, bar));
        }
        self.bar.as_ref().map(|(_, bar)| bar)
    }

    fn clear_bar(&mut self) {
        if let Some((_, bar)) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Presenter for TerminalPresenter {
    fn append_line(&mut self, text: &str) {
        self.print(text);
    }

    fn set_progress(&mut self, progress: Progress) {
        match progress {
            Progress::Hidden => self.clear_bar(),
            Progress::Indeterminate => {
                self.ensure_bar(BarKind::Spinner);
            }
            Progress::Percent(percent) => {
                if let Some(bar) = self.ensure_bar(BarKind::Percent) {
                    bar.set_position(u64::from(percent.min(100)));
                }
            }
        }
    }

    fn set_status(&mut self, text: &str) {
        text.clone_into(&mut self.status);
        if let Some((_, bar)) = &self.bar {
            bar.set_message(text.to_string());
        }
        self.print_status(classify_status(text), text);
    }

    fn show_warning(&mut self, text: &str) {
        for line in text.lines() {
            self.print_status("warn", line);
        }
    }

    fn show_fatal(&mut self, text: &str) {
        self.clear_bar();
        for line in text.lines() {
            self.print_status("err", line);
        }
    }
}

pub(crate) fn resolve_output_style(stdout_is_tty: bool) -> OutputStyle {
    if stdout_is_tty {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "ok" => "[OK]",
        "warn" => "[WARN]",
        "err" => "[ERR]",
        _ => "[..]",
    }
}

pub(crate) fn classify_status(text: &str) -> &'static str {
    let lowered = text.to_ascii_lowercase();
    if lowered.contains("error") {
        "err"
    } else if lowered.contains("successfully") {
        "ok"
    } else {
        "step"
    }
}

fn bar_template(kind: BarKind) -> &'static str {
    match kind {
        BarKind::Spinner => "{spinner:.cyan.bold} {msg} {elapsed_precise}",
        BarKind::Percent => "{spinner:.cyan.bold} {msg:<20} [{bar:24.cyan/blue}] {pos:>3}%",
    }
}

fn paint_badge(status: &str, line: &str) -> String {
    let badge = status_badge(status);
    match line.strip_prefix(badge) {
        Some(rest) => format!("{}{rest}", colorize(badge_style(status), badge)),
        None => line.to_string(),
    }
}

fn badge_style(status: &str) -> Style {
    let color = match status {
        "ok" => AnsiColor::BrightGreen,
        "warn" => AnsiColor::BrightYellow,
        "err" => AnsiColor::BrightRed,
        _ => AnsiColor::BrightBlue,
    };
    Style::new()
        .fg_color(Some(color.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
