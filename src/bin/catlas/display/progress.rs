use std::fmt::Display;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TEMPLATE: &str = "  {spinner:.cyan} [{prefix}] {msg}";
const SPINNER_FRAMES: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
const RULE_WIDTH: usize = 56;

/// Running stage: its label, when it began, and the spinner drawn for it.
struct Stage {
    label: String,
    began: Instant,
    spinner: ProgressBar,
}

/// Numbered stage reporter on stderr.
///
/// Draws nothing when stderr is not a terminal, so commands can report
/// unconditionally.
pub struct Progress {
    enabled: bool,
    stages: u8,
    finished: u8,
    started: Instant,
    current: Option<Stage>,
}

impl Progress {
    pub fn new(interactive: bool, stages: u8) -> Self {
        Self {
            enabled: interactive,
            stages,
            finished: 0,
            started: Instant::now(),
            current: None,
        }
    }

    /// Starts a stage, closing any stage still running without a report.
    pub fn begin(&mut self, label: &str) {
        if let Some(stage) = self.current.take() {
            stage.spinner.finish_and_clear();
        }
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
            spinner.set_style(style.tick_chars(SPINNER_FRAMES));
        }
        spinner.set_prefix(format!("{}/{}", self.finished + 1, self.stages));
        spinner.set_message(format!("{label}..."));
        spinner.enable_steady_tick(Duration::from_millis(80));

        self.current = Some(Stage {
            label: label.to_string(),
            began: Instant::now(),
            spinner,
        });
    }

    /// Closes the running stage with its elapsed time and one line per detail.
    pub fn done<I>(&mut self, details: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.finished = self.finished.saturating_add(1);
        let Some(stage) = self.current.take() else {
            return;
        };
        stage.spinner.finish_and_clear();

        let mut err = io::stderr().lock();
        let _ = writeln!(
            err,
            "  \x1b[32m✓\x1b[0m {:<44} {:>5.1}s",
            stage.label,
            stage.began.elapsed().as_secs_f64()
        );
        for detail in details {
            let _ = writeln!(err, "      \x1b[2m·\x1b[0m {detail}");
        }
    }

    /// Prints the closing rule and total wall time.
    pub fn finish(mut self) {
        if let Some(stage) = self.current.take() {
            stage.spinner.finish_and_clear();
        }
        if !self.enabled {
            return;
        }

        let total = format!("{:.2}s", self.started.elapsed().as_secs_f64());
        let mut err = io::stderr().lock();
        let _ = writeln!(err);
        let _ = writeln!(err, "  \x1b[2m{}\x1b[0m", "─".repeat(RULE_WIDTH));
        let _ = writeln!(
            err,
            "  \x1b[32m✓\x1b[0m {} stages in {total}",
            self.finished
        );
        let _ = writeln!(err);
    }
}
