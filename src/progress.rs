//! Progress reporting infrastructure

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::borrow::Cow;

/// CLI progress report of ongoing operations
///
/// To avoid corrupted terminal output, you should not write anything to stdout
/// or stderr yourself as long as a progress bar is being displayed. Please use
/// logs for debug messages.
#[derive(Clone, Debug, Default)]
pub struct ProgressReport(MultiProgress);
//
impl ProgressReport {
    /// Prepare to report progress on the cli
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that won't be displayed, for use in tests
    #[cfg(test)]
    pub fn hidden() -> Self {
        Self(MultiProgress::with_draw_target(
            indicatif::ProgressDrawTarget::hidden(),
        ))
    }

    /// Prepare to report on a new operation
    pub fn add(
        &self,
        what: impl Into<Cow<'static, str>>,
        config: ProgressConfig,
    ) -> ProgressTracker {
        let ProgressConfig {
            initial_work,
            show_rate_eta,
        } = config;
        let style_header = "{prefix} {wide_bar} ";
        let style_trailer = match (initial_work, show_rate_eta) {
            (Work::Steps(_), false) => "{pos}/{len}",
            (Work::Steps(_), true) => "{pos}/{len} (~{eta} left)",
            (Work::Bytes(_), false) => "{decimal_bytes}/{decimal_total_bytes}",
            (Work::Bytes(_), true) => {
                "{decimal_bytes}/{decimal_total_bytes} ({decimal_bytes_per_sec})"
            }
        };
        let bar = ProgressBar::new(initial_work.into())
            .with_prefix(what.into())
            .with_style(
                ProgressStyle::with_template(&format!("{style_header}{style_trailer}"))
                    .expect("all styles above should be valid indicatif styles"),
            );
        ProgressTracker {
            bar: self.0.add(bar),
            report: self.0.clone(),
        }
    }
}

/// Progress bar configuration
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct ProgressConfig {
    /// Initial length of the progress bar
    initial_work: Work,

    /// Show the estimated remaining time or transfer rate, depending on work
    show_rate_eta: bool,
}
//
impl ProgressConfig {
    /// Default configuration, with some initial amount of work
    pub fn new(initial_work: Work) -> Self {
        Self {
            initial_work,
            show_rate_eta: true,
        }
    }

    /// Disable display of the completion rate or remaining time
    pub fn dont_show_rate_eta(self) -> Self {
        Self {
            show_rate_eta: false,
            ..self
        }
    }
}

/// Work whose progression can be tracked
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Work {
    /// Steps to be taken, with a precise count display
    Steps(usize),

    /// Bytes to be processed
    Bytes(u64),
}
//
impl From<Work> for u64 {
    fn from(value: Work) -> Self {
        match value {
            Work::Steps(s) => s as u64,
            Work::Bytes(b) => b,
        }
    }
}

/// Mechanism to track progress
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    /// Progress bar for this specific operation
    bar: ProgressBar,

    /// Underlying progress report
    report: MultiProgress,
}
//
impl ProgressTracker {
    /// Show that a certain amount of progress has been made
    pub fn make_progress(&self, progress: u64) {
        self.bar.inc(progress);
    }

    /// Increment the amount of work that remains to be done
    ///
    /// This is for operations whose total amount of work is only discovered
    /// along the way, like downloads whose size is not announced.
    pub fn add_work(&self, remaining: u64) {
        self.bar.inc_length(remaining);
    }

    /// Hide the progress bar once the operation is over
    pub fn finish(&self) {
        self.bar.finish_and_clear();
        self.report.remove(&self.bar);
    }
}
