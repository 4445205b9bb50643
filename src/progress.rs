//! Informational search progress. Never affects the result.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Cloneable progress handle shared by every worker.
#[derive(Clone)]
pub struct SearchProgress {
    bar: ProgressBar,
}

impl SearchProgress {
    /// A spinner on stderr when `visible`, otherwise a no-op handle.
    pub fn new(visible: bool) -> Self {
        if !visible {
            return Self::hidden();
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::with_template("{spinner} [{elapsed_precise}] {pos} seeds tested ({per_sec}) {msg}")
        {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(250));
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Record `seeds` more candidates as tested.
    pub fn advance(&self, seeds: u64) {
        self.bar.inc(seeds);
    }

    pub fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    /// Total seeds recorded so far.
    pub fn tested(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
