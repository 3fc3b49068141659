//! Waiting indicator shown until the first reply fragment arrives

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Hooks around a streamed reply
pub trait TurnProgress {
    /// The request has been sent
    fn on_waiting(&self, model: &str);

    /// The first fragment arrived, or the turn ended without one
    fn on_first_chunk(&self);
}

/// Spinner on stderr while the model is thinking
pub struct ProgressReporter {
    spinner: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: ProgressBar::hidden(),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgress for ProgressReporter {
    fn on_waiting(&self, model: &str) {
        self.spinner.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.spinner.set_style(Self::spinner_style());
        self.spinner.set_prefix(model.to_string());
        self.spinner.set_message("thinking...");
        self.spinner.enable_steady_tick(Duration::from_millis(100));
    }

    fn on_first_chunk(&self) {
        self.spinner.finish_and_clear();
    }
}

/// No indicator (`--quiet`)
pub struct SilentProgress;

impl TurnProgress for SilentProgress {
    fn on_waiting(&self, _model: &str) {}

    fn on_first_chunk(&self) {}
}
