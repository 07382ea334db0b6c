//! Spinner shown while sources are fetched

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner for long-running fetches
///
/// Hidden when stderr is not a terminal so that scripted runs and tests see
/// no control sequences.
pub struct FetchSpinner {
    pb: ProgressBar,
}

impl FetchSpinner {
    /// Start a spinner with an initial message
    pub fn start(message: impl Into<String>) -> Self {
        let pb = if console::Term::stderr().features().is_attended() {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };

        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.into());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Replace the spinner message
    pub fn set_message(&self, message: impl Into<String>) {
        self.pb.set_message(message.into());
    }

    /// Stop and clear the spinner
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }

    /// Stop the spinner leaving the last message visible
    pub fn abandon(&self) {
        self.pb.abandon();
    }
}

impl Drop for FetchSpinner {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}
