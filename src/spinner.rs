//! Console spinner shown while a model call is in flight.
//!
//! [`Spinner`] is a guard: the spinner ticks on its own thread until the
//! guard is dropped, which clears the line. The spinner draws to stdout next
//! to the progress lines, away from the log output on stderr. indicatif hides
//! it when stdout is not a terminal.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Start a spinner with `message` next to it.
    pub fn start(message: impl Into<String>) -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
        bar.set_style(style());
        bar.set_message(message.into());
        bar.enable_steady_tick(TICK);
        Self { bar }
    }

    /// A spinner that never draws.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Start a spinner only when `visible` is set.
    pub fn start_if(visible: bool, message: impl Into<String>) -> Self {
        if visible {
            Self::start(message)
        } else {
            Self::hidden()
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

fn style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
        .template("{spinner:.cyan} {msg} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
