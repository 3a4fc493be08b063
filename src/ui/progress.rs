use console::style;
use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a network call or packaging step runs.
pub struct ProgressBar {
    bar: IndicatifBar,
}

impl ProgressBar {
    /// Creates a spinner for indeterminate progress.
    pub fn spinner(label: &str) -> Self {
        let bar = IndicatifBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid spinner template"),
        );
        bar.set_message(style(label).dim().to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Replaces the spinner label.
    pub fn set_label(&self, label: &str) {
        self.bar.set_message(style(label).dim().to_string());
    }

    /// Finishes the spinner with a success message.
    pub fn finish(&self, message: &str) {
        self.bar
            .finish_with_message(format!("{} {}", style("✓").green(), message));
    }

    /// Finishes the spinner with an error message.
    pub fn finish_error(&self, message: &str) {
        self.bar
            .finish_with_message(format!("{} {}", style("✗").red(), message));
    }
}
