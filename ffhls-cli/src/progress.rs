// ffhls-cli/src/progress.rs
//
// Terminal progress bar fed by the core progress updates.

use ffhls_core::{ProgressListener, ProgressUpdate, format_duration};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Shows encoding progress as a percentage bar on stderr.
pub struct ProgressBarListener {
    bar: ProgressBar,
}

impl ProgressBarListener {
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}% {prefix}")
            .map(|style| style.progress_chars("█▓▒░ "))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

impl ProgressListener for ProgressBarListener {
    fn on_progress(&mut self, update: &ProgressUpdate) {
        self.bar.set_position(update.percent as u64);
        let eta = update
            .eta
            .map(|eta| format!("ETA {}", format_duration(eta.as_secs_f64())))
            .unwrap_or_default();
        self.bar
            .set_prefix(format!("{:.1}x {eta}", update.speed).trim_end().to_string());
    }
}
