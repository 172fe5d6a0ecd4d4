//! Utility functions for time parsing, formatting and file cleanup.
//!
//! This module provides general-purpose helpers used throughout the
//! ffhls-core library.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Parses FFmpeg time string (HH:MM:SS.MS) to seconds. Returns None if invalid.
#[must_use]
pub fn parse_ffmpeg_time(time: &str) -> Option<f64> {
    let parts: Vec<&str> = time.trim().split(':').collect();
    if parts.len() == 3 {
        let hours = parts[0].parse::<f64>().ok()?;
        let minutes = parts[1].parse::<f64>().ok()?;
        let seconds = parts[2].parse::<f64>().ok()?;
        Some(hours * 3600.0 + minutes * 60.0 + seconds)
    } else {
        None
    }
}

/// Removes a partially written output file after a failed run.
///
/// A missing file is not an error; other failures are logged and swallowed
/// so the original process error can still be reported.
pub fn cleanup_partial_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {
            log::warn!("Removed partial output: {}", path.display());
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            log::warn!(
                "Failed to remove partial output at {}: {}",
                path.display(),
                err
            );
        }
    }
}
