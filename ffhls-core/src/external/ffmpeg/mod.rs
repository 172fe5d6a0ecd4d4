//! FFmpeg execution
//!
//! Spawns ffmpeg with a prepared argument list, feeds its events through an
//! [`FfmpegProgressHandler`] and turns a non-zero exit into
//! [`CoreError::CommandFailed`] carrying the collected error output.

use crate::config::FfmpegConfig;
use crate::error::{CoreResult, command_failed_error};
use crate::external::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use crate::progress::{FfmpegProgressHandler, ProgressListener};

/// Maximum number of error lines kept in a failure message.
const MAX_ERROR_LINES: usize = 20;

/// Runs ffmpeg with `tokens`.
///
/// With `capture_output` set, every log line ffmpeg printed is returned on
/// success. Progress goes to `listener` if one is given; since no duration
/// is known up front, percentages are computed from the input duration ffmpeg
/// reports.
///
/// # Errors
///
/// Spawn and wait failures are returned as-is. A non-zero exit becomes
/// `CoreError::CommandFailed` with ffmpeg's error output as the message.
pub fn execute<S: FfmpegSpawner>(
    spawner: &S,
    config: &FfmpegConfig,
    tokens: &[String],
    capture_output: bool,
    listener: Option<&mut dyn ProgressListener>,
) -> CoreResult<Option<String>> {
    let handler = FfmpegProgressHandler::new(None, 0.0, listener).capturing(capture_output);
    execute_with_handler(spawner, config, tokens, handler)
}

/// Runs ffmpeg with `tokens`, reporting through a prepared handler.
///
/// # Errors
///
/// See [`execute`].
pub fn execute_with_handler<S: FfmpegSpawner>(
    spawner: &S,
    config: &FfmpegConfig,
    tokens: &[String],
    mut handler: FfmpegProgressHandler<'_>,
) -> CoreResult<Option<String>> {
    let binary = config.ffmpeg_binary.as_path();
    log::debug!("Running: {} {}", binary.display(), tokens.join(" "));

    let mut process = spawner.spawn(binary, tokens)?;
    process.handle_events(|event| {
        handler.handle_event(event);
        Ok(())
    })?;
    let status = process.wait()?;

    if status.success() {
        log::debug!("ffmpeg finished successfully");
        return Ok(handler.into_captured());
    }

    let message = error_summary(handler.stderr_buffer());
    log::error!("ffmpeg failed with status {status}: {message}");
    Err(command_failed_error("ffmpeg", status, message))
}

/// Last error lines from ffmpeg, or a placeholder when it printed none.
fn error_summary(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return "ffmpeg produced no error output".to_string();
    }
    let skip = lines.len().saturating_sub(MAX_ERROR_LINES);
    lines[skip..].join("\n")
}
