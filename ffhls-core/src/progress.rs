//! `FFmpeg` progress handling
//!
//! Turns the event stream produced by ffmpeg-sidecar into [`ProgressUpdate`]s
//! for a caller-supplied [`ProgressListener`], forwards ffmpeg's own log lines
//! to the `log` facade, and keeps stderr for error reporting.

use crate::utils::parse_ffmpeg_time;
use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress, LogLevel as FfmpegLogLevel};
use std::time::Duration;

/// Snapshot of a running encode.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// 0.0 - 100.0, or 0.0 while the total duration is unknown
    pub percent: f64,
    /// Output time reached so far, in seconds
    pub time_secs: f64,
    /// Expected output duration, if known
    pub total_secs: Option<f64>,
    pub speed: f32,
    pub fps: f32,
    pub frame: u32,
    pub eta: Option<Duration>,
}

/// Receives progress updates while ffmpeg runs.
pub trait ProgressListener {
    fn on_progress(&mut self, update: &ProgressUpdate);
}

impl<F> ProgressListener for F
where
    F: FnMut(&ProgressUpdate),
{
    fn on_progress(&mut self, update: &ProgressUpdate) {
        self(update);
    }
}

/// Handler for `FFmpeg` events
pub struct FfmpegProgressHandler<'a> {
    total_secs: Option<f64>,
    offset_secs: f64,
    listener: Option<&'a mut dyn ProgressListener>,
    last_reported_percent: Option<u32>,
    stderr_buffer: String,
    captured: Option<String>,
}

impl<'a> FfmpegProgressHandler<'a> {
    /// Creates a handler.
    ///
    /// `total_secs` is the expected output duration when the caller knows it
    /// (a clip length). Otherwise the input duration reported by ffmpeg is
    /// used, minus `offset_secs` (the seek position).
    #[must_use]
    pub fn new(
        total_secs: Option<f64>,
        offset_secs: f64,
        listener: Option<&'a mut dyn ProgressListener>,
    ) -> Self {
        Self {
            total_secs: total_secs.filter(|&d| d > 0.0),
            offset_secs,
            listener,
            last_reported_percent: None,
            stderr_buffer: String::new(),
            captured: None,
        }
    }

    /// Keeps every log line so it can be returned to the caller.
    #[must_use]
    pub fn capturing(mut self, capture: bool) -> Self {
        self.captured = capture.then(String::new);
        self
    }

    /// Handles an `FFmpeg` event
    pub fn handle_event(&mut self, event: FfmpegEvent) {
        match event {
            FfmpegEvent::ParsedDuration(duration) => self.handle_input_duration(duration.duration),
            FfmpegEvent::Progress(progress) => self.handle_progress(&progress),
            FfmpegEvent::Log(level, message) => self.handle_log(&level, &message),
            FfmpegEvent::Error(error) => self.handle_error(&error),
            _ => {}
        }
    }

    /// Expected output duration, once known.
    #[must_use]
    pub fn total_secs(&self) -> Option<f64> {
        self.total_secs
    }

    /// Gets the accumulated stderr buffer
    #[must_use]
    pub fn stderr_buffer(&self) -> &str {
        &self.stderr_buffer
    }

    /// Consumes the handler, returning captured output if capturing was on.
    #[must_use]
    pub fn into_captured(self) -> Option<String> {
        self.captured
    }

    fn handle_input_duration(&mut self, input_secs: f64) {
        if self.total_secs.is_none() {
            let remaining = input_secs - self.offset_secs;
            if remaining > 0.0 {
                log::debug!("Expected output duration: {remaining:.2}s");
                self.total_secs = Some(remaining);
            }
        }
    }

    fn handle_progress(&mut self, progress: &FfmpegProgress) {
        let time_secs = parse_ffmpeg_time(&progress.time).unwrap_or(0.0);
        let percent = self
            .total_secs
            .map_or(0.0, |total| (time_secs / total * 100.0).clamp(0.0, 100.0));

        // Report whole-percent changes only
        let whole = percent as u32;
        if self.last_reported_percent == Some(whole) {
            return;
        }
        self.last_reported_percent = Some(whole);

        let eta = match self.total_secs {
            Some(total) if progress.speed > 0.0 => {
                let remaining = (total - time_secs).max(0.0);
                Duration::try_from_secs_f64(remaining / f64::from(progress.speed)).ok()
            }
            _ => None,
        };

        let update = ProgressUpdate {
            percent,
            time_secs,
            total_secs: self.total_secs,
            speed: progress.speed,
            fps: progress.fps,
            frame: progress.frame,
            eta,
        };
        log::trace!("Encoding progress: {percent:.1}% ({time_secs:.1}s)");

        if let Some(listener) = self.listener.as_deref_mut() {
            listener.on_progress(&update);
        }
    }

    fn handle_log(&mut self, level: &FfmpegLogLevel, message: &str) {
        let log_level = map_ffmpeg_log_level(level);
        log::log!(target: "ffmpeg_log", log_level, "{message}");

        if matches!(level, FfmpegLogLevel::Error | FfmpegLogLevel::Fatal) {
            self.stderr_buffer.push_str(message);
            self.stderr_buffer.push('\n');
        }
        if let Some(captured) = self.captured.as_mut() {
            captured.push_str(message);
            captured.push('\n');
        }
    }

    fn handle_error(&mut self, error: &str) {
        log::debug!("ffmpeg stderr error: {error}");
        self.stderr_buffer.push_str(error);
        self.stderr_buffer.push('\n');
    }
}

fn map_ffmpeg_log_level(level: &FfmpegLogLevel) -> log::Level {
    match level {
        FfmpegLogLevel::Fatal | FfmpegLogLevel::Error => log::Level::Error,
        FfmpegLogLevel::Warning => log::Level::Warn,
        FfmpegLogLevel::Info => log::Level::Debug,
        _ => log::Level::Trace,
    }
}
