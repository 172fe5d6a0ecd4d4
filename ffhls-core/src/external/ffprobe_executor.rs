//! FFprobe integration for media inspection
//!
//! Wraps the `ffprobe` crate and reduces its output to a [`MediaSummary`]:
//! container duration and name plus one entry per stream.
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use ffprobe::{FfProbe, FfProbeError, ffprobe};
use serde::Serialize;
use std::path::Path;

/// Kind of a media stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Audio,
    Video,
    Subtitle,
    Data,
    Other,
}

impl StreamKind {
    fn from_codec_type(codec_type: Option<&str>) -> Self {
        match codec_type {
            Some("audio") => Self::Audio,
            Some("video") => Self::Video,
            Some("subtitle") => Self::Subtitle,
            Some("data") => Self::Data,
            _ => Self::Other,
        }
    }
}

/// One stream of a probed input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamSummary {
    pub index: usize,
    pub kind: StreamKind,
    pub codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// What ffprobe reports about an input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaSummary {
    /// Duration in seconds, when the container declares one
    pub duration: Option<f64>,
    pub format_name: String,
    pub streams: Vec<StreamSummary>,
}

impl MediaSummary {
    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.streams.iter().any(|s| s.kind == StreamKind::Audio)
    }

    #[must_use]
    pub fn has_video(&self) -> bool {
        self.streams.iter().any(|s| s.kind == StreamKind::Video)
    }
}

/// Probes `input_path` with ffprobe.
///
/// # Errors
///
/// Returns `CommandStart` when ffprobe cannot run, `CommandFailed` when it
/// rejects the input and `Probe` when its output cannot be read.
pub fn probe(input_path: &Path) -> CoreResult<MediaSummary> {
    log::debug!("Running ffprobe (via crate) on: {}", input_path.display());
    match ffprobe(input_path) {
        Ok(metadata) => Ok(summarize(&metadata)),
        Err(err) => {
            log::error!("ffprobe failed on {}: {:?}", input_path.display(), err);
            Err(map_ffprobe_error(err, input_path))
        }
    }
}

fn summarize(metadata: &FfProbe) -> MediaSummary {
    let streams = metadata
        .streams
        .iter()
        .enumerate()
        .map(|(index, s)| StreamSummary {
            index,
            kind: StreamKind::from_codec_type(s.codec_type.as_deref()),
            codec: s.codec_name.clone(),
            channels: non_negative(s.channels),
            width: non_negative(s.width),
            height: non_negative(s.height),
        })
        .collect();

    MediaSummary {
        duration: metadata
            .format
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok()),
        format_name: metadata.format.format_name.clone(),
        streams,
    }
}

fn non_negative(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

fn map_ffprobe_error(err: FfProbeError, input_path: &Path) -> CoreError {
    let context = format!("ffprobe ({})", input_path.display());
    match err {
        FfProbeError::Io(io_err) => command_start_error(context, io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            command_failed_error(context, output.status, stderr)
        }
        FfProbeError::Deserialize(err) => {
            CoreError::Probe(format!("{context} output deserialization: {err}"))
        }
        _ => CoreError::Probe(format!("Unknown error during {context}: {err:?}")),
    }
}
