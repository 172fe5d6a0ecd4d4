//! Output formats and the capability trait the command builder consumes.
//!
//! A [`Format`] tells the builder which format-specific flags to append and
//! which audio codec, bitrate and channel count to request. Formats are plain
//! values owned by a single export job: configure them, build the command,
//! then drop them.

pub mod audio;
pub mod m3u8;

pub use audio::AudioFormat;
pub use m3u8::M3u8Format;

use crate::error::{CoreError, CoreResult};
use std::fmt;

/// Default audio bitrate in kbit/s for every format.
pub const DEFAULT_AUDIO_KILOBITRATE: u32 = 128;

/// Capabilities a format exposes to the command builder.
pub trait Format: fmt::Debug {
    /// Format-specific flags, flattened into alternating flag/value tokens.
    fn extra_params(&self) -> Vec<String>;

    /// Audio codec passed as `-acodec`, if any.
    fn audio_codec(&self) -> Option<&str>;

    /// Audio bitrate passed as `-b:a <n>k`, if any.
    fn audio_kilobitrate(&self) -> Option<u32>;

    /// Audio channel count passed as `-ac`, if any.
    fn audio_channels(&self) -> Option<u32>;

    /// Audio codecs this format accepts.
    fn available_audio_codecs(&self) -> &[&'static str];

    /// Video codecs this format accepts; audio-only formats accept none.
    fn available_video_codecs(&self) -> &[&'static str] {
        &[]
    }

    /// Number of encoding passes.
    fn passes(&self) -> u32 {
        1
    }

    /// Whether the output may contain B-frames.
    fn supports_b_frames(&self) -> bool {
        false
    }

    /// Frame-group modulus.
    fn modulus(&self) -> u32 {
        2
    }
}

// ============================================================================
// EXTRA PARAMETERS
// ============================================================================

/// Ordered flag → value map.
///
/// Keys keep the position of their first insertion; setting an existing key
/// replaces its value in place. Flattening yields `[flag, value, flag, value, ..]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraParams {
    entries: Vec<(String, String)>,
}

impl ExtraParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value for `flag`.
    pub fn set(&mut self, flag: &str, value: impl ToString) {
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| k == flag) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((flag.to_string(), value)),
        }
    }

    #[must_use]
    pub fn get(&self, flag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == flag)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens the map into alternating flag/value tokens.
    #[must_use]
    pub fn flatten(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(k, v)| [k.clone(), v.clone()])
            .collect()
    }
}

// ============================================================================
// AUDIO SETTINGS
// ============================================================================

/// Codec, bitrate and channel settings shared by every format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSettings {
    codec: Option<String>,
    kilobitrate: Option<u32>,
    channels: Option<u32>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            codec: None,
            kilobitrate: Some(DEFAULT_AUDIO_KILOBITRATE),
            channels: None,
        }
    }
}

impl AudioSettings {
    pub(crate) fn with_codec(codec: &str) -> Self {
        Self {
            codec: Some(codec.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn codec(&self) -> Option<&str> {
        self.codec.as_deref()
    }

    #[must_use]
    pub fn kilobitrate(&self) -> Option<u32> {
        self.kilobitrate
    }

    #[must_use]
    pub fn channels(&self) -> Option<u32> {
        self.channels
    }

    /// Sets the codec after checking it against `available`.
    pub fn set_codec(&mut self, codec: &str, available: &[&str]) -> CoreResult<()> {
        if !available.contains(&codec) {
            return Err(CoreError::InvalidArgument(format!(
                "Wrong audio codec value for {codec}, available formats are {}",
                available.join(", ")
            )));
        }
        self.codec = Some(codec.to_string());
        Ok(())
    }

    pub fn set_kilobitrate(&mut self, kilobitrate: u32) -> CoreResult<()> {
        if kilobitrate < 1 {
            return Err(CoreError::InvalidArgument(
                "Wrong kilobitrate value".to_string(),
            ));
        }
        self.kilobitrate = Some(kilobitrate);
        Ok(())
    }

    pub fn set_channels(&mut self, channels: u32) -> CoreResult<()> {
        if channels < 1 {
            return Err(CoreError::InvalidArgument(
                "Channels value must be a positive integer".to_string(),
            ));
        }
        self.channels = Some(channels);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_params_keep_insertion_order() {
        let mut params = ExtraParams::new();
        params.set("-hls_time", 5);
        params.set("-hls_list_size", 0);
        params.set("-hls_time", 10);

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("-hls_time"), Some("10"));
        assert_eq!(params.flatten(), vec!["-hls_time", "10", "-hls_list_size", "0"]);
    }

    #[test]
    fn test_extra_params_empty() {
        let params = ExtraParams::new();
        assert!(params.is_empty());
        assert!(params.flatten().is_empty());
        assert_eq!(params.get("-f"), None);
    }

    #[test]
    fn test_audio_settings_defaults() {
        let settings = AudioSettings::default();
        assert_eq!(settings.codec(), None);
        assert_eq!(settings.kilobitrate(), Some(128));
        assert_eq!(settings.channels(), None);
    }

    #[test]
    fn test_audio_settings_validation() {
        let mut settings = AudioSettings::default();

        let err = settings.set_codec("opus", &["aac"]).unwrap_err();
        assert!(err.to_string().contains("available formats are aac"));
        assert_eq!(settings.codec(), None);

        settings.set_codec("aac", &["aac"]).unwrap();
        assert_eq!(settings.codec(), Some("aac"));

        assert!(settings.set_kilobitrate(0).is_err());
        settings.set_kilobitrate(256).unwrap();
        assert_eq!(settings.kilobitrate(), Some(256));

        assert!(settings.set_channels(0).is_err());
        settings.set_channels(2).unwrap();
        assert_eq!(settings.channels(), Some(2));
    }
}
