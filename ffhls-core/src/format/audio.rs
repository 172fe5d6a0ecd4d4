//! Plain audio output formats (mp3, aac, flac, wav, vorbis).

use super::{AudioSettings, ExtraParams, Format};
use crate::error::{CoreError, CoreResult};

/// An audio-only output format with a preset codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFormat {
    name: &'static str,
    available_codecs: &'static [&'static str],
    audio: AudioSettings,
    params: ExtraParams,
}

impl AudioFormat {
    fn preset(name: &'static str, available_codecs: &'static [&'static str]) -> Self {
        Self {
            name,
            available_codecs,
            audio: AudioSettings::with_codec(available_codecs[0]),
            params: ExtraParams::new(),
        }
    }

    /// MPEG layer 3 through libmp3lame.
    #[must_use]
    pub fn mp3() -> Self {
        Self::preset("mp3", &["libmp3lame"])
    }

    #[must_use]
    pub fn aac() -> Self {
        Self::preset("aac", &["libfdk_aac", "aac"])
    }

    #[must_use]
    pub fn flac() -> Self {
        Self::preset("flac", &["flac"])
    }

    /// 16-bit little-endian PCM in a WAV container.
    #[must_use]
    pub fn wav() -> Self {
        Self::preset("wav", &["pcm_s16le"])
    }

    /// Vorbis through ffmpeg's native (experimental) encoder.
    #[must_use]
    pub fn vorbis() -> Self {
        let mut format = Self::preset("vorbis", &["vorbis", "libvorbis"]);
        format.params.set("-strict", -2);
        format
    }

    /// Looks up a preset by name (case-insensitive).
    pub fn by_name(name: &str) -> CoreResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mp3" => Ok(Self::mp3()),
            "aac" => Ok(Self::aac()),
            "flac" => Ok(Self::flac()),
            "wav" => Ok(Self::wav()),
            "vorbis" | "ogg" => Ok(Self::vorbis()),
            other => Err(CoreError::InvalidArgument(format!(
                "Unknown audio format '{other}', expected one of mp3, aac, flac, wav, vorbis"
            ))),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn set_audio_codec(&mut self, codec: &str) -> CoreResult<&mut Self> {
        self.audio.set_codec(codec, self.available_codecs)?;
        Ok(self)
    }

    pub fn set_audio_kilobitrate(&mut self, kilobitrate: u32) -> CoreResult<&mut Self> {
        self.audio.set_kilobitrate(kilobitrate)?;
        Ok(self)
    }

    pub fn set_audio_channels(&mut self, channels: u32) -> CoreResult<&mut Self> {
        self.audio.set_channels(channels)?;
        Ok(self)
    }
}

impl Format for AudioFormat {
    fn extra_params(&self) -> Vec<String> {
        self.params.flatten()
    }

    fn audio_codec(&self) -> Option<&str> {
        self.audio.codec()
    }

    fn audio_kilobitrate(&self) -> Option<u32> {
        self.audio.kilobitrate()
    }

    fn audio_channels(&self) -> Option<u32> {
        self.audio.channels()
    }

    fn available_audio_codecs(&self) -> &[&'static str] {
        self.available_codecs
    }
}
