// ============================================================================
// ffhls-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for FfmpegConfig
//
// Fluent construction of FfmpegConfig with the library defaults for every
// field that is not set explicitly.

use std::path::PathBuf;

use super::FfmpegConfig;

/// Builder for creating FfmpegConfig instances.
#[derive(Debug, Clone, Default)]
pub struct FfmpegConfigBuilder {
    config: FfmpegConfig,
}

impl FfmpegConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ffmpeg binary (a bare name is resolved through `PATH`).
    #[must_use]
    pub fn ffmpeg_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.config.ffmpeg_binary = binary.into();
        self
    }

    /// Sets the ffprobe binary.
    #[must_use]
    pub fn ffprobe_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.config.ffprobe_binary = binary.into();
        self
    }

    /// Sets the thread count passed to ffmpeg as `-threads`.
    #[must_use]
    pub fn threads(mut self, threads: u32) -> Self {
        self.config.threads = Some(threads);
        self
    }

    /// Sets or clears the thread count.
    #[must_use]
    pub fn maybe_threads(mut self, threads: Option<u32>) -> Self {
        self.config.threads = threads;
        self
    }

    /// Builds the FfmpegConfig.
    #[must_use]
    pub fn build(self) -> FfmpegConfig {
        self.config
    }
}
