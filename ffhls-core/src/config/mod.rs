//! Configuration structures and constants for the ffhls-core library.
//!
//! The ffmpeg/ffprobe binaries and the thread count are passed explicitly to
//! the command builder and the process runner through [`FfmpegConfig`]
//! instead of living in global state.

mod builder;

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;

pub use builder::FfmpegConfigBuilder;

// Default constants

/// Default ffmpeg binary, resolved through `PATH`.
pub const DEFAULT_FFMPEG_BINARY: &str = "ffmpeg";

/// Default ffprobe binary, resolved through `PATH`.
pub const DEFAULT_FFPROBE_BINARY: &str = "ffprobe";

/// Environment variable overriding the ffmpeg binary.
pub const ENV_FFMPEG_BINARY: &str = "FFHLS_FFMPEG_BINARY";

/// Environment variable overriding the ffprobe binary.
pub const ENV_FFPROBE_BINARY: &str = "FFHLS_FFPROBE_BINARY";

/// Environment variable setting the `-threads` value passed to ffmpeg.
pub const ENV_THREADS: &str = "FFHLS_THREADS";

/// Settings shared by every command built and run by the library.
///
/// # Examples
///
/// ```rust
/// use ffhls_core::config::FfmpegConfigBuilder;
///
/// let config = FfmpegConfigBuilder::new()
///     .ffmpeg_binary("/usr/local/bin/ffmpeg")
///     .threads(12)
///     .build();
/// assert_eq!(config.threads, Some(12));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfmpegConfig {
    /// Path or name of the ffmpeg binary
    pub ffmpeg_binary: PathBuf,

    /// Path or name of the ffprobe binary
    pub ffprobe_binary: PathBuf,

    /// Number of threads ffmpeg should use; `None` leaves the choice to ffmpeg
    pub threads: Option<u32>,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            ffmpeg_binary: PathBuf::from(DEFAULT_FFMPEG_BINARY),
            ffprobe_binary: PathBuf::from(DEFAULT_FFPROBE_BINARY),
            threads: None,
        }
    }
}

impl FfmpegConfig {
    /// Creates a configuration with default binaries and no thread override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from the `FFHLS_*` environment variables.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// Unset or empty variables fall back to the defaults. An unparsable
    /// thread count is a configuration error.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut builder = FfmpegConfigBuilder::new();

        if let Some(binary) = get(ENV_FFMPEG_BINARY) {
            builder = builder.ffmpeg_binary(binary);
        }
        if let Some(binary) = get(ENV_FFPROBE_BINARY) {
            builder = builder.ffprobe_binary(binary);
        }
        if let Some(threads) = get(ENV_THREADS) {
            let threads = threads.trim().parse::<u32>().map_err(|e| {
                CoreError::Config(format!("{ENV_THREADS}='{threads}' is not a thread count: {e}"))
            })?;
            builder = builder.threads(threads);
        }

        let config = builder.build();
        log::debug!("Loaded ffmpeg configuration: {config:?}");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = FfmpegConfig::default();
        assert_eq!(config.ffmpeg_binary, PathBuf::from("ffmpeg"));
        assert_eq!(config.ffprobe_binary, PathBuf::from("ffprobe"));
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = FfmpegConfig::from_lookup(lookup_from(&[
            (ENV_FFMPEG_BINARY, "/opt/ffmpeg/bin/ffmpeg"),
            (ENV_THREADS, "12"),
        ]))
        .unwrap();

        assert_eq!(config.ffmpeg_binary, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.ffprobe_binary, PathBuf::from("ffprobe"));
        assert_eq!(config.threads, Some(12));
    }

    #[test]
    fn test_lookup_ignores_empty_values() {
        let config =
            FfmpegConfig::from_lookup(lookup_from(&[(ENV_FFMPEG_BINARY, ""), (ENV_THREADS, " ")]))
                .unwrap();
        assert_eq!(config, FfmpegConfig::default());
    }

    #[test]
    fn test_lookup_rejects_bad_threads() {
        let err = FfmpegConfig::from_lookup(lookup_from(&[(ENV_THREADS, "many")])).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
