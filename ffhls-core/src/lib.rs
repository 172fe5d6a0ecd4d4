//! Core library for building and running ffmpeg exports, HLS packaging in
//! particular.
//!
//! This crate provides output formats (an HLS/M3U8 format with optional
//! AES-128 key generation and plain audio presets), priority-ordered filter
//! stages, a pure command builder, and a runner that spawns ffmpeg and reports
//! progress.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use ffhls_core::{Audio, FfmpegConfig, M3u8Format, SidecarSpawner, TimeCode};
//!
//! let mut format = M3u8Format::create("/tmp/hls", true).unwrap();
//! format.set_segment_duration(10);
//!
//! let mut audio = Audio::open("in.mp4").unwrap();
//! audio.clip(TimeCode::from_seconds(30.0).unwrap(), None);
//!
//! let config = FfmpegConfig::from_env().unwrap();
//! audio
//!     .save(&SidecarSpawner, &format, "/tmp/hls/index.m3u8", &config, None)
//!     .unwrap();
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod external;
pub mod filters;
pub mod format;
pub mod media;
pub mod progress;
pub mod timecode;
pub mod utils;

// Re-exports for public API
pub use command::{StreamSelection, TrimWindow, build_command, final_command};
pub use config::{FfmpegConfig, FfmpegConfigBuilder};
pub use error::{CoreError, CoreResult};
pub use external::{
    FfmpegProcess, FfmpegSpawner, MediaSummary, SidecarSpawner, StreamKind, StreamSummary,
    check_dependency, execute, probe,
};
pub use filters::{CustomFilter, Filter, FilterChain, MetadataFilter, ResampleFilter, SimpleFilter};
pub use format::{AudioFormat, Format, M3u8Format};
pub use media::Audio;
pub use progress::{FfmpegProgressHandler, ProgressListener, ProgressUpdate};
pub use timecode::TimeCode;
pub use utils::{format_duration, parse_ffmpeg_time};
