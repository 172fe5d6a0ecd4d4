// ffhls-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use ffhls_core::TimeCode;
use ffhls_core::config::{
    DEFAULT_FFMPEG_BINARY, DEFAULT_FFPROBE_BINARY, ENV_FFMPEG_BINARY, ENV_FFPROBE_BINARY,
    ENV_THREADS,
};
use ffhls_core::format::m3u8::{DEFAULT_SEGMENT_DURATION, DEFAULT_SEGMENT_LIST_SIZE};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "ffhls: HLS packaging and audio export with ffmpeg",
    long_about = "Builds ffmpeg command lines for HLS (M3U8) packaging and audio exports, \
                  optionally trimmed and encrypted, and runs them with progress reporting."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Packages an input into an HLS playlist with fixed-length segments
    Hls(HlsArgs),
    /// Exports the audio of an input to a single file
    Audio(AudioArgs),
    /// Shows duration and streams of an input using ffprobe
    Info(InfoArgs),
}

/// Options shared by every command that runs ffmpeg.
#[derive(Args, Debug, Clone)]
pub struct FfmpegArgs {
    /// ffmpeg binary to run
    #[arg(long = "ffmpeg", value_name = "PATH", env = ENV_FFMPEG_BINARY, default_value = DEFAULT_FFMPEG_BINARY)]
    pub ffmpeg_binary: PathBuf,

    /// Number of threads ffmpeg may use (ffmpeg decides when omitted)
    #[arg(long, value_name = "COUNT", env = ENV_THREADS, value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: Option<u32>,

    /// Print the ffmpeg command line instead of running it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Trim and stream selection options.
#[derive(Args, Debug, Clone)]
pub struct ClipArgs {
    /// Start position (HH:MM:SS[.cc], MM:SS or seconds)
    #[arg(long, value_name = "TIME")]
    pub start: Option<TimeCode>,

    /// Clip length; requires --start
    #[arg(long, value_name = "TIME")]
    pub duration: Option<TimeCode>,

    /// Drop video streams
    #[arg(long, default_value_t = false)]
    pub audio_only: bool,

    /// Drop audio streams
    #[arg(long, default_value_t = false)]
    pub video_only: bool,
}

/// Audio encoder settings.
#[derive(Args, Debug, Clone)]
pub struct AudioCodecArgs {
    /// Audio codec; must be one the output format accepts
    #[arg(long, value_name = "CODEC")]
    pub audio_codec: Option<String>,

    /// Audio bitrate in kbit/s
    #[arg(long, value_name = "KBPS")]
    pub audio_bitrate: Option<u32>,

    /// Number of audio channels
    #[arg(long, value_name = "COUNT")]
    pub audio_channels: Option<u32>,
}

#[derive(Parser, Debug)]
pub struct HlsArgs {
    /// Input media file
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT")]
    pub input: String,

    /// Directory receiving the playlist and segments (created if missing)
    #[arg(short = 'o', long = "output", required = true, value_name = "OUTPUT_DIR")]
    pub output_dir: String,

    /// Playlist file name inside the output directory
    #[arg(long, value_name = "NAME", default_value = "index.m3u8")]
    pub playlist: String,

    /// Target segment length in seconds
    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = DEFAULT_SEGMENT_DURATION,
        allow_negative_numbers = true
    )]
    pub segment_duration: i64,

    /// Maximum playlist entries (0 keeps all)
    #[arg(
        long,
        value_name = "COUNT",
        default_value_t = DEFAULT_SEGMENT_LIST_SIZE,
        allow_negative_numbers = true
    )]
    pub segment_list_size: i64,

    /// Segment file name pattern, used verbatim (defaults to OUTPUT_DIR/%05d.ts)
    #[arg(long, value_name = "PATTERN")]
    pub segment_pattern: Option<String>,

    /// Generate an AES-128 key in the output directory and encrypt segments
    #[arg(long, default_value_t = false, conflicts_with = "key_info_file")]
    pub encrypt: bool,

    /// Use an existing key-info file for encryption
    #[arg(long, value_name = "PATH")]
    pub key_info_file: Option<PathBuf>,

    #[command(flatten)]
    pub clip: ClipArgs,

    #[command(flatten)]
    pub codec: AudioCodecArgs,

    #[command(flatten)]
    pub ffmpeg: FfmpegArgs,
}

#[derive(Parser, Debug)]
pub struct AudioArgs {
    /// Input media file
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT")]
    pub input: String,

    /// Output file
    #[arg(short = 'o', long = "output", required = true, value_name = "OUTPUT")]
    pub output: String,

    /// Output format preset: mp3, aac, flac, wav or vorbis
    #[arg(short = 'f', long, value_name = "FORMAT", default_value = "mp3")]
    pub format: String,

    /// Resample to this rate in Hz
    #[arg(long, value_name = "HZ")]
    pub sample_rate: Option<u32>,

    /// Raw ffmpeg audio filter graph (passed via -af)
    #[arg(long, value_name = "FILTER")]
    pub filter: Option<String>,

    /// Metadata entry to write, may be repeated
    #[arg(long = "metadata", value_name = "KEY=VALUE")]
    pub metadata: Vec<String>,

    #[command(flatten)]
    pub clip: ClipArgs,

    #[command(flatten)]
    pub codec: AudioCodecArgs,

    #[command(flatten)]
    pub ffmpeg: FfmpegArgs,
}

#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Input media file
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// ffprobe binary checked before probing
    #[arg(long = "ffprobe", value_name = "PATH", env = ENV_FFPROBE_BINARY, default_value = DEFAULT_FFPROBE_BINARY)]
    pub ffprobe_binary: PathBuf,
}
