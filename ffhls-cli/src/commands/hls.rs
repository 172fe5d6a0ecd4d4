// ============================================================================
// ffhls-cli/src/commands/hls.rs
// ============================================================================
//
// HLS COMMAND: Package an Input into an M3U8 Playlist
//
// Creates the output directory (and a key when --encrypt is given), applies
// the segment and codec options to an M3u8Format and runs or prints the
// resulting ffmpeg command.

use crate::cli::HlsArgs;
use crate::commands::{ffmpeg_config, open_input, run_export};
use crate::error::CliResult;
use ffhls_core::M3u8Format;

/// Builds the HLS format described by the command-line options.
///
/// The output directory is created, and key files are written when
/// encryption is requested, even for a dry run.
pub fn build_format(args: &HlsArgs) -> CliResult<M3u8Format> {
    let mut format = M3u8Format::create(args.output_dir.as_str(), args.encrypt)?;
    format
        .set_segment_duration(args.segment_duration)
        .set_segment_list_size(args.segment_list_size);
    if let Some(pattern) = &args.segment_pattern {
        format.set_segment_filename_pattern(pattern.as_str());
    }
    if let Some(key_info) = &args.key_info_file {
        format.set_key_info_file_path(key_info);
        if format.key_info_file_path().is_none() {
            log::warn!(
                "Key info file {} not found; segments will not be encrypted",
                key_info.display()
            );
        }
    }

    let codec = &args.codec;
    if let Some(name) = &codec.audio_codec {
        format.set_audio_codec(name)?;
    }
    if let Some(kilobitrate) = codec.audio_bitrate {
        format.set_audio_kilobitrate(kilobitrate)?;
    }
    if let Some(channels) = codec.audio_channels {
        format.set_audio_channels(channels)?;
    }
    Ok(format)
}

/// Runs the `hls` command.
pub fn run_hls(args: HlsArgs) -> CliResult<()> {
    let config = ffmpeg_config(&args.ffmpeg);
    let audio = open_input(&args.input, &args.clip)?;
    let format = build_format(&args)?;
    let output = format!("{}{}", format.output_dir(), args.playlist);

    log::info!(
        "Packaging {} into {} ({}s segments{})",
        args.input,
        output,
        args.segment_duration,
        if format.key_info_file_path().is_some() { ", encrypted" } else { "" }
    );
    run_export(&audio, &format, &output, &config, args.ffmpeg.dry_run)
}
