//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command; the
//! helpers here are shared by the commands that run ffmpeg.

/// Module containing the implementation of the `audio` command.
pub mod audio;

/// Module containing the implementation of the `hls` command.
pub mod hls;

/// Module containing the implementation of the `info` command.
pub mod info;

use crate::cli::{ClipArgs, FfmpegArgs};
use crate::error::CliResult;
use crate::progress::ProgressBarListener;
use ffhls_core::{
    Audio, FfmpegConfig, FfmpegConfigBuilder, Format, SidecarSpawner, TrimWindow,
    check_dependency,
};

/// Builds the ffmpeg configuration from the command-line options.
pub(crate) fn ffmpeg_config(args: &FfmpegArgs) -> FfmpegConfig {
    FfmpegConfigBuilder::new()
        .ffmpeg_binary(args.ffmpeg_binary.clone())
        .maybe_threads(args.threads)
        .build()
}

/// Opens the input and applies trim and stream selection options.
pub(crate) fn open_input(input: &str, clip: &ClipArgs) -> CliResult<Audio> {
    let mut audio = Audio::open(input)?;
    audio
        .set_trim_window(TrimWindow::new(clip.start, clip.duration)?)
        .set_only_audio(clip.audio_only)
        .set_only_video(clip.video_only);
    Ok(audio)
}

/// Prints the command for `--dry-run`, or runs it with a progress bar.
pub(crate) fn run_export(
    audio: &Audio,
    format: &dyn Format,
    output: &str,
    config: &FfmpegConfig,
    dry_run: bool,
) -> CliResult<()> {
    if dry_run {
        println!("{}", audio.final_command(format, output, config));
        return Ok(());
    }

    check_dependency(&config.ffmpeg_binary)?;

    let mut listener = ProgressBarListener::new("Encoding");
    match audio.save(&SidecarSpawner, format, output, config, Some(&mut listener)) {
        Ok(()) => {
            listener.finish("Done");
            println!("Wrote {output}");
            Ok(())
        }
        Err(err) => {
            listener.abandon();
            Err(err)
        }
    }
}
