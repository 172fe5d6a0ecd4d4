// ffhls-cli/src/commands/audio.rs
//
// Exports the audio of an input to a single file with one of the AudioFormat
// presets.

use crate::cli::AudioArgs;
use crate::commands::{ffmpeg_config, open_input, run_export};
use crate::error::CliResult;
use ffhls_core::{AudioFormat, CoreError, CustomFilter, MetadataFilter, ResampleFilter};

/// Splits a `KEY=VALUE` metadata argument.
fn parse_metadata(entry: &str) -> CliResult<(&str, &str)> {
    match entry.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(CoreError::InvalidArgument(format!(
            "metadata must be KEY=VALUE, got '{entry}'"
        ))),
    }
}

/// Runs the `audio` command.
pub fn run_audio(args: AudioArgs) -> CliResult<()> {
    let config = ffmpeg_config(&args.ffmpeg);

    let mut format = AudioFormat::by_name(&args.format)?;
    if let Some(codec) = &args.codec.audio_codec {
        format.set_audio_codec(codec)?;
    }
    if let Some(kilobitrate) = args.codec.audio_bitrate {
        format.set_audio_kilobitrate(kilobitrate)?;
    }
    if let Some(channels) = args.codec.audio_channels {
        format.set_audio_channels(channels)?;
    }

    let mut audio = open_input(&args.input, &args.clip)?;
    if let Some(rate) = args.sample_rate {
        audio.add_filter(ResampleFilter::new(rate));
    }
    if let Some(filter) = &args.filter {
        audio.add_filter(CustomFilter::new(filter.as_str()));
    }
    if !args.metadata.is_empty() {
        let mut metadata = MetadataFilter::new();
        for entry in &args.metadata {
            let (key, value) = parse_metadata(entry)?;
            metadata = metadata.with(key, value);
        }
        audio.add_filter(metadata);
    }

    log::info!("Exporting {} as {} to {}", args.input, format.name(), args.output);
    run_export(&audio, &format, &args.output, &config, args.ffmpeg.dry_run)
}
