// ffhls-cli/src/commands/info.rs
//
// Prints what ffprobe reports about an input.

use crate::cli::InfoArgs;
use crate::error::CliResult;
use ffhls_core::{CoreError, MediaSummary, StreamKind, check_dependency, format_duration, probe};

/// Human-readable rendering of a probe result.
pub fn render_summary(summary: &MediaSummary) -> String {
    let mut lines = vec![
        format!("Format:   {}", summary.format_name),
        format!(
            "Duration: {}",
            summary
                .duration
                .map_or_else(|| "unknown".to_string(), format_duration)
        ),
    ];
    for stream in &summary.streams {
        let codec = stream.codec.as_deref().unwrap_or("unknown");
        let detail = match stream.kind {
            StreamKind::Audio => stream
                .channels
                .map(|c| format!(", {c} channels"))
                .unwrap_or_default(),
            StreamKind::Video => match (stream.width, stream.height) {
                (Some(w), Some(h)) => format!(", {w}x{h}"),
                _ => String::new(),
            },
            _ => String::new(),
        };
        lines.push(format!(
            "Stream #{}: {:?} ({codec}{detail})",
            stream.index, stream.kind
        ));
    }
    lines.join("\n")
}

/// Runs the `info` command.
pub fn run_info(args: InfoArgs) -> CliResult<()> {
    check_dependency(&args.ffprobe_binary)?;
    let summary = probe(&args.input)?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| CoreError::Probe(format!("failed to serialize summary: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", render_summary(&summary));
    }
    Ok(())
}
