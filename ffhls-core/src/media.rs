// ============================================================================
// ffhls-core/src/media.rs
// ============================================================================
//
// MEDIA: An Input File and the Edits Applied to It
//
// `Audio` ties a source path to the state an export needs: the filter chain,
// the trim window and the stream selection. It builds the ffmpeg command for
// a given output format and, through a spawner, runs it.
//
// KEY COMPONENTS:
// - Audio: source path plus filters, trim window and stream selection
// - save: runs the export and removes partial output on failure

use crate::command::{StreamSelection, TrimWindow, build_command, final_command};
use crate::config::FfmpegConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, execute_with_handler};
use crate::filters::{Filter, FilterChain};
use crate::format::Format;
use crate::progress::{FfmpegProgressHandler, ProgressListener};
use crate::timecode::TimeCode;
use crate::utils::{cleanup_partial_output, format_duration};
use std::path::Path;
use std::time::Instant;

/// An audio (or audio/video) input opened for export.
#[derive(Debug, Clone)]
pub struct Audio {
    source: String,
    filters: FilterChain,
    trim: TrimWindow,
    selection: StreamSelection,
}

impl Audio {
    /// Opens `source` for export. Nothing is read until the export runs.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` for an empty path.
    pub fn open(source: impl Into<String>) -> CoreResult<Self> {
        let source = source.into();
        if source.trim().is_empty() {
            return Err(CoreError::InvalidArgument(
                "source path must not be empty".to_string(),
            ));
        }
        Ok(Self {
            source,
            filters: FilterChain::new(),
            trim: TrimWindow::none(),
            selection: StreamSelection::default(),
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn add_filter<F: Filter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.add(filter);
        self
    }

    #[must_use]
    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    /// Keeps only the part of the input starting at `start`, optionally
    /// limited to `duration`.
    pub fn clip(&mut self, start: TimeCode, duration: Option<TimeCode>) -> &mut Self {
        self.trim = match duration {
            Some(duration) => TrimWindow::clip(start, duration),
            None => TrimWindow::starting_at(start),
        };
        self
    }

    pub fn set_trim_window(&mut self, trim: TrimWindow) -> &mut Self {
        self.trim = trim;
        self
    }

    #[must_use]
    pub fn trim_window(&self) -> &TrimWindow {
        &self.trim
    }

    /// Drops the video streams, unless video-only is set too.
    pub fn set_only_audio(&mut self, only_audio: bool) -> &mut Self {
        self.selection.audio_only = only_audio;
        self
    }

    /// Drops the audio streams, unless audio-only is set too.
    pub fn set_only_video(&mut self, only_video: bool) -> &mut Self {
        self.selection.video_only = only_video;
        self
    }

    #[must_use]
    pub fn stream_selection(&self) -> StreamSelection {
        self.selection
    }

    /// The ffmpeg argument list exporting this input to `output`.
    #[must_use]
    pub fn build_command(
        &self,
        format: &dyn Format,
        output: &str,
        config: &FfmpegConfig,
    ) -> Vec<String> {
        build_command(
            format,
            &self.source,
            &self.trim,
            &self.selection,
            &self.filters,
            config,
            output,
        )
    }

    /// The command line for display: binary followed by the arguments.
    #[must_use]
    pub fn final_command(&self, format: &dyn Format, output: &str, config: &FfmpegConfig) -> String {
        let tokens = self.build_command(format, output, config);
        format!(
            "{} {}",
            config.ffmpeg_binary.display(),
            final_command(&tokens)
        )
    }

    /// Exports this input to `output` in `format`.
    ///
    /// Progress is measured against the clip length when one is set and
    /// against the input duration reported by ffmpeg otherwise.
    ///
    /// # Errors
    ///
    /// On any failure the partially written `output` is removed and
    /// `CoreError::EncodingFailed` is returned with the process exit code (if
    /// any) and its error output.
    pub fn save<S: FfmpegSpawner>(
        &self,
        spawner: &S,
        format: &dyn Format,
        output: &str,
        config: &FfmpegConfig,
        listener: Option<&mut dyn ProgressListener>,
    ) -> CoreResult<()> {
        let tokens = self.build_command(format, output, config);
        let total_secs = self.trim.duration().map(|d| d.as_seconds());
        let offset_secs = self.trim.start().map_or(0.0, |s| s.as_seconds());
        let handler = FfmpegProgressHandler::new(total_secs, offset_secs, listener);

        log::info!("Encoding {} -> {}", self.source, output);
        let started = Instant::now();

        match execute_with_handler(spawner, config, &tokens, handler) {
            Ok(_) => {
                log::info!(
                    "Finished {} in {}",
                    output,
                    format_duration(started.elapsed().as_secs_f64())
                );
                Ok(())
            }
            Err(err) => {
                cleanup_partial_output(Path::new(output));
                let message = match &err {
                    CoreError::CommandFailed { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                Err(CoreError::EncodingFailed {
                    code: err.exit_code(),
                    message,
                    source: Some(Box::new(err)),
                })
            }
        }
    }
}
