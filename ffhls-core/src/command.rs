//! FFmpeg command-line assembly.
//!
//! [`build_command`] turns a source, an optional trim window, a filter chain
//! and an output [`Format`] into the ordered argument list handed to ffmpeg.
//! Building is pure: nothing is spawned and nothing touches the filesystem.
//!
//! Token layout:
//!
//! ```text
//! -y -i <source> [-ss <start>] [-t <duration>]
//!    <filter stages, ascending priority>
//!    [-b:a <n>k] [-ac <n>] [-vn | -an] <output>
//! ```

use crate::config::FfmpegConfig;
use crate::error::{CoreError, CoreResult};
use crate::filters::{FORMAT_PARAMS_PRIORITY, FilterChain, SimpleFilter};
use crate::format::Format;
use crate::timecode::TimeCode;

/// Optional seek point and clip length applied to the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimWindow {
    start: Option<TimeCode>,
    duration: Option<TimeCode>,
}

impl TrimWindow {
    /// Creates a window. A duration without a start is rejected.
    pub fn new(start: Option<TimeCode>, duration: Option<TimeCode>) -> CoreResult<Self> {
        if start.is_none() && duration.is_some() {
            return Err(CoreError::InvalidTrimWindow(
                "a clip duration requires a start time".to_string(),
            ));
        }
        Ok(Self { start, duration })
    }

    /// A window that keeps the whole input.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn starting_at(start: TimeCode) -> Self {
        Self {
            start: Some(start),
            duration: None,
        }
    }

    #[must_use]
    pub fn clip(start: TimeCode, duration: TimeCode) -> Self {
        Self {
            start: Some(start),
            duration: Some(duration),
        }
    }

    #[must_use]
    pub fn start(&self) -> Option<TimeCode> {
        self.start
    }

    #[must_use]
    pub fn duration(&self) -> Option<TimeCode> {
        self.duration
    }

    fn tokens(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        if let Some(start) = self.start {
            tokens.push("-ss".to_string());
            tokens.push(start.to_string());
        }
        if let Some(duration) = self.duration {
            tokens.push("-t".to_string());
            tokens.push(duration.to_string());
        }
        tokens
    }
}

/// Which streams to keep in the output.
///
/// A stream is dropped only when exactly one side asks for exclusivity:
/// `audio_only` drops video (`-vn`), `video_only` drops audio (`-an`), and
/// setting both (or neither) keeps everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSelection {
    pub audio_only: bool,
    pub video_only: bool,
}

impl StreamSelection {
    #[must_use]
    pub fn new(audio_only: bool, video_only: bool) -> Self {
        Self {
            audio_only,
            video_only,
        }
    }

    fn tokens(&self) -> Vec<String> {
        if self.audio_only == self.video_only {
            return Vec::new();
        }
        if self.audio_only {
            vec!["-vn".to_string()]
        } else {
            vec!["-an".to_string()]
        }
    }
}

/// Builds the complete ffmpeg argument list for one export.
///
/// `filters` is cloned; the format's extra parameters, the thread count and
/// the audio codec are added to the copy as additional stages.
#[must_use]
pub fn build_command(
    format: &dyn Format,
    source: &str,
    trim: &TrimWindow,
    selection: &StreamSelection,
    filters: &FilterChain,
    config: &FfmpegConfig,
    output: &str,
) -> Vec<String> {
    let mut commands = vec!["-y".to_string(), "-i".to_string(), source.to_string()];
    commands.extend(trim.tokens());

    let mut filters = filters.clone();
    filters.add(SimpleFilter::with_priority(
        format.extra_params(),
        FORMAT_PARAMS_PRIORITY,
    ));
    if let Some(threads) = config.threads {
        filters.add(SimpleFilter::new(["-threads".to_string(), threads.to_string()]));
    }
    if let Some(codec) = format.audio_codec() {
        filters.add(SimpleFilter::new(["-acodec", codec]));
    }

    commands.extend(filters.apply(format));

    if let Some(kilobitrate) = format.audio_kilobitrate() {
        commands.push("-b:a".to_string());
        commands.push(format!("{kilobitrate}k"));
    }
    if let Some(channels) = format.audio_channels() {
        commands.push("-ac".to_string());
        commands.push(channels.to_string());
    }

    commands.extend(selection.tokens());
    commands.push(output.to_string());

    log::debug!("Built ffmpeg command: {}", commands.join(" "));
    commands
}

/// Joins a token list with single spaces, for display and debugging.
#[must_use]
pub fn final_command(tokens: &[String]) -> String {
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FfmpegConfigBuilder;
    use crate::filters::ResampleFilter;
    use crate::format::{AudioFormat, M3u8Format};

    fn position(tokens: &[String], token: &str) -> Option<usize> {
        tokens.iter().position(|t| t == token)
    }

    fn value_after<'a>(tokens: &'a [String], flag: &str) -> Option<&'a str> {
        position(tokens, flag).and_then(|i| tokens.get(i + 1)).map(String::as_str)
    }

    fn build(format: &dyn Format, trim: TrimWindow, selection: StreamSelection) -> Vec<String> {
        build_command(
            format,
            "in.mp4",
            &trim,
            &selection,
            &FilterChain::new(),
            &FfmpegConfig::default(),
            "out.mp3",
        )
    }

    #[test]
    fn test_trim_window_rejects_duration_without_start() {
        let duration = TimeCode::from_seconds(10.0).unwrap();
        assert!(matches!(
            TrimWindow::new(None, Some(duration)),
            Err(CoreError::InvalidTrimWindow(_))
        ));
        assert!(TrimWindow::new(None, None).is_ok());
        assert!(TrimWindow::new(Some(duration), None).is_ok());
    }

    #[test]
    fn test_base_tokens_and_output_last() {
        let tokens = build(&AudioFormat::mp3(), TrimWindow::none(), StreamSelection::default());
        assert_eq!(&tokens[..3], &["-y", "-i", "in.mp4"]);
        assert_eq!(tokens.last().unwrap(), "out.mp3");
        assert!(position(&tokens, "-ss").is_none());
        assert!(position(&tokens, "-t").is_none());
    }

    #[test]
    fn test_start_only_emits_seek() {
        let start = TimeCode::from_seconds(30.0).unwrap();
        let tokens = build(
            &AudioFormat::mp3(),
            TrimWindow::starting_at(start),
            StreamSelection::default(),
        );
        assert_eq!(&tokens[3..5], &["-ss", "00:00:30.00"]);
        assert!(position(&tokens, "-t").is_none());
    }

    #[test]
    fn test_start_and_duration_precede_filters() {
        let trim = TrimWindow::clip(
            TimeCode::from_seconds(30.0).unwrap(),
            TimeCode::from_seconds(60.0).unwrap(),
        );
        let mut filters = FilterChain::new();
        filters.add(ResampleFilter::new(44100));

        let tokens = build_command(
            &AudioFormat::mp3(),
            "in.mp4",
            &trim,
            &StreamSelection::default(),
            &filters,
            &FfmpegConfig::default(),
            "out.mp3",
        );

        assert_eq!(
            &tokens[..9],
            &["-y", "-i", "in.mp4", "-ss", "00:00:30.00", "-t", "00:01:00.00", "-ar", "44100"]
        );
    }

    #[test]
    fn test_stream_selection_policy() {
        let format = AudioFormat::mp3();
        let cases = [
            (false, false, None),
            (true, true, None),
            (true, false, Some("-vn")),
            (false, true, Some("-an")),
        ];
        for (audio_only, video_only, expected) in cases {
            let tokens = build(
                &format,
                TrimWindow::none(),
                StreamSelection::new(audio_only, video_only),
            );
            let before_output = &tokens[tokens.len() - 2];
            let has_vn = position(&tokens, "-vn").is_some();
            let has_an = position(&tokens, "-an").is_some();
            match expected {
                Some(flag) => {
                    assert_eq!(before_output, flag);
                    assert_eq!(has_vn as u8 + has_an as u8, 1);
                }
                None => assert!(!has_vn && !has_an, "{audio_only}/{video_only}"),
            }
        }
    }

    #[test]
    fn test_audio_settings_follow_filters() {
        let mut format = AudioFormat::mp3();
        format.set_audio_kilobitrate(256).unwrap().set_audio_channels(2).unwrap();
        let config = FfmpegConfigBuilder::new().threads(12).build();

        let tokens = build_command(
            &format,
            "in.wav",
            &TrimWindow::none(),
            &StreamSelection::default(),
            &FilterChain::new(),
            &config,
            "out.mp3",
        );

        assert_eq!(
            tokens,
            vec![
                "-y", "-i", "in.wav", "-threads", "12", "-acodec", "libmp3lame", "-b:a",
                "256k", "-ac", "2", "out.mp3"
            ]
        );
    }

    #[test]
    fn test_format_params_come_after_default_priority_stages() {
        let format = AudioFormat::vorbis();
        let mut filters = FilterChain::new();
        filters.add(ResampleFilter::new(48000));

        let tokens = build_command(
            &format,
            "in.flac",
            &TrimWindow::none(),
            &StreamSelection::default(),
            &filters,
            &FfmpegConfigBuilder::new().threads(2).build(),
            "out.ogg",
        );

        let resample = position(&tokens, "-ar").unwrap();
        let threads = position(&tokens, "-threads").unwrap();
        let codec = position(&tokens, "-acodec").unwrap();
        let strict = position(&tokens, "-strict").unwrap();
        assert!(resample < threads && threads < codec && codec < strict);
        assert!(strict < position(&tokens, "-b:a").unwrap());
    }

    #[test]
    fn test_hls_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("hls");
        let dir = dir.to_string_lossy().into_owned();
        let pattern = format!("{dir}/%04d.ts");
        let output = format!("{dir}/out.m3u8");

        let mut format = M3u8Format::create(dir.clone(), false).unwrap();
        format
            .set_segment_duration(10)
            .set_segment_filename_pattern(pattern.clone());

        let tokens = build_command(
            &format,
            "in.mp4",
            &TrimWindow::none(),
            &StreamSelection::default(),
            &FilterChain::new(),
            &FfmpegConfig::default(),
            &output,
        );

        assert_eq!(&tokens[..3], &["-y", "-i", "in.mp4"]);
        assert_eq!(value_after(&tokens, "-hls_time"), Some("10"));
        assert_eq!(value_after(&tokens, "-hls_list_size"), Some("0"));
        assert_eq!(value_after(&tokens, "-hls_segment_filename"), Some(pattern.as_str()));
        assert_eq!(value_after(&tokens, "-b:a"), Some("128k"));
        assert!(position(&tokens, "-acodec").is_none());
        assert_eq!(tokens.last().unwrap(), &output);
    }

    #[test]
    fn test_final_command_joins_tokens() {
        let tokens = vec!["-y".to_string(), "-i".to_string(), "a b.mp4".to_string()];
        assert_eq!(final_command(&tokens), "-y -i a b.mp4");
    }
}
