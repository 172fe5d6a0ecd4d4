// ============================================================================
// ffhls-core/src/format/m3u8.rs
// ============================================================================
//
// HLS OUTPUT: M3U8 Playlist and Segment Configuration
//
// M3u8Format describes how ffmpeg's HLS muxer should write a playlist: the
// segment duration, the playlist size, where segments go and how they are
// named, and optionally the AES-128 key-info file used to encrypt them.
//
// KEY COMPONENTS:
// - M3u8Format: the HLS output configuration, implementing Format
// - Key generation: writes `key.key` and `key_info` into the output directory
//
// KEY FILES:
// `key.key` holds the raw 16-character key. `key_info` holds two lines with no
// trailing newline: the key URI written into the playlist (`key.key`) and the
// path ffmpeg reads the key from (`<output_dir>key.key`).
//
// SECURITY:
// The key is drawn by shuffling `0-9a-z` and keeping the first 16 characters.
// That gives 16 distinct characters from a 36-symbol alphabet, far below the
// entropy of a random 128-bit key. It is kept for compatibility with existing
// output; callers protecting valuable content should supply their own
// key-info file through `set_key_info_file_path`.

use super::{AudioSettings, ExtraParams, Format};
use crate::error::{CoreError, CoreResult};

use rand::seq::SliceRandom;
use std::fs;
use std::path::{self, Path};

/// Default segment length in seconds (`-hls_time`).
pub const DEFAULT_SEGMENT_DURATION: i64 = 5;

/// Default playlist size (`-hls_list_size`); 0 keeps every segment.
pub const DEFAULT_SEGMENT_LIST_SIZE: i64 = 0;

/// Default segment file name pattern, rooted in the output directory.
pub const DEFAULT_SEGMENT_PATTERN: &str = "%05d.ts";

/// Key file name, also the key URI written into the playlist.
pub const KEY_FILE_NAME: &str = "key.key";

/// Key-info file name passed to `-hls_key_info_file`.
pub const KEY_INFO_FILE_NAME: &str = "key_info";

/// Length of the generated key in characters.
pub const KEY_LENGTH: usize = 16;

const KEY_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const HLS_TIME: &str = "-hls_time";
const HLS_LIST_SIZE: &str = "-hls_list_size";
const HLS_SEGMENT_FILENAME: &str = "-hls_segment_filename";
const HLS_KEY_INFO_FILE: &str = "-hls_key_info_file";

const AUDIO_CODECS: &[&str] = &["aac"];
const VIDEO_CODECS: &[&str] = &["libx264"];

/// HLS output configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use ffhls_core::format::{Format, M3u8Format};
///
/// let mut format = M3u8Format::create("/srv/hls/movie", true).unwrap();
/// format.set_segment_duration(10);
/// format.set_audio_codec("aac").unwrap();
///
/// assert!(format.key_info_file_path().is_some());
/// let tokens = format.extra_params();
/// assert_eq!(tokens[0], "-hls_time");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct M3u8Format {
    output_dir: String,
    encryption_enabled: bool,
    key_info_file: Option<String>,
    b_frames_support: bool,
    passes: u32,
    audio: AudioSettings,
    params: ExtraParams,
}

impl M3u8Format {
    /// Creates the configuration and its output directory.
    ///
    /// The directory is normalized to end with exactly one separator and is
    /// created recursively when missing. With `auto_encrypt` the key files are
    /// written before this returns.
    pub fn create(output_dir: impl Into<String>, auto_encrypt: bool) -> CoreResult<Self> {
        let output_dir = normalize_dir(&output_dir.into())?;

        if !Path::new(&output_dir).is_dir() {
            log::debug!("Creating HLS output directory {output_dir}");
            create_dir_all_permissive(Path::new(&output_dir))?;
        }

        let mut params = ExtraParams::new();
        params.set(HLS_TIME, DEFAULT_SEGMENT_DURATION);
        params.set(HLS_LIST_SIZE, DEFAULT_SEGMENT_LIST_SIZE);
        params.set(HLS_SEGMENT_FILENAME, "");

        let mut format = Self {
            output_dir,
            encryption_enabled: false,
            key_info_file: None,
            b_frames_support: true,
            passes: 2,
            audio: AudioSettings::default(),
            params,
        };
        let default_pattern = format!("{}{DEFAULT_SEGMENT_PATTERN}", format.output_dir);
        format.set_segment_filename_pattern(default_pattern);

        if auto_encrypt {
            format.generate_encryption_key()?;
        }

        Ok(format)
    }

    /// Output directory, always ending with a separator.
    #[must_use]
    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    /// Sets `-hls_time`. The value is forwarded to ffmpeg unchecked.
    pub fn set_segment_duration(&mut self, seconds: i64) -> &mut Self {
        self.params.set(HLS_TIME, seconds);
        self
    }

    #[must_use]
    pub fn segment_duration(&self) -> Option<i64> {
        self.params.get(HLS_TIME).and_then(|v| v.parse().ok())
    }

    /// Sets `-hls_list_size`; 0 keeps every segment in the playlist.
    pub fn set_segment_list_size(&mut self, size: i64) -> &mut Self {
        self.params.set(HLS_LIST_SIZE, size);
        self
    }

    #[must_use]
    pub fn segment_list_size(&self) -> Option<i64> {
        self.params.get(HLS_LIST_SIZE).and_then(|v| v.parse().ok())
    }

    /// Sets `-hls_segment_filename` verbatim.
    pub fn set_segment_filename_pattern(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.params.set(HLS_SEGMENT_FILENAME, pattern.into());
        self
    }

    #[must_use]
    pub fn segment_filename_pattern(&self) -> &str {
        self.params.get(HLS_SEGMENT_FILENAME).unwrap_or_default()
    }

    /// Uses an existing key-info file for `-hls_key_info_file`.
    ///
    /// Paths that are not regular files are ignored; an accepted path
    /// enables encryption.
    pub fn set_key_info_file_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        let path = path.as_ref();
        if path.is_file() {
            let path = path.to_string_lossy().into_owned();
            self.params.set(HLS_KEY_INFO_FILE, &path);
            self.key_info_file = Some(path);
            self.encryption_enabled = true;
        } else {
            log::debug!(
                "Ignoring key info file {}: not a regular file",
                path.display()
            );
        }
        self
    }

    #[must_use]
    pub fn key_info_file_path(&self) -> Option<&str> {
        self.key_info_file.as_deref()
    }

    #[must_use]
    pub fn is_encryption_enabled(&self) -> bool {
        self.encryption_enabled
    }

    /// Generates a key, writes `key.key` and `key_info`, and registers the
    /// key-info file. Returns the key.
    ///
    /// Files already written are left in place if a later write fails.
    pub fn generate_encryption_key(&mut self) -> CoreResult<String> {
        let mut alphabet = KEY_ALPHABET.to_vec();
        alphabet.shuffle(&mut rand::thread_rng());
        alphabet.truncate(KEY_LENGTH);
        let key: String = alphabet.into_iter().map(char::from).collect();

        let key_path = format!("{}{KEY_FILE_NAME}", self.output_dir);
        fs::write(&key_path, key.as_bytes())?;

        let key_info_path = format!("{}{KEY_INFO_FILE_NAME}", self.output_dir);
        fs::write(&key_info_path, format!("{KEY_FILE_NAME}\n{key_path}"))?;

        log::info!("Generated HLS encryption key in {}", self.output_dir);
        self.encryption_enabled = true;
        self.set_key_info_file_path(&key_info_path);
        Ok(key)
    }

    #[must_use]
    pub fn supports_b_frames(&self) -> bool {
        self.b_frames_support
    }

    pub fn set_b_frames_support(&mut self, support: bool) -> &mut Self {
        self.b_frames_support = support;
        self
    }

    /// Frame-group modulus. Always 2; the B-frame flag is not consulted.
    #[must_use]
    pub fn modulus(&self) -> u32 {
        2
    }

    pub fn set_passes(&mut self, passes: u32) -> &mut Self {
        self.passes = passes;
        self
    }

    pub fn set_audio_codec(&mut self, codec: &str) -> CoreResult<&mut Self> {
        self.audio.set_codec(codec, AUDIO_CODECS)?;
        Ok(self)
    }

    pub fn set_audio_kilobitrate(&mut self, kilobitrate: u32) -> CoreResult<&mut Self> {
        self.audio.set_kilobitrate(kilobitrate)?;
        Ok(self)
    }

    pub fn set_audio_channels(&mut self, channels: u32) -> CoreResult<&mut Self> {
        self.audio.set_channels(channels)?;
        Ok(self)
    }
}

impl Format for M3u8Format {
    fn extra_params(&self) -> Vec<String> {
        self.params.flatten()
    }

    fn audio_codec(&self) -> Option<&str> {
        self.audio.codec()
    }

    fn audio_kilobitrate(&self) -> Option<u32> {
        self.audio.kilobitrate()
    }

    fn audio_channels(&self) -> Option<u32> {
        self.audio.channels()
    }

    fn available_audio_codecs(&self) -> &[&'static str] {
        AUDIO_CODECS
    }

    fn available_video_codecs(&self) -> &[&'static str] {
        VIDEO_CODECS
    }

    fn passes(&self) -> u32 {
        self.passes
    }

    fn supports_b_frames(&self) -> bool {
        self.b_frames_support
    }

    fn modulus(&self) -> u32 {
        M3u8Format::modulus(self)
    }
}

/// Appends a separator to `dir`, collapsing any run of trailing separators.
fn normalize_dir(dir: &str) -> CoreResult<String> {
    if dir.is_empty() {
        return Err(CoreError::InvalidArgument(
            "HLS output directory must not be empty".to_string(),
        ));
    }
    let trimmed = dir.trim_end_matches(path::is_separator);
    Ok(format!("{trimmed}{}", path::MAIN_SEPARATOR))
}

#[cfg(unix)]
fn create_dir_all_permissive(dir: &Path) -> CoreResult<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o777).create(dir)?;
    Ok(())
}

#[cfg(not(unix))]
fn create_dir_all_permissive(dir: &Path) -> CoreResult<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::AudioFormat;
    use tempfile::tempdir;

    fn dir_string(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_normalize_dir() {
        let sep = path::MAIN_SEPARATOR;
        assert_eq!(normalize_dir("/tmp/hls").unwrap(), format!("/tmp/hls{sep}"));
        assert_eq!(normalize_dir("/tmp/hls/").unwrap(), format!("/tmp/hls{sep}"));
        assert_eq!(normalize_dir("/tmp/hls//").unwrap(), format!("/tmp/hls{sep}"));
        assert_eq!(normalize_dir("/").unwrap(), sep.to_string());
        assert!(normalize_dir("").is_err());
    }

    #[test]
    fn test_create_makes_nested_directory() {
        let tmp = tempdir().unwrap();
        let nested = tmp.path().join("a").join("b").join("c");

        let format = M3u8Format::create(dir_string(&nested), false).unwrap();

        assert!(nested.is_dir());
        assert!(format.output_dir().ends_with(path::MAIN_SEPARATOR));
        assert!(!format.is_encryption_enabled());
        assert_eq!(format.key_info_file_path(), None);
    }

    #[test]
    fn test_defaults() {
        let tmp = tempdir().unwrap();
        let format = M3u8Format::create(dir_string(tmp.path()), false).unwrap();
        let dir = format.output_dir().to_string();

        assert_eq!(format.segment_duration(), Some(5));
        assert_eq!(format.segment_list_size(), Some(0));
        assert_eq!(format.segment_filename_pattern(), format!("{dir}%05d.ts"));
        assert!(format.supports_b_frames());
        assert_eq!(format.passes(), 2);
        assert_eq!(format.modulus(), 2);
        assert_eq!(format.audio_codec(), None);
        assert_eq!(format.audio_kilobitrate(), Some(128));
        assert_eq!(format.audio_channels(), None);
        assert_eq!(format.available_audio_codecs(), &["aac"]);
        assert_eq!(format.available_video_codecs(), &["libx264"]);
        assert_eq!(
            format.extra_params(),
            vec![
                "-hls_time".to_string(),
                "5".to_string(),
                "-hls_list_size".to_string(),
                "0".to_string(),
                "-hls_segment_filename".to_string(),
                format!("{dir}%05d.ts"),
            ]
        );
    }

    #[test]
    fn test_setters_are_verbatim() {
        let tmp = tempdir().unwrap();
        let mut format = M3u8Format::create(dir_string(tmp.path()), false).unwrap();

        format
            .set_segment_duration(-3)
            .set_segment_list_size(6)
            .set_segment_filename_pattern("segments/%04d.ts");

        assert_eq!(format.segment_duration(), Some(-3));
        assert_eq!(format.segment_list_size(), Some(6));
        assert_eq!(format.segment_filename_pattern(), "segments/%04d.ts");
        // Replaced values keep their original position
        assert_eq!(&format.extra_params()[..2], &["-hls_time", "-3"]);
    }

    #[test]
    fn test_missing_key_info_file_is_ignored() {
        let tmp = tempdir().unwrap();
        let mut format = M3u8Format::create(dir_string(tmp.path()), false).unwrap();

        format.set_key_info_file_path(tmp.path().join("does_not_exist"));
        format.set_key_info_file_path(tmp.path());

        assert_eq!(format.key_info_file_path(), None);
        assert!(!format.is_encryption_enabled());
        assert!(!format.extra_params().contains(&"-hls_key_info_file".to_string()));
    }

    #[test]
    fn test_existing_key_info_file_is_used() {
        let tmp = tempdir().unwrap();
        let info = tmp.path().join("custom_info");
        fs::write(&info, "k\n/k").unwrap();
        let mut format = M3u8Format::create(dir_string(tmp.path()), false).unwrap();

        format.set_key_info_file_path(&info);

        assert!(format.is_encryption_enabled());
        let tokens = format.extra_params();
        assert_eq!(tokens[tokens.len() - 2], "-hls_key_info_file");
        assert_eq!(tokens[tokens.len() - 1], dir_string(&info));
    }

    #[test]
    fn test_generated_key_files() {
        let tmp = tempdir().unwrap();
        let mut format = M3u8Format::create(dir_string(tmp.path()), false).unwrap();
        let dir = format.output_dir().to_string();

        let key = format.generate_encryption_key().unwrap();

        assert_eq!(key.len(), KEY_LENGTH);
        assert!(key.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
        let mut unique: Vec<u8> = key.bytes().collect();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), KEY_LENGTH, "shuffled alphabet never repeats");

        let written = fs::read_to_string(format!("{dir}key.key")).unwrap();
        assert_eq!(written, key);

        let info = fs::read_to_string(format!("{dir}key_info")).unwrap();
        assert_eq!(info, format!("key.key\n{dir}key.key"));
        let lines: Vec<&str> = info.lines().collect();
        assert_eq!(lines, vec!["key.key".to_string(), format!("{dir}key.key")]);

        assert!(format.is_encryption_enabled());
        assert_eq!(format.key_info_file_path(), Some(format!("{dir}key_info").as_str()));
    }

    #[test]
    fn test_auto_encrypt_appends_key_info_last() {
        let tmp = tempdir().unwrap();
        let format = M3u8Format::create(dir_string(tmp.path()), true).unwrap();
        let dir = format.output_dir().to_string();

        assert!(Path::new(&format!("{dir}key.key")).is_file());
        let tokens = format.extra_params();
        let flags: Vec<&str> = tokens.iter().step_by(2).map(String::as_str).collect();
        assert_eq!(
            flags,
            vec![
                "-hls_time",
                "-hls_list_size",
                "-hls_segment_filename",
                "-hls_key_info_file"
            ]
        );
        assert_eq!(tokens.last().unwrap(), &format!("{dir}key_info"));
    }

    #[test]
    fn test_b_frames_flag_does_not_change_modulus() {
        let tmp = tempdir().unwrap();
        let mut format = M3u8Format::create(dir_string(tmp.path()), false).unwrap();

        format.set_b_frames_support(false).set_passes(1);

        assert!(!format.supports_b_frames());
        assert_eq!(format.modulus(), 2);
        assert_eq!(format.passes(), 1);
    }

    #[test]
    fn test_frame_settings_through_format_trait() {
        let tmp = tempdir().unwrap();
        let mut format = M3u8Format::create(dir_string(tmp.path()), false).unwrap();
        let mp3 = AudioFormat::mp3();

        let dynamic: &dyn Format = &format;
        assert!(dynamic.supports_b_frames());
        assert_eq!(dynamic.modulus(), 2);

        format.set_b_frames_support(false);
        let dynamic: &dyn Format = &format;
        assert!(!dynamic.supports_b_frames());

        let audio_only: &dyn Format = &mp3;
        assert!(!audio_only.supports_b_frames());
        assert_eq!(audio_only.modulus(), 2);
        assert_eq!(audio_only.passes(), 1);
    }

    #[test]
    fn test_audio_codec_restricted_to_aac() {
        let tmp = tempdir().unwrap();
        let mut format = M3u8Format::create(dir_string(tmp.path()), false).unwrap();

        assert!(matches!(
            format.set_audio_codec("libmp3lame"),
            Err(CoreError::InvalidArgument(_))
        ));
        format.set_audio_codec("aac").unwrap().set_audio_channels(2).unwrap();
        assert_eq!(format.audio_codec(), Some("aac"));
        assert_eq!(format.audio_channels(), Some(2));
    }
}
