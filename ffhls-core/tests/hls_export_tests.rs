// ffhls-core/tests/hls_export_tests.rs
#![cfg(all(unix, feature = "test-mocks"))]

use ffhls_core::config::FfmpegConfigBuilder;
use ffhls_core::external::mocks::MockFfmpegSpawner;
use ffhls_core::filters::MetadataFilter;
use ffhls_core::format::m3u8::{KEY_FILE_NAME, KEY_INFO_FILE_NAME, KEY_LENGTH};
use ffhls_core::{Audio, M3u8Format, ProgressUpdate, TimeCode};
use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress};
use std::fs;
use tempfile::tempdir;

fn progress(time: &str) -> FfmpegEvent {
    FfmpegEvent::Progress(FfmpegProgress {
        frame: 0,
        fps: 0.0,
        q: 0.0,
        size_kb: 256,
        time: time.to_string(),
        bitrate_kbps: 128.0,
        speed: 4.0,
        raw_log_message: String::new(),
    })
}

fn value_after<'a>(tokens: &'a [String], flag: &str) -> Option<&'a str> {
    tokens
        .iter()
        .position(|t| t == flag)
        .and_then(|i| tokens.get(i + 1))
        .map(String::as_str)
}

#[test]
fn test_encrypted_hls_export_runs_expected_command() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let dir = tmp.path().join("stream");
    let dir_str = dir.to_string_lossy().into_owned();

    let mut format = M3u8Format::create(dir_str.clone(), true)?;
    format.set_segment_duration(6).set_segment_list_size(5);
    let output = format!("{}index.m3u8", format.output_dir());

    let mut audio = Audio::open("lecture.mp4")?;
    audio
        .add_filter(MetadataFilter::new().with("title", "Lecture 1"))
        .clip(TimeCode::from_seconds(10.0)?, Some(TimeCode::from_seconds(20.0)?));

    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation(
        "index.m3u8",
        vec![progress("00:00:05.00"), progress("00:00:20.00")],
        true,
    );
    let config = FfmpegConfigBuilder::new()
        .ffmpeg_binary("/usr/local/bin/ffmpeg")
        .threads(4)
        .build();

    let mut percents = Vec::new();
    let mut listener = |u: &ProgressUpdate| percents.push(u.percent);
    audio.save(&spawner, &format, &output, &config, Some(&mut listener))?;

    assert_eq!(percents, vec![25.0, 100.0]);
    assert_eq!(spawner.pending_expectations(), 0);

    let calls = spawner.received_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].binary.to_string_lossy(), "/usr/local/bin/ffmpeg");
    let tokens = &calls[0].args;
    assert_eq!(
        &tokens[..7],
        &["-y", "-i", "lecture.mp4", "-ss", "00:00:10.00", "-t", "00:00:20.00"]
    );
    assert_eq!(value_after(tokens, "-metadata"), Some("title=Lecture 1"));
    assert_eq!(value_after(tokens, "-threads"), Some("4"));
    assert_eq!(value_after(tokens, "-hls_time"), Some("6"));
    assert_eq!(value_after(tokens, "-hls_list_size"), Some("5"));
    let key_info = format!("{}{}", format.output_dir(), KEY_INFO_FILE_NAME);
    assert_eq!(value_after(tokens, "-hls_key_info_file"), Some(key_info.as_str()));
    assert_eq!(tokens.last(), Some(&output));

    let key = fs::read_to_string(dir.join(KEY_FILE_NAME))?;
    assert_eq!(key.len(), KEY_LENGTH);
    Ok(())
}

#[test]
fn test_export_without_trim_uses_input_duration_for_progress() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let format = M3u8Format::create(tmp.path().to_string_lossy(), false)?;
    let output = format!("{}out.m3u8", format.output_dir());

    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation(
        "out.m3u8",
        vec![
            FfmpegEvent::ParsedDuration(ffmpeg_sidecar::event::FfmpegDuration {
                input_index: 0,
                duration: 40.0,
                raw_log_message: String::new(),
            }),
            progress("00:00:10.00"),
        ],
        false,
    );

    let mut updates = Vec::new();
    let mut listener = |u: &ProgressUpdate| updates.push(u.clone());
    Audio::open("in.mp4")?.save(
        &spawner,
        &format,
        &output,
        &Default::default(),
        Some(&mut listener),
    )?;

    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].percent, 25.0);
    assert_eq!(updates[0].total_secs, Some(40.0));
    Ok(())
}
