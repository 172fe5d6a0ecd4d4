// ============================================================================
// ffhls-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates everything that leaves the process: spawning
// ffmpeg through ffmpeg-sidecar, probing inputs through the ffprobe crate,
// and checking that the binaries exist at all.
//
// KEY COMPONENTS:
// - FfmpegSpawner / FfmpegProcess: traits over a running ffmpeg
// - execute: runs an argument list and maps failures to CoreError
// - probe: media summary via ffprobe
// - check_dependency: `-version` probe for a binary

use crate::error::{CoreError, CoreResult};
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Runs ffmpeg argument lists and collects their outcome
pub mod ffmpeg;

/// Traits and implementations for spawning ffmpeg processes
pub mod ffmpeg_executor;

/// Media inspection through ffprobe
pub mod ffprobe_executor;

/// Scripted ffmpeg spawner for tests
#[cfg(all(unix, any(test, feature = "test-mocks")))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg::{execute, execute_with_handler};
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{MediaSummary, StreamKind, StreamSummary, probe};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that `binary` can be started by running it with `-version`.
///
/// # Errors
///
/// * `CoreError::DependencyNotFound` if the binary does not exist
/// * `CoreError::CommandStart` if it exists but could not be started
/// * `CoreError::CommandFailed` if it ran but exited unsuccessfully
pub fn check_dependency(binary: &Path) -> CoreResult<()> {
    let name = binary.display().to_string();
    let result = Command::new(binary)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(status) if status.success() => {
            log::debug!("Found dependency: {name}");
            Ok(())
        }
        Ok(status) => Err(crate::error::command_failed_error(
            name,
            status,
            "version check failed",
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{name}' not found.");
            Err(CoreError::DependencyNotFound(name))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{name}': {e}");
            Err(CoreError::CommandStart(name, e))
        }
    }
}
