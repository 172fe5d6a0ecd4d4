// ffhls-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Only compiled for unit tests or with the "test-mocks" feature.
#![cfg(all(unix, any(test, feature = "test-mocks")))]

use super::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use crate::error::{CoreError, CoreResult};
use ffmpeg_sidecar::event::FfmpegEvent;
use std::cell::RefCell;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Vec<FfmpegEvent>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl MockFfmpegProcess {
    /// A process that emits `events` and exits with `code`.
    pub fn exiting_with(events: Vec<FfmpegEvent>, code: i32) -> Self {
        Self {
            events_to_emit: events,
            // Raw wait status: the exit code lives in the high byte.
            exit_status: ExitStatus::from_raw(code << 8),
        }
    }
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events_to_emit.clone() {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Represents an expected ffmpeg call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    pub create_dummy_output: bool,
}

/// A call the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedCall {
    pub binary: PathBuf,
    pub args: Vec<String>,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Each spawn consumes the first expectation whose pattern occurs in one of
/// the arguments. A spawn nothing matches fails with `CommandStart`.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Rc<RefCell<Vec<MockFfmpegExpectation>>>,
    received_calls: Rc<RefCell<Vec<ReceivedCall>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        create_dummy_output: bool,
    ) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            create_dummy_output,
        });
    }

    pub fn add_success_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        create_dummy_output: bool,
    ) {
        let process = MockFfmpegProcess::exiting_with(events, 0);
        self.add_expectation(arg_pattern, Ok(process), create_dummy_output);
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), false);
    }

    /// The process exits with `exit_code`. The output file is still created
    /// when `create_dummy_output` is set, to simulate a partial write.
    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        exit_code: i32,
        create_dummy_output: bool,
    ) {
        let process = MockFfmpegProcess::exiting_with(events, exit_code);
        self.add_expectation(arg_pattern, Ok(process), create_dummy_output);
    }

    pub fn received_calls(&self) -> Vec<ReceivedCall> {
        self.received_calls.borrow().clone()
    }

    /// Expectations not consumed yet.
    pub fn pending_expectations(&self) -> usize {
        self.expectations.borrow().len()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, binary: &Path, args: &[String]) -> CoreResult<Self::Process> {
        self.received_calls.borrow_mut().push(ReceivedCall {
            binary: binary.to_path_buf(),
            args: args.to_vec(),
        });

        let mut expectations = self.expectations.borrow_mut();
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            log::error!("MockFfmpegSpawner: No expectation found for args: {args:?}");
            return Err(CoreError::CommandStart(
                binary.display().to_string(),
                io::Error::other("no mock expectation matched"),
            ));
        };

        let expectation = expectations.remove(index);
        log::debug!(
            "MockFfmpegSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );
        let process = expectation.result?;
        if expectation.create_dummy_output {
            if let Some(output) = args.last() {
                create_dummy_file(Path::new(output));
            }
        }
        Ok(process)
    }
}

fn create_dummy_file(path: &Path) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::error!("MockFfmpegSpawner failed to create {}: {e}", parent.display());
        }
    }
    match std::fs::write(path, b"partial") {
        Ok(()) => log::debug!("MockFfmpegSpawner created dummy output {}", path.display()),
        Err(e) => log::error!("MockFfmpegSpawner failed to create {}: {e}", path.display()),
    }
}
