// ffhls-cli/src/lib.rs
//
// Library portion of the ffhls CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod progress;

// Re-export items needed by the binary or integration tests
pub use cli::{AudioArgs, Cli, Commands, HlsArgs, InfoArgs};
pub use commands::audio::run_audio;
pub use commands::hls::run_hls;
pub use commands::info::run_info;
pub use error::{CliResult, render_error};
