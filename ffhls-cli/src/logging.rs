// ============================================================================
// ffhls-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger Setup for the ffhls Binary
//
// The core library logs through the `log` facade; this module installs
// env_logger as the backend.
//
// USAGE:
// - RUST_LOG=info (default): job start/finish and warnings
// - RUST_LOG=debug (or --verbose): built commands, skipped key-info files
// - RUST_LOG=ffmpeg_log=trace: every line ffmpeg prints

use env_logger::Env;

/// Returns the default filter for the given verbosity.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Initializes env_logger. `RUST_LOG` overrides the verbosity default.
pub fn init(verbose: bool) {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter(verbose)))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "info");
        assert_eq!(default_filter(true), "debug");
    }
}
