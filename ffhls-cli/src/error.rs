// ============================================================================
// ffhls-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result alias and error reporting for the CLI
//
// Commands return core errors unchanged; main prints them with their cause
// chain and exits with status 1.

use ffhls_core::{CoreError, CoreResult};
use std::error::Error;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Renders an error and its causes, one per line.
pub fn render_error(err: &CoreError) -> String {
    let mut rendered = format!("Error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(&format!("\n  Caused by: {cause}"));
        source = cause.source();
    }
    rendered
}
