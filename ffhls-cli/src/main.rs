// ffhls-cli/src/main.rs
//
// Entry point of the `ffhls` binary: parses arguments, sets up logging and
// dispatches to the command implementations. Any error is printed to stderr
// and turns into exit status 1.

use clap::Parser;
use ffhls_cli::{Cli, Commands, logging, render_error, run_audio, run_hls, run_info};
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Hls(args) => run_hls(args),
        Commands::Audio(args) => run_audio(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(err) = result {
        log::debug!("Command failed: {err:?}");
        eprintln!("{}", render_error(&err));
        process::exit(1);
    }
}
