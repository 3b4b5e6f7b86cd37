mod cli;
mod clock;
mod config;
mod defaults;
mod download;
mod events;
mod pipeline;
mod settings;
mod template;
mod wait;

use cli::Invocation;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("AOCDL_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = match cli::parse(std::env::args_os()) {
        Ok(Invocation::Run(args)) => args,
        Ok(Invocation::Help) => {
            println!("{}", cli::TITLE_ABOUT_MESSAGE);
            println!("{}", cli::USAGE_MESSAGE);
            println!("{}", cli::REPOSITORY_MESSAGE);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}\n", cli::error_summary(&e));
            eprintln!("{}", cli::USAGE_MESSAGE);
            return ExitCode::FAILURE;
        }
    };

    init_logging(args.verbose);

    match pipeline::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
