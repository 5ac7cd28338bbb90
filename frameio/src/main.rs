mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use frameio_core::DisplayLevel;

use cli::{Cli, Operation};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse_from(wild::args_os());

    let result = match cli.operation() {
        Operation::Compress => commands::compress(&cli),
        Operation::Decompress | Operation::Test => commands::decompress(&cli),
    };

    if let Err(err) = result {
        let code = err.exit_code();
        if cli.display_level().allows(DisplayLevel::ERRORS) {
            eprintln!("{:?}", miette::Report::new(err));
        }
        std::process::exit(code);
    }
}
