use std::path::PathBuf;

use clap::{ArgAction, Parser};
use frameio_core::{DisplayLevel, Preferences, STDIN_MARK};

#[derive(Debug, Parser)]
#[command(
    name = "frameio",
    about = "Compress or decompress files as Zstandard frames.",
    version,
    after_help = "\
\x1b[1m\x1b[4mSpecial names:\x1b[0m
  \x1b[1mstdin\x1b[0m      Read from standard input (default input)
  \x1b[1mstdout\x1b[0m     Write to standard output

\x1b[1m\x1b[4mExamples:\x1b[0m
  frameio data.txt
  frameio -l 19 -o data.zst data.txt
  frameio -d data.txt.zst
  cat data.zst | frameio -dc > data.txt"
)]
pub struct Cli {
    /// Decompress
    #[arg(short = 'd', long, conflicts_with = "compress")]
    pub decompress: bool,

    /// Compress (default)
    #[arg(short = 'z', long)]
    pub compress: bool,

    /// Test compressed file integrity, discarding the output
    #[arg(short = 't', long, conflicts_with_all = ["compress", "output", "to_stdout"])]
    pub test: bool,

    /// Write to standard output
    #[arg(short = 'c', long = "stdout", conflicts_with = "output")]
    pub to_stdout: bool,

    /// Overwrite existing output without asking
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Compression level
    #[arg(
        short = 'l',
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(i32).range(1..=22)
    )]
    pub level: i32,

    /// More output, repeatable
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less output, repeatable
    #[arg(short = 'q', long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Output path
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Input path
    #[arg(value_name = "FILE", default_value = STDIN_MARK)]
    pub input: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Decompress,
    Test,
}

impl Cli {
    pub fn operation(&self) -> Operation {
        if self.test {
            Operation::Test
        } else if self.decompress {
            Operation::Decompress
        } else {
            Operation::Compress
        }
    }

    pub fn display_level(&self) -> DisplayLevel {
        let level = 2 + i32::from(self.verbose) - i32::from(self.quiet);
        DisplayLevel::new(level.clamp(0, 4) as u8)
    }

    pub fn preferences(&self) -> Preferences {
        Preferences::new(self.display_level()).with_overwrite(self.force)
    }
}
