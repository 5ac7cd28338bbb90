use std::ffi::OsString;
use std::path::{Path, PathBuf};

use frameio_core::endpoint::{is_stdin, is_stdout};
use frameio_core::{DisplayLevel, Preferences, NUL_MARK, STDOUT_MARK};

use crate::cli::{Cli, Operation};
use crate::error::{Error, Result};

pub const SUFFIX: &str = "zst";

/// Where the result of `cli` goes: an explicit `-o`, standard output, the
/// null device when testing, or a name derived from the input.
pub fn output_path(cli: &Cli) -> Result<PathBuf> {
    if let Some(output) = &cli.output {
        return Ok(output.clone());
    }

    match cli.operation() {
        Operation::Test => Ok(PathBuf::from(NUL_MARK)),
        _ if cli.to_stdout || is_stdin(&cli.input) => Ok(PathBuf::from(STDOUT_MARK)),
        Operation::Compress => Ok(compressed_name(&cli.input)),
        Operation::Decompress => decompressed_name(&cli.input).ok_or_else(|| Error::UnknownSuffix {
            path: cli.input.clone(),
        }),
    }
}

/// Results are not printed at the default level when the data itself goes
/// to standard output.
pub fn preferences(cli: &Cli, output: &Path) -> Preferences {
    let prefs = cli.preferences();

    if is_stdout(output) && prefs.display_level == DisplayLevel::RESULTS {
        prefs.with_display_level(DisplayLevel::ERRORS)
    } else {
        prefs
    }
}

/// `data.txt` becomes `data.txt.zst`.
pub fn compressed_name(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".");
    name.push(SUFFIX);
    PathBuf::from(name)
}

/// `data.txt.zst` becomes `data.txt`; anything without the suffix is refused.
pub fn decompressed_name(input: &Path) -> Option<PathBuf> {
    match input.extension() {
        Some(ext) if ext == SUFFIX => Some(input.with_extension("")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("frameio").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn compressed_names() {
        assert_eq!(compressed_name(Path::new("data.txt")), PathBuf::from("data.txt.zst"));
        assert_eq!(compressed_name(Path::new("dir/a")), PathBuf::from("dir/a.zst"));
    }

    #[test]
    fn decompressed_names() {
        assert_eq!(
            decompressed_name(Path::new("data.tar.zst")),
            Some(PathBuf::from("data.tar"))
        );
        assert_eq!(decompressed_name(Path::new("data.gz")), None);
        assert_eq!(decompressed_name(Path::new(".zst")), None);
        assert_eq!(decompressed_name(Path::new("plain")), None);
    }

    #[test]
    fn output_follows_flags() {
        assert_eq!(output_path(&parse(&["a"])).unwrap(), PathBuf::from("a.zst"));
        assert_eq!(output_path(&parse(&["-d", "a.zst"])).unwrap(), PathBuf::from("a"));
        assert_eq!(output_path(&parse(&["-c", "a"])).unwrap(), PathBuf::from(STDOUT_MARK));
        assert_eq!(output_path(&parse(&[])).unwrap(), PathBuf::from(STDOUT_MARK));
        assert_eq!(output_path(&parse(&["-t", "a.zst"])).unwrap(), PathBuf::from(NUL_MARK));
        assert_eq!(output_path(&parse(&["-o", "b", "a"])).unwrap(), PathBuf::from("b"));
    }

    #[test]
    fn stdout_output_lowers_default_level() {
        let cli = parse(&["-c", "a"]);
        let prefs = preferences(&cli, Path::new(STDOUT_MARK));
        assert_eq!(prefs.display_level, DisplayLevel::ERRORS);

        let cli = parse(&["-v", "-c", "a"]);
        let prefs = preferences(&cli, Path::new(STDOUT_MARK));
        assert_eq!(prefs.display_level, DisplayLevel::PROGRESS);

        let cli = parse(&["a"]);
        let prefs = preferences(&cli, Path::new("a.zst"));
        assert_eq!(prefs.display_level, DisplayLevel::RESULTS);
    }

    #[test]
    fn unknown_suffix_is_an_error() {
        let err = output_path(&parse(&["-d", "a.gz"])).unwrap_err();
        assert!(matches!(err, Error::UnknownSuffix { .. }));
    }
}
