use frameio_core::FileIo;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::util;

pub fn run(cli: &Cli) -> Result<()> {
    let output = util::output_path(cli)?;
    let mut io = FileIo::new(util::preferences(cli, &output));

    let stats = io
        .compress_filename(&output, &cli.input, cli.level)
        .map_err(|source| Error::compress(cli.input.clone(), source))?;

    tracing::info!(
        input = %cli.input.display(),
        output = %output.display(),
        read = stats.read,
        written = stats.written,
        "compressed"
    );

    Ok(())
}
