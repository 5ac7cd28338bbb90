use frameio_core::FileIo;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::util;

pub fn run(cli: &Cli) -> Result<()> {
    let output = util::output_path(cli)?;
    let mut io = FileIo::new(util::preferences(cli, &output));

    let stats = io
        .decompress_filename(&output, &cli.input)
        .map_err(|source| Error::decompress(cli.input.clone(), source))?;

    if stats.legacy_frames > 0 {
        tracing::debug!(legacy_frames = stats.legacy_frames, "decoded legacy frames");
    }
    tracing::info!(
        input = %cli.input.display(),
        output = %output.display(),
        frames = stats.frames,
        written = stats.written,
        "decompressed"
    );

    Ok(())
}
