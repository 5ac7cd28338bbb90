use std::io::Write;
use std::path::Path;

use crate::counting::CountingWriter;
use crate::endpoint::{self, alloc_buffer, Confirm};
use crate::engine::{CompressSession, Engine, EngineError};
use crate::error::{Error, Mode, Result};
use crate::notify::{format_size, DisplayLevel, Notifier};
use crate::prefs::Preferences;

/// Totals of one compression run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompressStats {
    /// Bytes read from the source.
    pub read: u64,
    /// Compressed bytes written to the destination.
    pub written: u64,
}

impl CompressStats {
    /// Compressed size as a fraction of the source size, 0 for an empty source.
    pub fn ratio(&self) -> f64 {
        if self.read == 0 {
            0.0
        } else {
            self.written as f64 / self.read as f64
        }
    }
}

pub(crate) fn compress_file<E: Engine>(
    engine: &E,
    prefs: &Preferences,
    confirm: &mut dyn Confirm,
    notifier: &mut Notifier,
    output: &Path,
    input: &Path,
    level: i32,
) -> Result<CompressStats> {
    let mut in_buf =
        alloc_buffer(engine.compress_in_size()).ok_or(Error::Allocation(Mode::Compress))?;
    let mut out_buf =
        alloc_buffer(engine.compress_out_size()).ok_or(Error::Allocation(Mode::Compress))?;
    let mut session = engine
        .compressor()
        .ok_or(Error::Allocation(Mode::Compress))?;

    let (mut source, sink) = endpoint::resolve(input, output, prefs, confirm, notifier)?;

    let size_hint = endpoint::file_size(input);
    tracing::debug!(level, size_hint, "starting compression");
    session
        .init(level, size_hint)
        .map_err(Error::InitCompression)?;

    let mut sink = CountingWriter::new(sink);
    let mut stats = CompressStats::default();

    loop {
        let read = endpoint::fill(&mut source, &mut in_buf)
            .map_err(|e| Error::ReadSource(e, input.to_path_buf()))?;
        if read == 0 {
            break;
        }
        stats.read += read as u64;

        let status = session
            .compress(&in_buf[..read], &mut out_buf)
            .map_err(Error::Compression)?;
        tracing::trace!(
            consumed = status.bytes_consumed(),
            produced = status.bytes_produced(),
            "compressed chunk"
        );

        if status.bytes_consumed() != read {
            return Err(Error::InputNotConsumed {
                supplied: read,
                consumed: status.bytes_consumed(),
            });
        }

        let block = produced(&out_buf, status.bytes_produced()).map_err(Error::Compression)?;
        sink.write_all(block)
            .map_err(|e| Error::WriteCompressed(e, output.to_path_buf()))?;
        stats.written = sink.bytes_written();

        notifier.update(
            DisplayLevel::RESULTS,
            format_args!(
                "\rRead : {}  ==> {:.2}%",
                format_size(stats.read),
                stats.ratio() * 100.0
            ),
        );
    }

    let status = session.finish(&mut out_buf).map_err(Error::FrameEnd)?;
    if !status.is_done() {
        return Err(Error::FrameEnd(EngineError::new(
            "frame end could not be flushed in one call",
        )));
    }

    let frame_end = produced(&out_buf, status.bytes_produced()).map_err(Error::FrameEnd)?;
    sink.write_all(frame_end)
        .map_err(|e| Error::WriteFrameEnd(e, output.to_path_buf()))?;
    stats.written = sink.bytes_written();

    notifier.clear_line();
    notifier.display(
        DisplayLevel::RESULTS,
        format_args!(
            "Compressed {} bytes into {} bytes ==> {:.2}%\n",
            stats.read,
            stats.written,
            stats.ratio() * 100.0
        ),
    );
    tracing::debug!(read = stats.read, written = stats.written, "compression finished");

    drop(session);
    drop(source);
    sink.into_inner()
        .close()
        .map_err(|e| Error::Close(e, output.to_path_buf(), Mode::Compress))?;

    Ok(stats)
}

/// The produced prefix of `buf`, or an error if the engine claims more than
/// the buffer holds.
pub(crate) fn produced(buf: &[u8], len: usize) -> std::result::Result<&[u8], EngineError> {
    buf.get(..len)
        .ok_or_else(|| EngineError::new("engine reported more output than the buffer holds"))
}
