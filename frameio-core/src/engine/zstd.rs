//! Zstandard sessions on top of zstd-safe.
//!
//! These are pure buffer-to-buffer operations with no I/O traits.

use zstd_safe::{get_error_name, CCtx, DCtx, InBuffer, OutBuffer, ResetDirective};

use super::{CompressSession, DecodeStatus, DecompressSession, Engine, EngineError, StreamStatus};

fn zstd_error(code: usize) -> EngineError {
    EngineError::new(get_error_name(code))
}

/// Engine backed by the Zstandard streaming API.
///
/// The recommended sizes come straight from `ZSTD_CStreamInSize` and friends.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZstdEngine;

impl Engine for ZstdEngine {
    type Compressor = ZstdCompressor<'static>;
    type Decompressor = ZstdDecompressor<'static>;

    fn compress_in_size(&self) -> usize {
        CCtx::in_size()
    }

    fn compress_out_size(&self) -> usize {
        CCtx::out_size()
    }

    fn decompress_in_size(&self) -> usize {
        DCtx::in_size()
    }

    fn decompress_out_size(&self) -> usize {
        DCtx::out_size()
    }

    fn compressor(&self) -> Option<Self::Compressor> {
        CCtx::try_create().map(|ctx| ZstdCompressor { ctx })
    }

    fn decompressor(&self) -> Option<Self::Decompressor> {
        DCtx::try_create().map(|ctx| ZstdDecompressor { ctx })
    }
}

/// Streaming Zstd compressor.
pub struct ZstdCompressor<'a> {
    ctx: CCtx<'a>,
}

impl CompressSession for ZstdCompressor<'_> {
    fn init(&mut self, level: i32, size_hint: u64) -> Result<(), EngineError> {
        self.ctx
            .reset(ResetDirective::SessionOnly)
            .map_err(zstd_error)?;
        self.ctx.init(level).map_err(zstd_error)?;

        // Zero means unknown, which is what `init` already left in place.
        if size_hint > 0 {
            self.ctx
                .set_pledged_src_size(Some(size_hint))
                .map_err(zstd_error)?;
        }

        Ok(())
    }

    fn compress(&mut self, input: &[u8], output: &mut [u8]) -> Result<StreamStatus, EngineError> {
        let mut in_buf = InBuffer::around(input);
        let mut out_buf = OutBuffer::around(output);

        self.ctx
            .compress_stream(&mut out_buf, &mut in_buf)
            .map_err(zstd_error)?;

        Ok(StreamStatus::Progress {
            bytes_consumed: in_buf.pos(),
            bytes_produced: out_buf.pos(),
        })
    }

    fn finish(&mut self, output: &mut [u8]) -> Result<StreamStatus, EngineError> {
        let mut out_buf = OutBuffer::around(output);

        let remaining = self.ctx.end_stream(&mut out_buf).map_err(zstd_error)?;

        if remaining == 0 {
            Ok(StreamStatus::Done {
                bytes_consumed: 0,
                bytes_produced: out_buf.pos(),
            })
        } else {
            Ok(StreamStatus::Progress {
                bytes_consumed: 0,
                bytes_produced: out_buf.pos(),
            })
        }
    }
}

/// Streaming Zstd decompressor.
///
/// With zstd-safe's default `legacy` feature the same context also decodes
/// v0.4 to v0.7 frames, which is what [`crate::legacy::ZstdLegacyDecoder`]
/// relies on.
pub struct ZstdDecompressor<'a> {
    ctx: DCtx<'a>,
}

impl ZstdDecompressor<'static> {
    /// Returns `None` when the context cannot be allocated.
    pub fn try_new() -> Option<Self> {
        DCtx::try_create().map(|ctx| ZstdDecompressor { ctx })
    }
}

impl DecompressSession for ZstdDecompressor<'_> {
    fn init(&mut self) -> Result<(), EngineError> {
        self.ctx
            .reset(ResetDirective::SessionOnly)
            .map_err(zstd_error)?;
        self.ctx.init().map_err(zstd_error)?;
        Ok(())
    }

    fn decompress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<DecodeStatus, EngineError> {
        let mut in_buf = InBuffer::around(input);
        let mut out_buf = OutBuffer::around(output);

        // 0 means the frame is complete and fully flushed. Any other value is
        // the size of the next input segment, which never crosses into the
        // following frame.
        let hint = self
            .ctx
            .decompress_stream(&mut out_buf, &mut in_buf)
            .map_err(zstd_error)?;

        Ok(DecodeStatus {
            bytes_consumed: in_buf.pos(),
            bytes_produced: out_buf.pos(),
            next_input: hint,
        })
    }
}
