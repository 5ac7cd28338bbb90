//! Decoding of frames written by pre-1.0 format versions.

use std::io::{Read, Write};

use crate::decompress::{decode_frame, DecodedFrame};
use crate::endpoint::alloc_buffer;
use crate::engine::zstd::{ZstdDecompressor, ZstdEngine};
use crate::engine::Engine;
use crate::error::{Error, Mode, Result};
use crate::format::LegacyVersion;
use crate::notify::Notifier;

/// Decodes one legacy frame.
///
/// `input[..resident]` holds the 4-byte signature, which `version` names, and
/// possibly more of the frame; the rest comes from `src`. Bytes of `input`
/// loaded past the end of the frame go back to the caller as the leftover.
pub trait LegacyDecoder {
    fn decode_frame(
        &mut self,
        version: LegacyVersion,
        src: &mut dyn Read,
        input: &mut [u8],
        resident: usize,
        dest: &mut dyn Write,
        notifier: &mut Notifier,
    ) -> Result<DecodedFrame>;
}

/// Legacy support through the Zstandard library, which streams v0.4 to v0.7.
///
/// The session and its output buffer are only allocated once a legacy frame
/// is actually met, then reused for the rest of the stream.
#[derive(Default)]
pub struct ZstdLegacyDecoder {
    state: Option<LegacyState>,
}

struct LegacyState {
    session: ZstdDecompressor<'static>,
    output: Vec<u8>,
}

impl LegacyState {
    fn new() -> Result<Self> {
        let engine = ZstdEngine;
        let session = ZstdDecompressor::try_new().ok_or(Error::Allocation(Mode::Decompress))?;
        let output = alloc_buffer(engine.decompress_out_size())
            .ok_or(Error::Allocation(Mode::Decompress))?;

        Ok(LegacyState { session, output })
    }
}

impl ZstdLegacyDecoder {
    pub const OLDEST_STREAMABLE: u8 = 4;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn supports(version: LegacyVersion) -> bool {
        version.minor() >= Self::OLDEST_STREAMABLE
    }
}

impl LegacyDecoder for ZstdLegacyDecoder {
    fn decode_frame(
        &mut self,
        version: LegacyVersion,
        src: &mut dyn Read,
        input: &mut [u8],
        resident: usize,
        dest: &mut dyn Write,
        notifier: &mut Notifier,
    ) -> Result<DecodedFrame> {
        if !Self::supports(version) {
            tracing::warn!(%version, "legacy frame too old to stream");
            return Err(Error::UnsupportedLegacy(version));
        }

        let state = match self.state.take() {
            Some(state) => state,
            None => LegacyState::new()?,
        };
        let state = self.state.insert(state);

        // The library detects the version from the resident signature.
        decode_frame(
            dest,
            src,
            input,
            resident,
            &mut state.output,
            &mut state.session,
            notifier,
        )
    }
}
