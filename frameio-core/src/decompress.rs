use std::io::{Read, Write};
use std::ops::Range;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};

use crate::compress::produced;
use crate::counting::CountingReader;
use crate::endpoint::{self, alloc_buffer, Confirm};
use crate::engine::{DecompressSession, Engine, EngineError};
use crate::error::{Error, Mode, Result};
use crate::format::{Format, MAGIC_PREFIX_LEN};
use crate::legacy::LegacyDecoder;
use crate::notify::{format_size, DisplayLevel, Notifier};
use crate::prefs::Preferences;

/// Totals of one decompression run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecompressStats {
    /// Bytes read from the source.
    pub read: u64,
    /// Decoded bytes written to the destination.
    pub written: u64,
    /// Frames decoded, legacy ones included.
    pub frames: u64,
    pub legacy_frames: u64,
}

/// Outcome of decoding one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Decoded bytes written to the destination.
    pub written: u64,
    /// Bytes of the input buffer that were loaded along with the frame but
    /// belong to whatever follows it.
    pub leftover: Range<usize>,
}

/// Loaded but not yet consumed bytes of the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingInput {
    offset: usize,
    resident: usize,
}

impl PendingInput {
    fn new(resident: usize) -> Self {
        PendingInput {
            offset: 0,
            resident,
        }
    }

    fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.resident
    }

    fn consume(&mut self, consumed: usize) -> std::result::Result<(), EngineError> {
        if consumed > self.resident {
            return Err(EngineError::new(
                "engine consumed more input than was supplied",
            ));
        }

        self.resident -= consumed;
        self.offset += consumed;
        Ok(())
    }

    fn reload(&mut self, resident: usize) {
        self.offset = 0;
        self.resident = resident;
    }
}

/// Decode exactly one frame.
///
/// The first `resident` bytes of `input` are already loaded, typically the
/// magic prefix. Further input is read from `src` only in the amounts the
/// session asks for. Anything loaded past the end of the frame is reported
/// back as [`DecodedFrame::leftover`] and must be fed to the next frame.
pub fn decode_frame<W, R, D>(
    dest: &mut W,
    src: &mut R,
    input: &mut [u8],
    resident: usize,
    output: &mut [u8],
    session: &mut D,
    notifier: &mut Notifier,
) -> Result<DecodedFrame>
where
    W: Write + ?Sized,
    R: Read + ?Sized,
    D: DecompressSession + ?Sized,
{
    if resident > input.len() {
        return Err(Error::TooLargeBlock {
            requested: resident,
            capacity: input.len(),
        });
    }

    session.init().map_err(Error::Decoding)?;

    let mut pending = PendingInput::new(resident);
    let mut decoded = 0u64;

    loop {
        let status = session
            .decompress(&input[pending.range()], output)
            .map_err(Error::Decoding)?;
        tracing::trace!(
            consumed = status.bytes_consumed,
            produced = status.bytes_produced,
            next = status.next_input,
            "decoded chunk"
        );

        let block = produced(output, status.bytes_produced).map_err(Error::Decoding)?;
        dest.write_all(block).map_err(Error::WriteDecoded)?;
        decoded += block.len() as u64;

        notifier.update(
            DisplayLevel::RESULTS,
            format_args!("\rDecoded : {}...     ", format_size(decoded)),
        );

        pending
            .consume(status.bytes_consumed)
            .map_err(Error::Decoding)?;

        if status.is_frame_done() {
            return Ok(DecodedFrame {
                written: decoded,
                leftover: pending.range(),
            });
        }

        // Output was not fully flushed; the session still holds input.
        if pending.resident > 0 {
            if status.bytes_consumed == 0 && status.bytes_produced == 0 {
                return Err(Error::Decoding(EngineError::new(
                    "engine made no progress on resident input",
                )));
            }
            continue;
        }

        let wanted = status.next_input;
        if wanted > input.len() {
            return Err(Error::TooLargeBlock {
                requested: wanted,
                capacity: input.len(),
            });
        }

        let read = endpoint::fill(src, &mut input[..wanted]).map_err(Error::ReadBlock)?;
        if read != wanted {
            return Err(Error::TruncatedBlock {
                expected: wanted,
                read,
            });
        }
        pending.reload(read);
    }
}

pub(crate) fn decompress_file<E: Engine>(
    engine: &E,
    prefs: &Preferences,
    confirm: &mut dyn Confirm,
    legacy: &mut dyn LegacyDecoder,
    notifier: &mut Notifier,
    output: &Path,
    input: &Path,
) -> Result<DecompressStats> {
    let mut in_buf =
        alloc_buffer(engine.decompress_in_size()).ok_or(Error::Allocation(Mode::Decompress))?;
    let mut out_buf =
        alloc_buffer(engine.decompress_out_size()).ok_or(Error::Allocation(Mode::Decompress))?;
    let mut session = engine
        .decompressor()
        .ok_or(Error::Allocation(Mode::Decompress))?;

    if in_buf.len() < MAGIC_PREFIX_LEN {
        return Err(Error::TooLargeBlock {
            requested: MAGIC_PREFIX_LEN,
            capacity: in_buf.len(),
        });
    }

    let (source, mut sink) = endpoint::resolve(input, output, prefs, confirm, notifier)?;
    let mut source = CountingReader::new(source);
    let mut stats = DecompressStats::default();
    let mut carried = 0..0;

    loop {
        // Bytes left over from the previous frame start the next one.
        let kept = carried.len();
        in_buf.copy_within(carried, 0);

        let read = if kept < MAGIC_PREFIX_LEN {
            endpoint::fill(&mut source, &mut in_buf[kept..MAGIC_PREFIX_LEN])
                .map_err(|e| Error::ReadSource(e, input.to_path_buf()))?
        } else {
            0
        };
        let resident = kept + read;
        if resident == 0 {
            break;
        }
        if resident < MAGIC_PREFIX_LEN {
            return Err(Error::TruncatedHeader(resident));
        }

        let magic = LittleEndian::read_u32(&in_buf[..MAGIC_PREFIX_LEN]);
        let frame = match Format::detect(magic) {
            Format::Legacy(version) => {
                tracing::debug!(%version, frame = stats.frames, "legacy frame");
                stats.legacy_frames += 1;
                legacy.decode_frame(
                    version,
                    &mut source,
                    &mut in_buf,
                    resident,
                    &mut sink,
                    notifier,
                )?
            }
            Format::Current => {
                tracing::debug!(magic, frame = stats.frames, "frame");
                decode_frame(
                    &mut sink,
                    &mut source,
                    &mut in_buf,
                    resident,
                    &mut out_buf,
                    &mut session,
                    notifier,
                )?
            }
        };

        if in_buf.get(frame.leftover.clone()).is_none() {
            return Err(Error::Decoding(EngineError::new(
                "leftover input lies outside the input buffer",
            )));
        }

        stats.frames += 1;
        stats.written += frame.written;
        carried = frame.leftover;
    }
    stats.read = source.bytes_read();

    notifier.clear_line();
    notifier.display(
        DisplayLevel::RESULTS,
        format_args!("Decoded {} bytes   \n", stats.written),
    );
    tracing::debug!(
        read = stats.read,
        written = stats.written,
        frames = stats.frames,
        "decompression finished"
    );

    drop(session);
    drop(source);
    sink.close()
        .map_err(|e| Error::Close(e, output.to_path_buf(), Mode::Decompress))?;

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::zstd::ZstdEngine;
    use crate::engine::DecodeStatus;

    fn quiet() -> Notifier {
        Notifier::with_writer(DisplayLevel::SILENT, std::io::sink())
    }

    /// Echoes its input in pieces of at most `step` bytes and declares the
    /// frame done after `frame_len` bytes, leaving anything beyond unconsumed.
    struct Echo {
        step: usize,
        frame_len: usize,
        seen: usize,
    }

    impl DecompressSession for Echo {
        fn init(&mut self) -> std::result::Result<(), EngineError> {
            self.seen = 0;
            Ok(())
        }

        fn decompress(
            &mut self,
            input: &[u8],
            output: &mut [u8],
        ) -> std::result::Result<DecodeStatus, EngineError> {
            let n = input
                .len()
                .min(self.step)
                .min(output.len())
                .min(self.frame_len - self.seen);
            output[..n].copy_from_slice(&input[..n]);
            self.seen += n;

            Ok(DecodeStatus {
                bytes_consumed: n,
                bytes_produced: n,
                next_input: (self.frame_len - self.seen).min(self.step),
            })
        }
    }

    #[test]
    fn pending_input_tracks_offset() {
        let mut pending = PendingInput::new(10);
        pending.consume(4).unwrap();
        assert_eq!(pending.range(), 4..10);
        assert!(pending.consume(7).is_err());
        pending.consume(6).unwrap();
        assert_eq!(pending.resident, 0);
        pending.reload(3);
        assert_eq!(pending.range(), 0..3);
    }

    #[test]
    fn resident_bytes_are_drained_before_reading() {
        let mut session = Echo {
            step: 3,
            frame_len: 10,
            seen: 0,
        };
        let mut input = *b"abcdefgh";
        let mut output = [0u8; 16];
        let mut src = &b"ij"[..];
        let mut dest = Vec::new();

        let frame = decode_frame(
            &mut dest,
            &mut src,
            &mut input,
            8,
            &mut output,
            &mut session,
            &mut quiet(),
        )
        .unwrap();

        assert_eq!(frame.written, 10);
        assert!(frame.leftover.is_empty());
        assert_eq!(dest, b"abcdefghij");
        assert!(src.is_empty());
    }

    #[test]
    fn never_reads_past_the_frame() {
        let mut session = Echo {
            step: 4,
            frame_len: 6,
            seen: 0,
        };
        let mut input = *b"abcd";
        let mut output = [0u8; 4];
        let mut src = &b"efNEXT"[..];
        let mut dest = Vec::new();

        decode_frame(
            &mut dest,
            &mut src,
            &mut input,
            4,
            &mut output,
            &mut session,
            &mut quiet(),
        )
        .unwrap();

        assert_eq!(dest, b"abcdef");
        assert_eq!(src, b"NEXT");
    }

    #[test]
    fn short_refill_is_truncated_block() {
        let mut session = Echo {
            step: 4,
            frame_len: 8,
            seen: 0,
        };
        let mut input = *b"abcd";
        let mut output = [0u8; 4];
        let mut src = &b"ef"[..];

        let err = decode_frame(
            &mut Vec::<u8>::new(),
            &mut src,
            &mut input,
            4,
            &mut output,
            &mut session,
            &mut quiet(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::TruncatedBlock {
                expected: 4,
                read: 2
            }
        ));
        assert_eq!(err.exit_code(), 35);
    }

    #[test]
    fn decodes_a_reference_frame_in_pieces() {
        let data = b"frame data that is long enough to matter ".repeat(4000);
        let compressed = ::zstd::encode_all(&data[..], 5).unwrap();

        let engine = ZstdEngine;
        let mut session = engine.decompressor().unwrap();
        let mut input = vec![0u8; engine.decompress_in_size()];
        let mut output = vec![0u8; engine.decompress_out_size()];
        input[..4].copy_from_slice(&compressed[..4]);

        let mut src = &compressed[4..];
        let mut dest = Vec::new();
        let frame = decode_frame(
            &mut dest,
            &mut src,
            &mut input,
            4,
            &mut output,
            &mut session,
            &mut quiet(),
        )
        .unwrap();

        assert_eq!(frame.written, data.len() as u64);
        assert!(frame.leftover.is_empty());
        assert_eq!(dest, data);
        assert!(src.is_empty());
    }

    #[test]
    fn bytes_past_the_frame_are_handed_back() {
        let mut session = Echo {
            step: 4,
            frame_len: 5,
            seen: 0,
        };
        let mut input = *b"abcdefgh";
        let mut output = [0u8; 8];
        let mut src = &b"rest"[..];
        let mut dest = Vec::new();

        let frame = decode_frame(
            &mut dest,
            &mut src,
            &mut input,
            8,
            &mut output,
            &mut session,
            &mut quiet(),
        )
        .unwrap();

        assert_eq!(dest, b"abcde");
        assert_eq!(frame.written, 5);
        assert_eq!(frame.leftover, 5..8);
        assert_eq!(&input[frame.leftover], b"fgh");
        assert_eq!(src, b"rest");
    }

    /// Accepts nothing and produces nothing, yet never ends the frame.
    struct Stalled;

    impl DecompressSession for Stalled {
        fn init(&mut self) -> std::result::Result<(), EngineError> {
            Ok(())
        }

        fn decompress(
            &mut self,
            _input: &[u8],
            _output: &mut [u8],
        ) -> std::result::Result<DecodeStatus, EngineError> {
            Ok(DecodeStatus {
                bytes_consumed: 0,
                bytes_produced: 0,
                next_input: 4,
            })
        }
    }

    #[test]
    fn stalled_session_is_a_decoding_error() {
        let mut input = *b"abcd";
        let mut output = [0u8; 4];

        let err = decode_frame(
            &mut Vec::<u8>::new(),
            &mut &b"more"[..],
            &mut input,
            4,
            &mut output,
            &mut Stalled,
            &mut quiet(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Decoding(_)));
        assert_eq!(err.exit_code(), 36);
    }
}
