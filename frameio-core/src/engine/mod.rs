//! Streaming engine contract.
//!
//! The drivers never look inside a session. They only ask the [`Engine`] for
//! recommended buffer sizes and fresh sessions, and then exchange chunks with
//! [`CompressSession`] / [`DecompressSession`] through plain byte slices.
//!
//! The bundled implementation is [`zstd::ZstdEngine`].

use std::borrow::Cow;

pub mod zstd;

/// An error status reported by an engine call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EngineError {
    message: Cow<'static, str>,
}

impl EngineError {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Status returned by compression calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// Made progress; for `finish` this means more output is still pending.
    Progress {
        bytes_consumed: usize,
        bytes_produced: usize,
    },
    /// Frame closed and fully flushed.
    Done {
        bytes_consumed: usize,
        bytes_produced: usize,
    },
}

impl StreamStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, StreamStatus::Done { .. })
    }

    pub fn bytes_consumed(&self) -> usize {
        match self {
            StreamStatus::Progress { bytes_consumed, .. } => *bytes_consumed,
            StreamStatus::Done { bytes_consumed, .. } => *bytes_consumed,
        }
    }

    pub fn bytes_produced(&self) -> usize {
        match self {
            StreamStatus::Progress { bytes_produced, .. } => *bytes_produced,
            StreamStatus::Done { bytes_produced, .. } => *bytes_produced,
        }
    }
}

/// Status returned by one decompression call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStatus {
    /// Bytes taken from the supplied input slice.
    pub bytes_consumed: usize,
    /// Bytes written to the start of the output buffer.
    pub bytes_produced: usize,
    /// Zero when the frame is complete, otherwise the minimum number of
    /// additional input bytes needed before the session can progress.
    pub next_input: usize,
}

impl DecodeStatus {
    pub fn is_frame_done(&self) -> bool {
        self.next_input == 0
    }
}

/// One compression session. Exactly one is used per file.
pub trait CompressSession {
    /// Start a new frame. `size_hint` is the total source size, or 0 when
    /// unknown.
    fn init(&mut self, level: i32, size_hint: u64) -> Result<(), EngineError>;

    /// Compress `input` into `output`.
    fn compress(&mut self, input: &[u8], output: &mut [u8]) -> Result<StreamStatus, EngineError>;

    /// Flush buffered data and close the frame. Returns
    /// [`StreamStatus::Done`] once nothing remains to be flushed.
    fn finish(&mut self, output: &mut [u8]) -> Result<StreamStatus, EngineError>;
}

/// One decompression session, reinitialised for every frame.
pub trait DecompressSession {
    fn init(&mut self) -> Result<(), EngineError>;

    fn decompress(&mut self, input: &[u8], output: &mut [u8])
        -> Result<DecodeStatus, EngineError>;
}

/// Buffer sizing oracle and session factory.
///
/// Honouring the recommended sizes guarantees that a single
/// [`CompressSession::compress`] call consumes a whole input chunk, and that
/// [`DecodeStatus::next_input`] never exceeds the decompression input size.
pub trait Engine {
    type Compressor: CompressSession;
    type Decompressor: DecompressSession;

    fn compress_in_size(&self) -> usize;
    fn compress_out_size(&self) -> usize;
    fn decompress_in_size(&self) -> usize;
    fn decompress_out_size(&self) -> usize;

    /// Returns `None` when the session cannot be allocated.
    fn compressor(&self) -> Option<Self::Compressor>;

    /// Returns `None` when the session cannot be allocated.
    fn decompressor(&self) -> Option<Self::Decompressor>;
}
