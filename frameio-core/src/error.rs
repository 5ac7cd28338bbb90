use std::fmt;
use std::path::PathBuf;

use crate::engine::EngineError;
use crate::format::LegacyVersion;

pub type Result<T> = std::result::Result<T, Error>;

/// Which driver an error was raised by. Some failure sites exist in both and
/// keep distinct exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Decompress,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Compress => write!(f, "compression"),
            Mode::Decompress => write!(f, "decompression"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Operation aborted: '{}' already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("Cannot open source. Path: '{}'", .1.display())]
    OpenSource(#[source] std::io::Error, PathBuf),

    #[error("Cannot open destination. Path: '{}'", .1.display())]
    OpenDestination(#[source] std::io::Error, PathBuf),

    #[error("Allocation error: not enough memory for {0}")]
    Allocation(Mode),

    #[error("Error initializing compression")]
    InitCompression(#[source] EngineError),

    #[error("Compression error")]
    Compression(#[source] EngineError),

    #[error("Compression error: input block not fully consumed ({consumed} of {supplied} bytes)")]
    InputNotConsumed { supplied: usize, consumed: usize },

    #[error("Write error: cannot write compressed block. Path: '{}'", .1.display())]
    WriteCompressed(#[source] std::io::Error, PathBuf),

    #[error("Compression error: cannot create frame end")]
    FrameEnd(#[source] EngineError),

    #[error("Write error: cannot write frame end. Path: '{}'", .1.display())]
    WriteFrameEnd(#[source] std::io::Error, PathBuf),

    #[error("Write error: cannot properly close '{}' after {}", .1.display(), .2)]
    Close(#[source] std::io::Error, PathBuf, Mode),

    #[error("Read error. Path: '{}'", .1.display())]
    ReadSource(#[source] std::io::Error, PathBuf),

    #[error("Read error: cannot read header ({0} of 4 bytes available)")]
    TruncatedHeader(usize),

    #[error("Too large block: {requested} bytes requested, input buffer holds {capacity}")]
    TooLargeBlock { requested: usize, capacity: usize },

    #[error("Read error: {read} of {expected} requested bytes available")]
    TruncatedBlock { expected: usize, read: usize },

    #[error("Read error")]
    ReadBlock(#[source] std::io::Error),

    #[error("Decoding error")]
    Decoding(#[source] EngineError),

    #[error("Decoding error: legacy format {0} cannot be streamed")]
    UnsupportedLegacy(LegacyVersion),

    #[error("Write error: unable to write data block to destination")]
    WriteDecoded(#[source] std::io::Error),
}

impl Error {
    /// The process exit code for this failure site.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::DestinationExists(_) => 11,
            Error::OpenSource(..) => 12,
            Error::OpenDestination(..) => 13,
            Error::Allocation(Mode::Compress) => 21,
            Error::InitCompression(_) => 22,
            Error::Compression(_) => 23,
            Error::InputNotConsumed { .. } => 24,
            Error::WriteCompressed(..) => 25,
            Error::FrameEnd(_) => 26,
            Error::WriteFrameEnd(..) => 27,
            Error::Close(_, _, Mode::Compress) => 28,
            Error::ReadSource(..) | Error::TruncatedHeader(_) => 31,
            Error::Allocation(Mode::Decompress) => 33,
            Error::TooLargeBlock { .. } => 34,
            Error::TruncatedBlock { .. } | Error::ReadBlock(_) => 35,
            Error::Decoding(_) | Error::UnsupportedLegacy(_) => 36,
            Error::WriteDecoded(_) => 37,
            Error::Close(_, _, Mode::Decompress) => 38,
        }
    }
}
