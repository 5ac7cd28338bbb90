//! Whole-file streaming on top of a chunked compression engine.
//!
//! Use [FileIo][FileIo] to compress a file into a single frame, or to decode
//! every frame of a file. Endpoints may also be standard input, standard
//! output or the null device, see [endpoint].

pub mod compress;
mod counting;
pub mod decompress;
pub mod endpoint;
pub mod engine;
pub mod error;
mod fileio;
pub mod format;
pub mod legacy;
pub mod notify;
mod prefs;

pub use compress::CompressStats;
pub use decompress::{decode_frame, DecodedFrame, DecompressStats};
pub use endpoint::{Confirm, Decline, TerminalPrompt, NUL_MARK, STDIN_MARK, STDOUT_MARK};
pub use engine::zstd::ZstdEngine;
pub use engine::{CompressSession, DecodeStatus, DecompressSession, Engine, EngineError, StreamStatus};
pub use error::{Error, Mode, Result};
pub use fileio::FileIo;
pub use format::{Format, LegacyVersion};
pub use legacy::{LegacyDecoder, ZstdLegacyDecoder};
pub use notify::{DisplayLevel, Notifier};
pub use prefs::Preferences;
