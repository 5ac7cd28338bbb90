use std::fmt;
use std::path::Path;

use crate::compress::{compress_file, CompressStats};
use crate::decompress::{decompress_file, DecompressStats};
use crate::endpoint::{Confirm, TerminalPrompt};
use crate::engine::zstd::ZstdEngine;
use crate::engine::Engine;
use crate::error::Result;
use crate::legacy::{LegacyDecoder, ZstdLegacyDecoder};
use crate::notify::Notifier;
use crate::prefs::Preferences;

/// Whole-file compression and decompression over a streaming [`Engine`].
///
/// ```no_run
/// use frameio_core::{FileIo, Preferences};
///
/// let mut io = FileIo::new(Preferences::default());
/// let stats = io.compress_filename("data.txt.zst", "data.txt", 3)?;
/// io.decompress_filename("data.copy.txt", "data.txt.zst")?;
/// println!("{} -> {}", stats.read, stats.written);
/// # Ok::<(), frameio_core::Error>(())
/// ```
pub struct FileIo<E: Engine = ZstdEngine> {
    engine: E,
    prefs: Preferences,
    confirm: Box<dyn Confirm>,
    legacy: Box<dyn LegacyDecoder>,
    notifier: Notifier,
}

impl<E: Engine> fmt::Debug for FileIo<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileIo")
            .field("prefs", &self.prefs)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl FileIo<ZstdEngine> {
    pub fn new(prefs: Preferences) -> Self {
        FileIo::with_engine(ZstdEngine, prefs)
    }
}

impl<E: Engine> FileIo<E> {
    /// Uses `engine` for all operations. Overwrites are confirmed on the
    /// terminal and notifications go to stderr.
    pub fn with_engine(engine: E, prefs: Preferences) -> Self {
        FileIo {
            engine,
            prefs,
            confirm: Box::new(TerminalPrompt),
            legacy: Box::new(ZstdLegacyDecoder::new()),
            notifier: Notifier::new(prefs.display_level),
        }
    }

    pub fn confirm_with<C: Confirm + 'static>(mut self, confirm: C) -> Self {
        self.confirm = Box::new(confirm);
        self
    }

    pub fn legacy_with<L: LegacyDecoder + 'static>(mut self, legacy: L) -> Self {
        self.legacy = Box::new(legacy);
        self
    }

    pub fn notify_with(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Compress `input` into a single frame written to `output`.
    ///
    /// Either name may be one of the reserved endpoint names, see
    /// [`crate::endpoint`].
    pub fn compress_filename(
        &mut self,
        output: impl AsRef<Path>,
        input: impl AsRef<Path>,
        level: i32,
    ) -> Result<CompressStats> {
        let (output, input) = (output.as_ref(), input.as_ref());
        tracing::debug!(input = %input.display(), output = %output.display(), level, "compress");

        compress_file(
            &self.engine,
            &self.prefs,
            self.confirm.as_mut(),
            &mut self.notifier,
            output,
            input,
            level,
        )
    }

    /// Decode every frame of `input`, current or legacy, into `output`.
    pub fn decompress_filename(
        &mut self,
        output: impl AsRef<Path>,
        input: impl AsRef<Path>,
    ) -> Result<DecompressStats> {
        let (output, input) = (output.as_ref(), input.as_ref());
        tracing::debug!(input = %input.display(), output = %output.display(), "decompress");

        decompress_file(
            &self.engine,
            &self.prefs,
            self.confirm.as_mut(),
            self.legacy.as_mut(),
            &mut self.notifier,
            output,
            input,
        )
    }
}
