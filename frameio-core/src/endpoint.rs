//! Endpoint resolution: turning source and destination names into streams.
//!
//! Besides real paths, three reserved names are understood: [`STDIN_MARK`],
//! [`STDOUT_MARK`] and [`NUL_MARK`].

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::notify::{DisplayLevel, Notifier};
use crate::prefs::Preferences;

pub const STDIN_MARK: &str = "stdin";
pub const STDOUT_MARK: &str = "stdout";
#[cfg(not(windows))]
pub const NUL_MARK: &str = "/dev/null";
#[cfg(windows)]
pub const NUL_MARK: &str = "nul";

/// Decides whether an existing destination may be replaced.
pub trait Confirm {
    fn confirm_overwrite(&mut self, path: &Path) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Path) -> bool,
{
    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        self(path)
    }
}

/// Reads the answer from standard input. Anything starting with `y` or `Y`
/// is a yes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm_overwrite(&mut self, _path: &Path) -> bool {
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.chars().next(), Some('y' | 'Y')),
            Err(_) => false,
        }
    }
}

/// Declines every overwrite.
#[derive(Debug, Default, Clone, Copy)]
pub struct Decline;

impl Confirm for Decline {
    fn confirm_overwrite(&mut self, _path: &Path) -> bool {
        false
    }
}

#[derive(Debug)]
pub enum Source {
    Stdin(io::Stdin),
    File(File),
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::Stdin(stdin) => stdin.read(buf),
            Source::File(file) => file.read(buf),
        }
    }
}

#[derive(Debug)]
pub enum Sink {
    Stdout(io::Stdout),
    File(BufWriter<File>),
    Discard(io::Sink),
}

impl Sink {
    /// Flush everything and release the stream, reporting any failure.
    ///
    /// Regular files are also synced to storage, so late write errors are
    /// reported here.
    pub fn close(self) -> io::Result<()> {
        match self {
            Sink::Stdout(mut stdout) => stdout.flush(),
            Sink::File(writer) => {
                let file = writer.into_inner().map_err(|err| err.into_error())?;
                if file.metadata()?.is_file() {
                    file.sync_all()?;
                }
                Ok(())
            }
            Sink::Discard(_) => Ok(()),
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout(stdout) => stdout.write(buf),
            Sink::File(file) => file.write(buf),
            Sink::Discard(sink) => sink.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Sink::Stdout(stdout) => stdout.write_all(buf),
            Sink::File(file) => file.write_all(buf),
            Sink::Discard(sink) => sink.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout(stdout) => stdout.flush(),
            Sink::File(file) => file.flush(),
            Sink::Discard(sink) => sink.flush(),
        }
    }
}

pub fn is_stdin(name: &Path) -> bool {
    name.as_os_str() == STDIN_MARK
}

pub fn is_stdout(name: &Path) -> bool {
    name.as_os_str() == STDOUT_MARK
}

pub fn is_null(name: &Path) -> bool {
    name.as_os_str() == NUL_MARK
}

/// Open both endpoints of one operation.
///
/// The source is opened first so a missing input never touches the
/// destination. An existing destination is only replaced when overwriting is
/// forced or `confirm` agrees; with a display level of
/// [`DisplayLevel::ERRORS`] or below nobody can be asked, so it is refused.
pub fn resolve(
    input: &Path,
    output: &Path,
    prefs: &Preferences,
    confirm: &mut dyn Confirm,
    notifier: &mut Notifier,
) -> Result<(Source, Sink)> {
    let source = if is_stdin(input) {
        tracing::debug!("using stdin for input");
        notifier.display(DisplayLevel::VERBOSE, format_args!("Using stdin for input\n"));
        Source::Stdin(io::stdin())
    } else {
        File::open(input)
            .map(Source::File)
            .map_err(|e| Error::OpenSource(e, input.to_path_buf()))?
    };

    let sink = if is_stdout(output) {
        tracing::debug!("using stdout for output");
        notifier.display(DisplayLevel::VERBOSE, format_args!("Using stdout for output\n"));
        Sink::Stdout(io::stdout())
    } else if is_null(output) {
        tracing::debug!("discarding output");
        Sink::Discard(io::sink())
    } else {
        if destination_exists(output) && !prefs.overwrite {
            if !prefs.display_level.is_interactive() {
                return Err(Error::DestinationExists(output.to_path_buf()));
            }

            notifier.display(
                DisplayLevel::RESULTS,
                format_args!("Warning : {} already exists\n", output.display()),
            );
            notifier.display(DisplayLevel::RESULTS, format_args!("Overwrite ? (Y/N) : "));

            if !confirm.confirm_overwrite(output) {
                return Err(Error::DestinationExists(output.to_path_buf()));
            }
        }

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(output)
            .map(|file| Sink::File(BufWriter::new(file)))
            .map_err(|e| Error::OpenDestination(e, output.to_path_buf()))?
    };

    tracing::debug!(input = %input.display(), output = %output.display(), "endpoints resolved");
    Ok((source, sink))
}

/// Probe the destination by opening it for reading; the handle is dropped
/// straight away.
fn destination_exists(path: &Path) -> bool {
    File::open(path).is_ok()
}

/// Size of the source if it is a regular file, otherwise 0.
pub fn file_size(input: &Path) -> u64 {
    if is_stdin(input) {
        return 0;
    }

    match std::fs::metadata(input) {
        Ok(meta) if meta.is_file() => meta.len(),
        Ok(_) => 0,
        Err(err) => {
            tracing::warn!(error = %err, path = %input.display(), "cannot stat source");
            0
        }
    }
}

/// Read until `buf` is full or the reader is exhausted. Returns the number of
/// bytes read, which is only short of `buf.len()` at end of input.
pub fn fill<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}

/// Allocate a zeroed buffer of exactly `len` bytes, or `None` if the memory
/// is not available.
pub(crate) fn alloc_buffer(len: usize) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).ok()?;
    buf.resize(len, 0);
    Some(buf)
}
