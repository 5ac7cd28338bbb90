//! User-facing notifications on stderr.
//!
//! This is not diagnostics logging (that goes through `tracing`); it is the
//! result, warning, prompt and progress text a person running the tool sees,
//! gated by a [`DisplayLevel`].

use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};

/// Minimum time between two progress updates below [`DisplayLevel::VERBOSE`].
pub const REFRESH_RATE: Duration = Duration::from_millis(150);

/// Notification verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DisplayLevel(u8);

impl DisplayLevel {
    /// Nothing at all.
    pub const SILENT: DisplayLevel = DisplayLevel(0);
    /// Errors only. No interaction is possible at or below this level.
    pub const ERRORS: DisplayLevel = DisplayLevel(1);
    /// Results, interaction and warnings.
    pub const RESULTS: DisplayLevel = DisplayLevel(2);
    /// Progress.
    pub const PROGRESS: DisplayLevel = DisplayLevel(3);
    /// Everything, with every progress update shown.
    pub const VERBOSE: DisplayLevel = DisplayLevel(4);

    /// Values above 4 are clamped.
    pub const fn new(level: u8) -> DisplayLevel {
        if level > 4 {
            DisplayLevel(4)
        } else {
            DisplayLevel(level)
        }
    }

    /// Whether messages of `level` are shown at this verbosity.
    pub fn allows(self, level: DisplayLevel) -> bool {
        self >= level
    }

    pub fn is_interactive(self) -> bool {
        self > DisplayLevel::ERRORS
    }
}

impl Default for DisplayLevel {
    fn default() -> Self {
        DisplayLevel::RESULTS
    }
}

pub struct Notifier {
    level: DisplayLevel,
    refresh: Duration,
    last_update: Option<Instant>,
    out: Box<dyn Write + Send>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("level", &self.level)
            .field("refresh", &self.refresh)
            .field("last_update", &self.last_update)
            .finish_non_exhaustive()
    }
}

impl Notifier {
    pub fn new(level: DisplayLevel) -> Notifier {
        Notifier::with_writer(level, std::io::stderr())
    }

    pub fn with_writer<W: Write + Send + 'static>(level: DisplayLevel, out: W) -> Notifier {
        Notifier {
            level,
            refresh: REFRESH_RATE,
            last_update: None,
            out: Box::new(out),
        }
    }

    /// Show a message if the verbosity allows `level`.
    pub fn display(&mut self, level: DisplayLevel, args: fmt::Arguments<'_>) {
        if self.level.allows(level) {
            let _ = self.out.write_fmt(args);
            let _ = self.out.flush();
        }
    }

    /// Show a progress message, at most once per refresh period unless the
    /// verbosity is [`DisplayLevel::VERBOSE`].
    pub fn update(&mut self, level: DisplayLevel, args: fmt::Arguments<'_>) {
        if !self.level.allows(level) {
            return;
        }

        let now = Instant::now();
        let due = match self.last_update {
            None => true,
            Some(last) => now.duration_since(last) > self.refresh,
        };

        if due || self.level.allows(DisplayLevel::VERBOSE) {
            self.last_update = Some(now);
            let _ = self.out.write_fmt(args);
            let _ = self.out.flush();
        }
    }

    /// Blank out the current progress line.
    pub fn clear_line(&mut self) {
        self.display(DisplayLevel::RESULTS, format_args!("\r{:79}\r", ""));
    }
}

/// Human-readable byte count for progress lines.
pub(crate) fn format_size(bytes: u64) -> String {
    use humansize::{file_size_opts as options, FileSize};

    bytes
        .file_size(options::BINARY)
        .unwrap_or_else(|_| format!("{} B", bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn levels_are_clamped_and_ordered() {
        assert_eq!(DisplayLevel::new(9), DisplayLevel::VERBOSE);
        assert!(DisplayLevel::PROGRESS.allows(DisplayLevel::RESULTS));
        assert!(!DisplayLevel::ERRORS.allows(DisplayLevel::RESULTS));
        assert!(!DisplayLevel::ERRORS.is_interactive());
        assert!(DisplayLevel::default().is_interactive());
    }

    #[test]
    fn display_respects_level() {
        let buf = SharedBuf::default();
        let mut notifier = Notifier::with_writer(DisplayLevel::RESULTS, buf.clone());

        notifier.display(DisplayLevel::RESULTS, format_args!("shown\n"));
        notifier.display(DisplayLevel::VERBOSE, format_args!("hidden\n"));

        assert_eq!(buf.text(), "shown\n");
    }

    #[test]
    fn updates_are_throttled() {
        let buf = SharedBuf::default();
        let mut notifier = Notifier::with_writer(DisplayLevel::PROGRESS, buf.clone());
        notifier.refresh = Duration::from_secs(3600);

        notifier.update(DisplayLevel::RESULTS, format_args!("a"));
        notifier.update(DisplayLevel::RESULTS, format_args!("b"));
        notifier.update(DisplayLevel::RESULTS, format_args!("c"));

        assert_eq!(buf.text(), "a");
    }

    #[test]
    fn verbose_shows_every_update() {
        let buf = SharedBuf::default();
        let mut notifier = Notifier::with_writer(DisplayLevel::VERBOSE, buf.clone());
        notifier.refresh = Duration::from_secs(3600);

        notifier.update(DisplayLevel::RESULTS, format_args!("a"));
        notifier.update(DisplayLevel::RESULTS, format_args!("b"));

        assert_eq!(buf.text(), "ab");
    }

    #[test]
    fn sizes_are_binary_units() {
        assert_eq!(format_size(512), "512 B");
        assert!(format_size(3 * 1024 * 1024).ends_with("MiB"));
    }

    #[test]
    fn silent_shows_nothing() {
        let buf = SharedBuf::default();
        let mut notifier = Notifier::with_writer(DisplayLevel::SILENT, buf.clone());

        notifier.display(DisplayLevel::ERRORS, format_args!("error"));
        notifier.update(DisplayLevel::RESULTS, format_args!("progress"));
        notifier.clear_line();

        assert_eq!(buf.text(), "");
    }
}
