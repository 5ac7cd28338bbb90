use std::path::PathBuf;

use miette::Diagnostic;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum Error {
    #[error("Output already exists: `{}`", path.display())]
    #[diagnostic(help("Use -f/--force to overwrite"))]
    DestinationExists {
        path: PathBuf,
        #[source]
        source: frameio_core::Error,
    },

    #[error("Cannot compress `{}`", path.display())]
    Compress {
        path: PathBuf,
        #[source]
        source: frameio_core::Error,
    },

    #[error("Cannot decompress `{}`", path.display())]
    #[diagnostic(help("Is this a valid .zst file?"))]
    Decompress {
        path: PathBuf,
        #[source]
        source: frameio_core::Error,
    },

    #[error("Cannot guess the output name for `{}`", path.display())]
    #[diagnostic(help("Name the output with -o, or write to standard output with -c"))]
    UnknownSuffix { path: PathBuf },
}

impl Error {
    pub fn compress(path: PathBuf, source: frameio_core::Error) -> Self {
        if let frameio_core::Error::DestinationExists(output) = &source {
            let path = output.clone();
            return Error::DestinationExists { path, source };
        }

        Error::Compress { path, source }
    }

    pub fn decompress(path: PathBuf, source: frameio_core::Error) -> Self {
        if let frameio_core::Error::DestinationExists(output) = &source {
            let path = output.clone();
            return Error::DestinationExists { path, source };
        }

        Error::Decompress { path, source }
    }

    /// The process exit code, taken from the library error where there is one.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::DestinationExists { source, .. }
            | Error::Compress { source, .. }
            | Error::Decompress { source, .. } => source.exit_code(),
            Error::UnknownSuffix { .. } => 1,
        }
    }
}
