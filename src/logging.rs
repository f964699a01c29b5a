//! Explicit logging initialisation
//!
//! Nothing is logged anywhere until [`init`] is called: the library only
//! emits [`tracing`] events, the binary decides where they go.

use std::{
    error::Error as StdError,
    fmt,
    fs::OpenOptions,
    io,
    path::PathBuf,
    sync::Mutex,
};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    fmt as format, prelude::*, util::TryInitError, EnvFilter,
};

/// Default log file, appended to, in the working directory
pub const DEFAULT_LOG_FILE: &str = "email_sender.log";

/// Where log events go, and from which level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Log file, opened in append mode; `None` disables the file sink
    pub file: Option<PathBuf>,
    /// Most verbose level written to the file
    pub file_level: LevelFilter,
    /// Most verbose level written to stderr, unless `RUST_LOG` is set
    pub console_level: LevelFilter,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            file_level: LevelFilter::DEBUG,
            console_level: LevelFilter::INFO,
        }
    }
}

/// Failure to set up logging
#[derive(Debug)]
pub enum Error {
    /// The log file could not be opened
    File {
        /// Path of the log file
        path: PathBuf,
        /// Underlying i/o error
        source: io::Error,
    },
    /// A global subscriber was already installed
    Subscriber(TryInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::File { path, .. } => write!(f, "could not open log file {}", path.display()),
            Error::Subscriber(_) => f.write_str("logging is already initialised"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::File { source, .. } => Some(source),
            Error::Subscriber(e) => Some(e),
        }
    }
}

/// Installs the global subscriber: a plain text file sink and a stderr sink
///
/// Can only succeed once per process.
pub fn init(settings: &LogSettings) -> Result<(), Error> {
    let file = match settings.file {
        Some(ref path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| Error::File {
                    path: path.clone(),
                    source,
                })?;
            Some(
                format::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(settings.file_level),
            )
        }
        None => None,
    };

    let console_filter = EnvFilter::builder()
        .with_default_directive(settings.console_level.into())
        .from_env_lossy();
    let console = format::layer()
        .with_writer(io::stderr)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file)
        .with(console)
        .try_init()
        .map_err(Error::Subscriber)
}
