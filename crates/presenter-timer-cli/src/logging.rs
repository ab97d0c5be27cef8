//! Subscriber setup: a filtered stderr layer plus an error log in the data
//! directory that only receives warnings and errors.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use presenter_timer_core::storage::{data_dir, ERROR_LOG_FILE};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Filter directives, e.g. `PRESENTER_TIMER_LOG=presenter_timer_core=debug`.
pub const LOG_ENV: &str = "PRESENTER_TIMER_LOG";

/// The error log is moved to `errors.log.bak` past this size.
pub const MAX_ERROR_LOG_BYTES: u64 = 1024 * 1024;

pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .with_filter(filter);

    let error_log = data_dir().ok().map(|dir| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(ErrorLog::new(dir.join(ERROR_LOG_FILE)))
            .with_filter(LevelFilter::WARN)
    });

    let _ = tracing_subscriber::registry()
        .with(stderr)
        .with(error_log)
        .try_init();
}

/// Append-only log file with single-generation rotation.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    fn open(&self) -> io::Result<File> {
        if let Ok(meta) = fs::metadata(&self.path) {
            if meta.len() > MAX_ERROR_LOG_BYTES {
                fs::rename(&self.path, self.backup_path())?;
            }
        }
        OpenOptions::new().create(true).append(true).open(&self.path)
    }
}

/// Writer for one log record. Drops output if the file cannot be opened.
pub struct ErrorLogWriter(Option<File>);

impl Write for ErrorLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.0 {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.0 {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for ErrorLog {
    type Writer = ErrorLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ErrorLogWriter(self.open().ok())
    }
}
