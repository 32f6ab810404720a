use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Level;

use crate::error::{DesktopError, Result};

/// Destination for one formatted log record.
pub enum DelegatingWriter {
    File(Arc<Mutex<File>>),
    Discard(io::Sink),
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            DelegatingWriter::File(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .write(buf),
            DelegatingWriter::Discard(sink) => sink.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            DelegatingWriter::File(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .flush(),
            DelegatingWriter::Discard(sink) => sink.flush(),
        }
    }
}

/// Hands the subscriber a writer per record. The desktop owns the terminal,
/// so records go to a file or nowhere, never to stdout or stderr.
#[derive(Clone, Debug, Default)]
pub struct SubscriberMakeWriter {
    file: Option<Arc<Mutex<File>>>,
}

impl SubscriberMakeWriter {
    pub fn to_file(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| DesktopError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            file: Some(Arc::new(Mutex::new(file))),
        })
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        match &self.file {
            Some(file) => DelegatingWriter::File(Arc::clone(file)),
            None => DelegatingWriter::Discard(io::sink()),
        }
    }
}

/// Install the global subscriber. Without `log_file` every record is
/// dropped. Calling this again leaves the first subscriber in place.
pub fn init(log_file: Option<&Path>, level: Level) -> Result<()> {
    let writer = match log_file {
        Some(path) => SubscriberMakeWriter::to_file(path)?,
        None => SubscriberMakeWriter::default(),
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
    Ok(())
}
