//! JSON-lines destination writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tunetag_core::{Error, Record, Result};

/// Buffered writer producing one JSON object per line.
///
/// Creating the writer truncates any existing file at the path.
pub struct JsonlWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    lines_written: u64,
    bytes_written: u64,
}

impl JsonlWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| Error::destination_unwritable(&path, e))?;

        debug!("Opened destination {}", path.display());

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            lines_written: 0,
            bytes_written: 0,
        })
    }

    /// Serialize `record` and write it followed by a newline
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let json = record.to_json_line()?;
        let line = format!("{}\n", json);
        let bytes = line.as_bytes();

        self.writer
            .write_all(bytes)
            .map_err(|e| Error::destination_unwritable(&self.path, e))?;
        self.lines_written += 1;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush buffered lines to disk, returning the number of lines written
    pub fn finish(mut self) -> Result<u64> {
        self.writer
            .flush()
            .map_err(|e| Error::destination_unwritable(&self.path, e))?;
        debug!(
            "Flushed {} lines ({} bytes) to {}",
            self.lines_written,
            self.bytes_written,
            self.path.display()
        );
        Ok(self.lines_written)
    }
}
