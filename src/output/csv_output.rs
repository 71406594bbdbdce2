//! CSV writer for probe results
//!
//! The sink is the only writer of the output; CSV rows cannot be interleaved,
//! so exactly one instance exists per run.

use crate::output::record::{OutputRecord, HEADER};
use crate::state::Resource;
use crate::CheckerError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one CSV row per resource, after a single header row
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    written: u64,
}

impl CsvSink<BufWriter<File>> {
    /// Creates (or truncates) the output file and writes the header
    pub fn create(path: &Path) -> Result<Self, CheckerError> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps a writer and immediately writes the header row
    pub fn new(inner: W) -> Result<Self, CheckerError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(HEADER)?;

        Ok(Self { writer, written: 0 })
    }

    /// Writes one resource as a row
    pub fn write(&mut self, resource: &Resource) -> Result<(), CheckerError> {
        self.writer.serialize(OutputRecord::from(resource))?;
        self.written += 1;
        Ok(())
    }

    /// Number of data rows written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn flush(&mut self) -> Result<(), CheckerError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> Result<W, CheckerError> {
        self.writer
            .into_inner()
            .map_err(|e| CheckerError::Io(e.into_error()))
    }
}
