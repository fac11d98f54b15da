//! Data-export collaborators: CSV sink and an in-memory sink for tests.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Export collaborator receiving one flattened state record per timestep.
///
/// Implementations must not assume anything about the simulation; failures
/// are reported through the `io::Result` and handled by the caller without
/// rolling back physical state.
pub trait DataSink {
    /// Consumes one flattened key/value record.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the record cannot be written.
    fn transfer_data(&mut self, record: &[(&'static str, f64)]) -> io::Result<()>;
}

/// CSV sink writing a header from the first record's keys, then one row per
/// record. Produces deterministic output for identical inputs.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    header: Option<Vec<&'static str>>,
}

impl CsvSink<io::BufWriter<File>> {
    /// Creates a CSV sink writing to the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the file cannot be created.
    pub fn to_path(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(io::BufWriter::new(file)))
    }
}

impl<W: Write> CsvSink<W> {
    /// Creates a CSV sink over any writer.
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().from_writer(writer),
            header: None,
        }
    }

    /// Flushes buffered rows to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if flushing fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<W: Write> DataSink for CsvSink<W> {
    fn transfer_data(&mut self, record: &[(&'static str, f64)]) -> io::Result<()> {
        let keys: Vec<&'static str> = record.iter().map(|(k, _)| *k).collect();
        match &self.header {
            None => {
                self.writer.write_record(&keys)?;
                self.header = Some(keys);
            }
            Some(header) if *header != keys => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "record keys do not match the established CSV header",
                ));
            }
            Some(_) => {}
        }

        self.writer
            .write_record(record.iter().map(|(_, v)| format!("{v:.6}")))?;
        Ok(())
    }
}

/// In-memory sink capturing every record, for tests and analysis.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// All records received so far, in order.
    pub records: Vec<Vec<(String, f64)>>,
}

impl DataSink for MemorySink {
    fn transfer_data(&mut self, record: &[(&'static str, f64)]) -> io::Result<()> {
        self.records
            .push(record.iter().map(|(k, v)| (k.to_string(), *v)).collect());
        Ok(())
    }
}

/// Sink discarding every record, for runs without an export target.
#[derive(Debug, Default)]
pub struct NullSink;

impl DataSink for NullSink {
    fn transfer_data(&mut self, _record: &[(&'static str, f64)]) -> io::Result<()> {
        Ok(())
    }
}

/// Sink that fails every transfer, for exercising export error handling.
#[derive(Debug, Default)]
pub struct FailingSink;

impl DataSink for FailingSink {
    fn transfer_data(&mut self, _record: &[(&'static str, f64)]) -> io::Result<()> {
        Err(io::Error::other("sink unavailable"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<(&'static str, f64)> {
        vec![("time_s", 0.0), ("soc", 0.25), ("power_w", -125.5)]
    }

    #[test]
    fn csv_header_comes_from_first_record() {
        let mut buf = Vec::new();
        {
            let mut sink = CsvSink::from_writer(&mut buf);
            sink.transfer_data(&sample()).unwrap();
            sink.flush().unwrap();
        }
        let out = String::from_utf8(buf).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("time_s,soc,power_w"));
        assert_eq!(lines.next(), Some("0.000000,0.250000,-125.500000"));
    }

    #[test]
    fn csv_row_count_matches_record_count() {
        let mut buf = Vec::new();
        {
            let mut sink = CsvSink::from_writer(&mut buf);
            for _ in 0..24 {
                sink.transfer_data(&sample()).unwrap();
            }
            sink.flush().unwrap();
        }
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out.lines().count(), 25);
    }

    #[test]
    fn csv_rejects_changed_record_shape() {
        let mut buf = Vec::new();
        let mut sink = CsvSink::from_writer(&mut buf);
        sink.transfer_data(&sample()).unwrap();
        let err = sink.transfer_data(&[("other", 1.0)]);
        assert!(err.is_err());
    }

    #[test]
    fn csv_output_is_deterministic() {
        let write = || {
            let mut buf = Vec::new();
            let mut sink = CsvSink::from_writer(&mut buf);
            for _ in 0..5 {
                sink.transfer_data(&sample()).unwrap();
            }
            sink.flush().unwrap();
            drop(sink);
            buf
        };
        assert_eq!(write(), write());
    }

    #[test]
    fn memory_sink_captures_records_in_order() {
        let mut sink = MemorySink::default();
        sink.transfer_data(&[("a", 1.0)]).unwrap();
        sink.transfer_data(&[("a", 2.0)]).unwrap();
        assert_eq!(sink.records.len(), 2);
        assert_eq!(sink.records[1][0], ("a".to_string(), 2.0));
    }

    #[test]
    fn failing_sink_reports_errors() {
        let mut sink = FailingSink;
        assert!(sink.transfer_data(&sample()).is_err());
    }
}
