use std::io::Write;

use clap::ValueEnum;
use mean_core::common::{
    mean_exception::{ErrCode, MeanError},
    time,
};
use mean_core::pipeline::RecordSink;
use mean_core::AggregateRecord;
use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Jsonl,
}

/// Stored shape of a record
#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    id: &'a str,
    name: &'a str,
    price: f64,
    timestamp: String,
    arithmetic_mean: f64,
    geometric_mean: f64,
    harmonic_mean: f64,
}

impl<'a> From<&'a AggregateRecord> for OutputRow<'a> {
    fn from(record: &'a AggregateRecord) -> Self {
        Self {
            id: &record.symbol,
            name: &record.name,
            price: record.price,
            timestamp: time::to_str(&record.timestamp),
            arithmetic_mean: record.arithmetic_mean,
            geometric_mean: record.geometric_mean,
            harmonic_mean: record.harmonic_mean,
        }
    }
}

fn sink_error(e: impl std::fmt::Display) -> MeanError {
    MeanError::new(format!("couldn't insert record: {}", e), ErrCode::SinkError)
}

/// CSV file with a header row
pub struct CsvSink<W: Write + Send> {
    writer: Mutex<csv::Writer<W>>,
}

impl<W: Write + Send> CsvSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Mutex::new(csv::Writer::from_writer(inner)),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> Result<W, MeanError> {
        self.writer.into_inner().into_inner().map_err(sink_error)
    }
}

impl<W: Write + Send> RecordSink for CsvSink<W> {
    fn insert(&self, record: &AggregateRecord) -> Result<(), MeanError> {
        self.writer
            .lock()
            .serialize(OutputRow::from(record))
            .map_err(sink_error)
    }

    fn flush(&self) -> Result<(), MeanError> {
        self.writer.lock().flush().map_err(sink_error)
    }
}

/// One JSON object per line
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Mutex::new(inner),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> RecordSink for JsonLinesSink<W> {
    fn insert(&self, record: &AggregateRecord) -> Result<(), MeanError> {
        let line = serde_json::to_string(&OutputRow::from(record)).map_err(sink_error)?;
        writeln!(self.writer.lock(), "{}", line).map_err(sink_error)
    }

    fn flush(&self) -> Result<(), MeanError> {
        self.writer.lock().flush().map_err(sink_error)
    }
}

pub fn build_sink(format: OutputFormat, out: Box<dyn Write + Send>) -> Box<dyn RecordSink> {
    match format {
        OutputFormat::Csv => Box::new(CsvSink::new(out)),
        OutputFormat::Jsonl => Box::new(JsonLinesSink::new(out)),
    }
}
