use std::fs::File;
use std::io::Read;
use std::path::Path;

use mean_core::common::{
    mean_exception::{ErrCode, MeanError},
    time::parse_timestamp,
};
use mean_core::pipeline::{PriceSource, SourceEvent};
use mean_core::PriceEvent;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    name: String,
    price: f64,
    timestamp: String,
}

/// One CSV file of `id,name,price,timestamp` rows, read as a single partition
pub struct CsvPriceSource<R: Read> {
    partition: String,
    rows: csv::DeserializeRecordsIntoIter<R, CsvRow>,
    polled: u64,
    committed: u64,
    reached_end: bool,
}

impl CsvPriceSource<File> {
    pub fn open(path: &Path) -> Result<Self, MeanError> {
        let file = File::open(path).map_err(|e| {
            MeanError::new(
                format!("cannot open {}: {}", path.display(), e),
                ErrCode::SourceError,
            )
        })?;
        Ok(Self::from_reader(path.display().to_string(), file))
    }
}

impl<R: Read> CsvPriceSource<R> {
    pub fn from_reader(partition: impl Into<String>, reader: R) -> Self {
        let rows = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_deserialize();
        Self {
            partition: partition.into(),
            rows,
            polled: 0,
            committed: 0,
            reached_end: false,
        }
    }

    /// Rows acknowledged by the last commit
    #[cfg(test)]
    pub fn committed(&self) -> u64 {
        self.committed
    }

    fn decode(row: CsvRow) -> SourceEvent {
        match parse_timestamp(&row.timestamp) {
            Ok(timestamp) => SourceEvent::Price(PriceEvent {
                id: row.id,
                name: row.name,
                price: row.price,
                timestamp,
            }),
            Err(e) => SourceEvent::Malformed {
                reason: e.to_string(),
            },
        }
    }
}

impl<R: Read> PriceSource for CsvPriceSource<R> {
    fn partition(&self) -> &str {
        &self.partition
    }

    fn poll(&mut self) -> Option<SourceEvent> {
        match self.rows.next() {
            Some(Ok(row)) => {
                self.polled += 1;
                Some(Self::decode(row))
            }
            Some(Err(e)) if e.is_io_error() => Some(SourceEvent::Error(MeanError::new(
                format!("reading {} failed: {}", self.partition, e),
                ErrCode::SourceError,
            ))),
            Some(Err(e)) => {
                self.polled += 1;
                Some(SourceEvent::Malformed {
                    reason: e.to_string(),
                })
            }
            None if !self.reached_end => {
                self.reached_end = true;
                Some(SourceEvent::EndOfPartition)
            }
            None => None,
        }
    }

    fn commit(&mut self) -> Result<(), MeanError> {
        self.committed = self.polled;
        debug!(partition = %self.partition, offset = self.committed, "committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: &str = "id,name,price,timestamp
bitcoin,Bitcoin,42000.5,1672531200
ethereum,Ethereum,not-a-price,1672531200
bitcoin-cash, Bitcoin Cash ,250,2023-01-01 00:00:05
ethereum,Ethereum,1200,sometime
";

    #[test]
    fn test_poll_decodes_rows_then_ends() {
        let mut source = CsvPriceSource::from_reader("mem", ROWS.as_bytes());
        assert_eq!(source.partition(), "mem");

        match source.poll() {
            Some(SourceEvent::Price(event)) => {
                assert_eq!(event.id, "bitcoin");
                assert_eq!(event.price, 42000.5);
                assert_eq!(event.timestamp.timestamp(), 1672531200);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(source.poll(), Some(SourceEvent::Malformed { .. })));
        match source.poll() {
            Some(SourceEvent::Price(event)) => {
                assert_eq!(event.name, "Bitcoin Cash");
                assert_eq!(event.timestamp.timestamp(), 1672531205);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(source.poll(), Some(SourceEvent::Malformed { .. })));
        assert_eq!(source.poll(), Some(SourceEvent::EndOfPartition));
        assert_eq!(source.poll(), None);
    }

    #[test]
    fn test_commit_tracks_polled_rows() {
        let mut source = CsvPriceSource::from_reader("mem", ROWS.as_bytes());
        source.poll();
        source.poll();
        source.commit().unwrap();
        assert_eq!(source.committed(), 2);
    }

    #[test]
    fn test_open_missing_file() {
        let err = match CsvPriceSource::open(Path::new("/definitely/not/here.csv")) {
            Err(e) => e,
            Ok(_) => panic!("expected error"),
        };
        assert_eq!(err.errcode, ErrCode::SourceError);
    }
}
