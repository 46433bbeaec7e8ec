use std::num::NonZeroUsize;

use tracing::{debug, error, info, warn};

use super::source::{PriceSource, RecordSink, SourceEvent};
use crate::aggregator::aggregator::Aggregator;
use crate::common::mean_exception::MeanError;

/// Counters for one run of [`consume`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumeStats {
    /// Price messages polled
    pub read: u64,
    /// Records accepted by the sink
    pub stored: u64,
    /// Prices rejected by the aggregator
    pub rejected: u64,
    /// Messages that could not be decoded
    pub malformed: u64,
    /// Records the sink failed to store
    pub sink_failures: u64,
    /// Successful source commits
    pub commits: u64,
}

impl ConsumeStats {
    pub fn merge(&mut self, other: &ConsumeStats) {
        self.read += other.read;
        self.stored += other.stored;
        self.rejected += other.rejected;
        self.malformed += other.malformed;
        self.sink_failures += other.sink_failures;
        self.commits += other.commits;
    }
}

/// Drain `source` through `aggregator` into `sink`.
///
/// The source is committed after every `commit_interval` price messages and
/// once more when it closes. Rejected prices and sink failures are logged and
/// skipped; a message is never observed twice. A source error stops the loop
/// and is returned after the sink is flushed.
pub fn consume<S: PriceSource + ?Sized>(
    source: &mut S,
    aggregator: &Aggregator,
    sink: &dyn RecordSink,
    commit_interval: NonZeroUsize,
) -> Result<ConsumeStats, MeanError> {
    let mut stats = ConsumeStats::default();
    let partition = source.partition().to_string();
    info!(partition = %partition, "consuming price events");

    while let Some(event) = source.poll() {
        match event {
            SourceEvent::Price(price_event) => {
                stats.read += 1;
                if stats.read % commit_interval.get() as u64 == 0 {
                    commit(source, &partition, &mut stats);
                }

                let record = match aggregator.observe_event(&price_event) {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(partition = %partition, symbol = %price_event.id, "{}", e);
                        stats.rejected += 1;
                        continue;
                    }
                };
                match sink.insert(&record) {
                    Ok(()) => stats.stored += 1,
                    Err(e) => {
                        error!(partition = %partition, symbol = %record.symbol, "couldn't store record: {}", e);
                        stats.sink_failures += 1;
                    }
                }
                debug!(partition = %partition, read = stats.read, "messages read");
            }
            SourceEvent::EndOfPartition => {
                info!(partition = %partition, read = stats.read, "reached end of partition");
            }
            SourceEvent::Malformed { reason } => {
                warn!(partition = %partition, "skipping malformed message: {}", reason);
                stats.malformed += 1;
            }
            SourceEvent::Error(e) => {
                error!(partition = %partition, "source failed: {}", e);
                flush(sink, &partition);
                return Err(e);
            }
        }
    }

    commit(source, &partition, &mut stats);
    flush(sink, &partition);
    info!(
        partition = %partition,
        read = stats.read,
        stored = stats.stored,
        rejected = stats.rejected,
        malformed = stats.malformed,
        "source closed"
    );
    Ok(stats)
}

fn commit<S: PriceSource + ?Sized>(source: &mut S, partition: &str, stats: &mut ConsumeStats) {
    match source.commit() {
        Ok(()) => stats.commits += 1,
        Err(e) => warn!(partition = %partition, "commit failed: {}", e),
    }
}

fn flush(sink: &dyn RecordSink, partition: &str) {
    if let Err(e) = sink.flush() {
        error!(partition = %partition, "couldn't flush sink: {}", e);
    }
}
