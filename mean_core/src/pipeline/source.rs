use crate::aggregator::record::{AggregateRecord, PriceEvent};
use crate::common::mean_exception::MeanError;

/// What a poll of a price source can yield
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// A decoded price update
    Price(PriceEvent),
    /// The source has caught up with the end of its partition for now
    EndOfPartition,
    /// A message arrived but could not be decoded; it is skipped
    Malformed { reason: String },
    /// The source failed and cannot continue
    Error(MeanError),
}

/// An ordered stream of price events, e.g. one partition of a topic
pub trait PriceSource {
    /// Partition label used in logs
    fn partition(&self) -> &str;

    /// Next event, or `None` once the source is closed
    fn poll(&mut self) -> Option<SourceEvent>;

    /// Acknowledge everything polled so far
    fn commit(&mut self) -> Result<(), MeanError>;
}

/// Durable destination for aggregate records.
///
/// Shared between every worker, so implementations synchronise internally.
pub trait RecordSink: Send + Sync {
    fn insert(&self, record: &AggregateRecord) -> Result<(), MeanError>;

    fn flush(&self) -> Result<(), MeanError> {
        Ok(())
    }
}
