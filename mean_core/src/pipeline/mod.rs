pub mod consumer;
pub mod source;

pub use consumer::{consume, ConsumeStats};
pub use source::{PriceSource, RecordSink, SourceEvent};
