pub mod aggregator;
pub mod record;
