use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};

use super::record::{AggregateRecord, PriceEvent};
use crate::common::{
    mean_exception::MeanError,
    utils::{is_valid_price, storage_name},
};
use crate::config::mean_config::MeanConfig;
use crate::window::{price_window::Means, window_store::WindowStore};

/// Entry point of the aggregator: feeds each price into its symbol's window
/// and reports the arithmetic, geometric and harmonic means of that window.
///
/// `Aggregator` is `Sync`; share it behind an `Arc` between the workers of a
/// partitioned source. Per-symbol updates are applied in call order.
#[derive(Debug)]
pub struct Aggregator {
    store: WindowStore,
}

impl Aggregator {
    pub fn new(conf: &MeanConfig) -> Self {
        Self::with_window_size(conf.window_size)
    }

    pub fn with_window_size(window_size: NonZeroUsize) -> Self {
        Self {
            store: WindowStore::new(window_size),
        }
    }

    /// Apply one price to `symbol`'s window.
    ///
    /// The window is updated exactly once: eviction, all three running sums
    /// and the insertion happen together under the symbol's lock. A price
    /// that is not strictly positive is rejected with `INVALID_PRICE` and
    /// leaves every window unchanged.
    pub fn observe(
        &self,
        symbol: &str,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<AggregateRecord, MeanError> {
        let means = self.update(symbol, price)?;
        Ok(AggregateRecord::new(symbol, symbol, price, timestamp, means))
    }

    /// Same as [`Aggregator::observe`], keyed by the event id and carrying
    /// the event's name in storage form.
    pub fn observe_event(&self, event: &PriceEvent) -> Result<AggregateRecord, MeanError> {
        let means = self.update(&event.id, event.price)?;
        Ok(AggregateRecord::new(
            event.id.as_str(),
            storage_name(&event.name),
            event.price,
            event.timestamp,
            means,
        ))
    }

    fn update(&self, symbol: &str, price: f64) -> Result<Means, MeanError> {
        // Reject before resolving so a bad first price does not create a window.
        if !is_valid_price(price) {
            return Err(MeanError::invalid_price(symbol, price));
        }
        self.store
            .with_window(symbol, |window| window.observe(price))
            .map_err(|e| MeanError::new(format!("{}: {}", symbol, e.msg), e.errcode))
    }

    /// Latest means of `symbol`, `None` if it has never been observed
    pub fn current(&self, symbol: &str) -> Option<Means> {
        self.store.peek(symbol, |window| window.means()).flatten()
    }

    pub fn window_size(&self) -> usize {
        self.store.capacity()
    }

    pub fn symbol_count(&self) -> usize {
        self.store.len()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.store.symbols()
    }
}
