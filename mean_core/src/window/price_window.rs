use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::common::{enums::MeanType, mean_exception::MeanError, utils::is_valid_price};
use crate::math::{arithmetic::LinearSum, geometric::LogSum, harmonic::ReciprocalSum};
use crate::traits::mean_trait::MeanAccumulator;

/// The three means of one window, read from a single snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Means {
    pub arithmetic: f64,
    pub geometric: f64,
    pub harmonic: f64,
}

impl Means {
    pub fn get(&self, mean_type: MeanType) -> f64 {
        match mean_type {
            MeanType::Arithmetic => self.arithmetic,
            MeanType::Geometric => self.geometric,
            MeanType::Harmonic => self.harmonic,
        }
    }
}

impl fmt::Display for Means {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mean_type) in MeanType::iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}={}", mean_type, self.get(mean_type))?;
        }
        Ok(())
    }
}

/// Bounded FIFO of the most recent prices of one symbol, with the running
/// sums needed to read all three means in O(1).
///
/// The observation count is `values.len()`; the sums always cover exactly
/// the prices in `values`.
#[derive(Debug, Clone)]
pub struct PriceWindow {
    capacity: NonZeroUsize,
    values: VecDeque<f64>,
    linear: LinearSum,
    log: LogSum,
    reciprocal: ReciprocalSum,
}

impl PriceWindow {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity.get()),
            linear: LinearSum::new(),
            log: LogSum::new(),
            reciprocal: ReciprocalSum::new(),
        }
    }

    fn accumulators(&self) -> [&dyn MeanAccumulator; 3] {
        [&self.linear, &self.log, &self.reciprocal]
    }

    fn accumulators_mut(&mut self) -> [&mut dyn MeanAccumulator; 3] {
        [&mut self.linear, &mut self.log, &mut self.reciprocal]
    }

    /// Push a price into the window and return the means of the updated window.
    ///
    /// A full window evicts its oldest price first, removing it from every
    /// running sum before the new price is added. A price whose terms would
    /// take any running sum out of the finite range is rejected, and a
    /// rejected price leaves the window untouched.
    pub fn observe(&mut self, price: f64) -> Result<Means, MeanError> {
        if !is_valid_price(price) {
            return Err(MeanError::invalid_price("window", price));
        }

        let evicted = if self.is_full() {
            self.values.front().copied()
        } else {
            None
        };
        // An empty window starts its sums from scratch so a single retained
        // price reads back exactly, whatever was subtracted before.
        let restart = self.values.len() == usize::from(evicted.is_some());
        let fits = self
            .accumulators()
            .iter()
            .all(|acc| acc.preview(evicted, price, restart).is_finite());
        if !fits {
            return Err(MeanError::price_overflow("window", price));
        }

        if let Some(evicted) = evicted {
            self.values.pop_front();
            evict(&mut self.linear, &self.values, evicted);
            evict(&mut self.log, &self.values, evicted);
            evict(&mut self.reciprocal, &self.values, evicted);
        }

        for acc in self.accumulators_mut() {
            if restart {
                acc.reset_to(price);
            } else {
                acc.add(price);
            }
        }
        self.values.push_back(price);

        Ok(self.snapshot())
    }

    /// Means of the retained prices, `None` before the first observation
    pub fn means(&self) -> Option<Means> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.snapshot())
        }
    }

    fn snapshot(&self) -> Means {
        let count = self.values.len();
        if count == 1 {
            let price = self.values[0];
            return Means {
                arithmetic: price,
                geometric: price,
                harmonic: price,
            };
        }
        Means {
            arithmetic: self.linear.mean(count),
            geometric: self.log.mean(count),
            harmonic: self.reciprocal.mean(count),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Number of observations currently retained
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity.get()
    }

    /// Retained prices, oldest first
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn linear_sum(&self) -> f64 {
        self.linear.sum()
    }

    pub fn log_sum(&self) -> f64 {
        self.log.sum()
    }

    pub fn reciprocal_sum(&self) -> f64 {
        self.reciprocal.sum()
    }
}

/// Drop `price` from `acc`, re-summing `retained` when the subtraction
/// cancelled the sum down to rounding error
fn evict(acc: &mut dyn MeanAccumulator, retained: &VecDeque<f64>, price: f64) {
    acc.remove(price);
    if acc.cancelled(price) {
        acc.rebuild(retained);
    }
}
