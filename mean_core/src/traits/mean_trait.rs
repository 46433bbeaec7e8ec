use std::collections::VecDeque;

/// A running sum of one per-price quantity, from which a mean over the
/// window can be read in O(1).
///
/// Implementors only say what quantity they sum and how the mean is derived
/// from that sum; the window drives `add`/`remove` in lockstep for all of
/// its accumulators so every sum covers exactly the retained prices.
/// A removed term this many times larger than the remaining sum leaves
/// fewer than ten significant digits in it
pub const CANCELLATION_RATIO: f64 = 1e6;

pub trait MeanAccumulator {
    /// Contribution of a single price to the running sum
    fn term(&self, price: f64) -> f64;

    /// Current running sum
    fn sum(&self) -> f64;

    /// Mutable access to the running sum
    fn sum_mut(&mut self) -> &mut f64;

    /// Mean of `count` retained prices given the current sum
    fn mean(&self, count: usize) -> f64;

    /// Account for a price entering the window
    fn add(&mut self, price: f64) {
        let term = self.term(price);
        *self.sum_mut() += term;
    }

    /// Account for a price leaving the window
    fn remove(&mut self, price: f64) {
        let term = self.term(price);
        *self.sum_mut() -= term;
    }

    /// Make the sum cover exactly one price
    fn reset_to(&mut self, price: f64) {
        let term = self.term(price);
        *self.sum_mut() = term;
    }

    /// Sum that evicting `evicted` and adding `price` would leave, without
    /// applying it. `restart` means the window is empty once `evicted` is gone.
    fn preview(&self, evicted: Option<f64>, price: f64, restart: bool) -> f64 {
        if restart {
            return self.term(price);
        }
        let mut sum = self.sum();
        if let Some(old) = evicted {
            sum -= self.term(old);
        }
        sum + self.term(price)
    }

    /// Whether removing `price` cancelled away most of the significant digits
    /// of the sum, so what is left is mostly rounding error
    fn cancelled(&self, price: f64) -> bool {
        self.term(price).abs() > CANCELLATION_RATIO * self.sum().abs()
    }

    /// Recompute the sum from scratch over `prices`
    fn rebuild(&mut self, prices: &VecDeque<f64>) {
        let sum: f64 = prices.iter().map(|&p| self.term(p)).sum();
        *self.sum_mut() = sum;
    }
}
