use crate::traits::mean_trait::MeanAccumulator;

/// Running sum of natural logarithms of prices.
///
/// The geometric mean of N prices is the N-th root of their product. The
/// product overflows (or underflows to zero) long before any realistic
/// window fills up, so the sum is kept in log space and exponentiated once
/// per read: `exp(sum(ln p) / N)`.
#[derive(Debug, Clone, Default)]
pub struct LogSum {
    sum: f64,
}

impl LogSum {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MeanAccumulator for LogSum {
    fn term(&self, price: f64) -> f64 {
        price.ln()
    }

    fn sum(&self) -> f64 {
        self.sum
    }

    fn sum_mut(&mut self) -> &mut f64 {
        &mut self.sum
    }

    fn mean(&self, count: usize) -> f64 {
        (self.sum / count as f64).exp()
    }
}
