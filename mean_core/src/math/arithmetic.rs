use crate::traits::mean_trait::MeanAccumulator;

/// Running sum of prices
#[derive(Debug, Clone, Default)]
pub struct LinearSum {
    sum: f64,
}

impl LinearSum {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MeanAccumulator for LinearSum {
    fn term(&self, price: f64) -> f64 {
        price
    }

    fn sum(&self) -> f64 {
        self.sum
    }

    fn sum_mut(&mut self) -> &mut f64 {
        &mut self.sum
    }

    fn mean(&self, count: usize) -> f64 {
        self.sum / count as f64
    }
}
