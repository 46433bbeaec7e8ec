use crate::traits::mean_trait::MeanAccumulator;

/// Running sum of reciprocals of prices: HM = N / sum(1/p)
#[derive(Debug, Clone, Default)]
pub struct ReciprocalSum {
    sum: f64,
}

impl ReciprocalSum {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MeanAccumulator for ReciprocalSum {
    fn term(&self, price: f64) -> f64 {
        price.recip()
    }

    fn sum(&self) -> f64 {
        self.sum
    }

    fn sum_mut(&mut self) -> &mut f64 {
        &mut self.sum
    }

    fn mean(&self, count: usize) -> f64 {
        count as f64 / self.sum
    }
}
