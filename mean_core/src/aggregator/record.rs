use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::window::price_window::Means;

/// One decoded price update as delivered by a price source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEvent {
    /// Symbol key the window is tracked under
    pub id: String,
    /// Human readable asset name
    pub name: String,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

/// Observed price together with the window means it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
    pub arithmetic_mean: f64,
    pub geometric_mean: f64,
    pub harmonic_mean: f64,
}

impl AggregateRecord {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        timestamp: DateTime<Utc>,
        means: Means,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price,
            timestamp,
            arithmetic_mean: means.arithmetic,
            geometric_mean: means.geometric,
            harmonic_mean: means.harmonic,
        }
    }

    pub fn means(&self) -> Means {
        Means {
            arithmetic: self.arithmetic_mean,
            geometric: self.geometric_mean,
            harmonic: self.harmonic_mean,
        }
    }
}
