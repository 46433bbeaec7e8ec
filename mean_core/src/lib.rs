pub mod aggregator;
pub mod common;
pub mod config;
pub mod math;
pub mod pipeline;
pub mod traits;
pub mod window;

pub use aggregator::aggregator::Aggregator;
pub use aggregator::record::{AggregateRecord, PriceEvent};
pub use common::enums::MeanType;
pub use common::mean_exception::{ErrCode, MeanError};
pub use config::mean_config::MeanConfig;
pub use window::price_window::{Means, PriceWindow};
pub use window::window_store::WindowStore;
