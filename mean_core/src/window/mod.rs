pub mod price_window;
pub mod window_store;
