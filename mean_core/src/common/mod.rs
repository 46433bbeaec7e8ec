pub mod enums;
pub mod mean_exception;
pub mod time;
pub mod utils;
