use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Error codes for the mean aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[repr(i32)]
pub enum ErrCode {
    // Data errors (0-99)
    #[strum(serialize = "_DATA_ERR_BEGIN")]
    DataErrBegin = 0,
    #[strum(serialize = "INVALID_PRICE")]
    InvalidPrice = 1,
    #[strum(serialize = "SRC_DATA_FORMAT_ERROR")]
    SrcDataFormatError = 2,
    #[strum(serialize = "TIMESTAMP_ERROR")]
    TimestampError = 3,
    #[strum(serialize = "_DATA_ERR_END")]
    DataErrEnd = 99,

    // Config errors (100-199)
    #[strum(serialize = "_CONFIG_ERR_BEGIN")]
    ConfigErrBegin = 100,
    #[strum(serialize = "CONFIG_ERROR")]
    ConfigError = 101,
    #[strum(serialize = "PARA_ERROR")]
    ParaError = 102,
    #[strum(serialize = "_CONFIG_ERR_END")]
    ConfigErrEnd = 199,

    // Source / sink errors (200-299)
    #[strum(serialize = "_IO_ERR_BEGIN")]
    IoErrBegin = 200,
    #[strum(serialize = "SOURCE_ERROR")]
    SourceError = 201,
    #[strum(serialize = "COMMIT_ERROR")]
    CommitError = 202,
    #[strum(serialize = "SINK_ERROR")]
    SinkError = 203,
    #[strum(serialize = "_IO_ERR_END")]
    IoErrEnd = 299,
}

impl ErrCode {
    fn in_range(&self, begin: ErrCode, end: ErrCode) -> bool {
        let code = *self as i32;
        code > begin as i32 && code < end as i32
    }

    pub fn is_data_err(&self) -> bool {
        self.in_range(Self::DataErrBegin, Self::DataErrEnd)
    }

    pub fn is_config_err(&self) -> bool {
        self.in_range(Self::ConfigErrBegin, Self::ConfigErrEnd)
    }

    pub fn is_io_err(&self) -> bool {
        self.in_range(Self::IoErrBegin, Self::IoErrEnd)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{errcode}: {msg}")]
pub struct MeanError {
    pub errcode: ErrCode,
    pub msg: String,
}

impl MeanError {
    pub fn new(message: impl Into<String>, code: ErrCode) -> Self {
        Self {
            errcode: code,
            msg: message.into(),
        }
    }

    /// Price must be strictly positive and finite: ln and 1/x are taken of it.
    pub fn invalid_price(symbol: &str, price: f64) -> Self {
        Self::new(
            format!("price {} for {} is not a positive finite number", price, symbol),
            ErrCode::InvalidPrice,
        )
    }

    pub fn price_overflow(symbol: &str, price: f64) -> Self {
        Self::new(
            format!("price {} for {} would overflow the window sums", price, symbol),
            ErrCode::InvalidPrice,
        )
    }

    pub fn is_invalid_price(&self) -> bool {
        self.errcode == ErrCode::InvalidPrice
    }

    pub fn is_data_err(&self) -> bool {
        self.errcode.is_data_err()
    }

    pub fn is_config_err(&self) -> bool {
        self.errcode.is_config_err()
    }

    pub fn is_io_err(&self) -> bool {
        self.errcode.is_io_err()
    }
}
