use std::collections::HashMap;
use std::num::NonZeroUsize;

use serde::de::DeserializeOwned;

use crate::common::mean_exception::{ErrCode, MeanError};

pub const DEFAULT_WINDOW_SIZE: usize = 100;
pub const DEFAULT_COMMIT_INTERVAL: usize = 100;

/// Aggregator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeanConfig {
    /// Number of most recent prices each symbol's means cover
    pub window_size: NonZeroUsize,
    /// Commit the price source after this many consumed messages
    pub commit_interval: NonZeroUsize,
}

impl MeanConfig {
    pub fn new(conf: Option<HashMap<String, serde_json::Value>>) -> Result<Self, MeanError> {
        let mut conf = ConfigWithCheck::new(conf.unwrap_or_default());

        let config = Self {
            window_size: conf.take_non_zero("window_size", DEFAULT_WINDOW_SIZE)?,
            commit_interval: conf.take_non_zero("commit_interval", DEFAULT_COMMIT_INTERVAL)?,
        };
        conf.check()?;

        Ok(config)
    }

    /// Build from a JSON object such as `{"window_size": 50}`
    pub fn from_json_str(json: &str) -> Result<Self, MeanError> {
        let conf: HashMap<String, serde_json::Value> = serde_json::from_str(json).map_err(|e| {
            MeanError::new(format!("config is not a JSON object: {}", e), ErrCode::ConfigError)
        })?;
        Self::new(Some(conf))
    }
}

impl Default for MeanConfig {
    fn default() -> Self {
        Self {
            window_size: NonZeroUsize::new(DEFAULT_WINDOW_SIZE).unwrap_or(NonZeroUsize::MIN),
            commit_interval: NonZeroUsize::new(DEFAULT_COMMIT_INTERVAL).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Config map that hands out each key once and rejects whatever is left over
struct ConfigWithCheck {
    conf: HashMap<String, serde_json::Value>,
}

impl ConfigWithCheck {
    fn new(conf: HashMap<String, serde_json::Value>) -> Self {
        Self { conf }
    }

    fn take<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, MeanError> {
        match self.conf.remove(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
                MeanError::new(
                    format!("invalid value {} for {}: {}", value, key, e),
                    ErrCode::ConfigError,
                )
            }),
        }
    }

    fn take_non_zero(&mut self, key: &str, default: usize) -> Result<NonZeroUsize, MeanError> {
        let value = self.take::<usize>(key)?.unwrap_or(default);
        NonZeroUsize::new(value).ok_or_else(|| {
            MeanError::new(format!("{} must be at least 1", key), ErrCode::ConfigError)
        })
    }

    fn check(&self) -> Result<(), MeanError> {
        if self.conf.is_empty() {
            return Ok(());
        }
        let mut unknown: Vec<&str> = self.conf.keys().map(String::as_str).collect();
        unknown.sort_unstable();
        Err(MeanError::new(
            format!("unknown para = {}", unknown.join(",")),
            ErrCode::ParaError,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let conf = MeanConfig::new(None).unwrap();
        assert_eq!(conf.window_size.get(), DEFAULT_WINDOW_SIZE);
        assert_eq!(conf.commit_interval.get(), DEFAULT_COMMIT_INTERVAL);
        assert_eq!(conf, MeanConfig::default());
    }

    #[test]
    fn test_from_json() {
        let conf = MeanConfig::from_json_str(r#"{"window_size": 3, "commit_interval": 10}"#).unwrap();
        assert_eq!(conf.window_size.get(), 3);
        assert_eq!(conf.commit_interval.get(), 10);
    }

    #[test]
    fn test_null_falls_back_to_default() {
        let conf = MeanConfig::from_json_str(r#"{"window_size": null}"#).unwrap();
        assert_eq!(conf.window_size.get(), DEFAULT_WINDOW_SIZE);
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = MeanConfig::from_json_str(r#"{"window_size": 0}"#).unwrap_err();
        assert_eq!(err.errcode, ErrCode::ConfigError);
    }

    #[test]
    fn test_wrong_type_rejected() {
        let mut map = HashMap::new();
        map.insert("window_size".to_string(), json!("ten"));
        let err = MeanConfig::new(Some(map)).unwrap_err();
        assert_eq!(err.errcode, ErrCode::ConfigError);

        let err = MeanConfig::from_json_str(r#"{"window_size": -4}"#).unwrap_err();
        assert!(err.is_config_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = MeanConfig::from_json_str(r#"{"window_size": 5, "topic": "prices"}"#).unwrap_err();
        assert_eq!(err.errcode, ErrCode::ParaError);
        assert!(err.msg.contains("topic"));
    }

    #[test]
    fn test_not_an_object() {
        let err = MeanConfig::from_json_str("[1, 2]").unwrap_err();
        assert_eq!(err.errcode, ErrCode::ConfigError);
    }
}
