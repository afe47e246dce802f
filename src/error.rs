use std::ops::Range;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid config: `{param}` out of range, got {value}")]
    InvalidConfig { param: &'static str, value: f64 },

    #[error("Track id ranges overlap: {first:?} and {second:?}")]
    IdRangeOverlap {
        first: Range<u32>,
        second: Range<u32>,
    },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Yaml Error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Rejects zero, negative and NaN thresholds.
pub(crate) fn ensure_positive(param: &'static str, value: f64) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig { param, value })
    }
}

pub(crate) fn ensure_non_negative(param: &'static str, value: f64) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig { param, value })
    }
}
