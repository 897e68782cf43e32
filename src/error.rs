use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("network failure talking to the device: {0}")]
    Network(String),
    #[error("malformed device response: {0}")]
    Decode(String),
    #[error("device rejected the submitted state: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for DeviceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DeviceError::Decode(err.to_string())
        } else {
            DeviceError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DeviceError {
    fn from(err: serde_json::Error) -> Self {
        DeviceError::Decode(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OperationKind {
    Load,
    Save,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Load => write!(f, "load"),
            OperationKind::Save => write!(f, "save"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("a {0} is already in flight")]
    Busy(OperationKind),
    #[error("no light state has been loaded yet")]
    NothingLoaded,
    #[error(transparent)]
    Device(#[from] DeviceError),
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum LocalTimeError {
    #[error("invalid local datetime '{0}', expected YYYY-MM-DDTHH:MM:SS")]
    Invalid(String),
    #[error("local datetime '{0}' does not exist in this time zone")]
    Nonexistent(String),
}
