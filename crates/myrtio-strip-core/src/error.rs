use core::fmt;

/// Failure reported by an LED output factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    /// The pin cannot drive an LED data line.
    InvalidPin,
    /// Every output channel is already in use.
    NoFreeChannel,
    /// The peripheral driver rejected the configuration.
    Driver,
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HardwareError::InvalidPin => "invalid pin",
            HardwareError::NoFreeChannel => "no free output channel",
            HardwareError::Driver => "output driver error",
        })
    }
}

/// Registry and pixel store errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripError {
    NotFound,
    InvalidIndex,
    InvalidPixelCount,
    CapacityExceeded,
    GroupCapacityExceeded,
    Hardware(HardwareError),
}

impl From<HardwareError> for StripError {
    fn from(error: HardwareError) -> Self {
        StripError::Hardware(error)
    }
}

impl fmt::Display for StripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StripError::NotFound => f.write_str("strip not found"),
            StripError::InvalidIndex => f.write_str("led index out of range"),
            StripError::InvalidPixelCount => f.write_str("invalid led count"),
            StripError::CapacityExceeded => f.write_str("strip capacity exceeded"),
            StripError::GroupCapacityExceeded => f.write_str("group capacity exceeded"),
            StripError::Hardware(error) => write!(f, "hardware: {error}"),
        }
    }
}

/// Durable storage errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The flash driver failed to read, erase or write.
    Driver,
    /// No record is stored.
    NotFound,
    /// The stored record is malformed or torn.
    Parse,
    /// The record does not fit the partition.
    Overflow,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageError::Driver => "flash driver error",
            StorageError::NotFound => "no record",
            StorageError::Parse => "malformed record",
            StorageError::Overflow => "record too large",
        })
    }
}

/// Rejected control request, carrying the offending parameter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    UnknownAction,
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::UnknownAction => f.write_str("unknown action"),
            RequestError::Missing(name) => write!(f, "missing {name}"),
            RequestError::Invalid(name) => write!(f, "invalid {name}"),
        }
    }
}

/// Error of a control surface operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    Request(RequestError),
    Strip(StripError),
}

impl From<RequestError> for ControlError {
    fn from(error: RequestError) -> Self {
        ControlError::Request(error)
    }
}

impl From<StripError> for ControlError {
    fn from(error: StripError) -> Self {
        ControlError::Strip(error)
    }
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::Request(error) => error.fmt(f),
            ControlError::Strip(error) => error.fmt(f),
        }
    }
}
