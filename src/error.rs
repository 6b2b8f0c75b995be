//! Unified error types for the irrigation firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform.  All variants are `Copy` so
//! they pass through the command path without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A threshold setter received a value outside its domain.
    Validation(ValidationError),
    /// A command line could not be interpreted.
    Command(CommandError),
    /// Byte storage could not be read or written.
    Storage(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "validation: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// Which threshold a rejected value was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdField {
    Humidity,
    WaterLevel,
    TempMax,
}

impl fmt::Display for ThresholdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Humidity => write!(f, "humidity threshold"),
            Self::WaterLevel => write!(f, "water level threshold"),
            Self::TempMax => write!(f, "max temperature"),
        }
    }
}

/// A threshold value outside its inclusive `[min, max]` domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationError {
    pub field: ThresholdField,
    pub value: i32,
    pub min: i32,
    pub max: i32,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {}: {} (use {} to {})",
            self.field, self.value, self.min, self.max
        )
    }
}

impl core::error::Error for ValidationError {}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// Rejections produced by the text command parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// The line was blank after trimming.
    Empty,
    /// The first word is not a known command.
    Unknown,
    /// A setter was sent without its argument.
    MissingArgument(&'static str),
    /// The argument is not a base-10 integer.
    InvalidArgument(&'static str),
    /// The argument parsed but lies outside the setter's domain.
    Validation(ValidationError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::Unknown => write!(f, "unknown command"),
            Self::MissingArgument(cmd) => write!(f, "{cmd}: missing value"),
            Self::InvalidArgument(cmd) => write!(f, "{cmd}: value is not an integer"),
            Self::Validation(e) => write!(f, "{e}"),
        }
    }
}

impl core::error::Error for CommandError {}

impl From<ValidationError> for CommandError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Errors from the byte-addressed storage port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Offset plus length runs past the end of the storage area.
    OutOfBounds,
    /// The backing store has never been written.
    NotFound,
    /// Generic I/O failure from the backend.
    IoError,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "offset out of bounds"),
            Self::NotFound => write!(f, "storage not initialised"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::error::Error for StorageError {}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_range() {
        let e = ValidationError {
            field: ThresholdField::TempMax,
            value: 5,
            min: 10,
            max: 80,
        };
        assert_eq!(e.to_string(), "invalid max temperature: 5 (use 10 to 80)");
    }

    #[test]
    fn command_error_wraps_validation() {
        let v = ValidationError {
            field: ThresholdField::Humidity,
            value: 101,
            min: 0,
            max: 100,
        };
        let e: Error = CommandError::from(v).into();
        assert!(matches!(e, Error::Command(CommandError::Validation(_))));
    }
}
