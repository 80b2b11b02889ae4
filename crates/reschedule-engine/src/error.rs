//! Error types for reschedule-engine boundary validation.
//!
//! The scheduling components themselves report "nothing found" as data (empty
//! collections, failed `RescheduleResult`s). These errors only surface where a
//! caller builds or validates inputs, loads configuration, or expands recurrences.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid constraints: {0}")]
    InvalidConstraints(String),

    #[error("Unknown reschedule strategy: '{0}'")]
    UnknownStrategy(String),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRecurrence(String),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Config read error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
