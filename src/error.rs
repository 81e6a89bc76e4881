//! Error types for levelup
//!
//! Exit codes:
//! - 2: User error (bad input, rejected edit, unknown index)
//! - 3: Refused by the progression rules (not enough points)
//! - 4: Operation failed (corrupted record, storage failure)

use thiserror::Error;

/// Exit codes for the levelup CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const RULE_REFUSED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for levelup operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid title: {0}")]
    InvalidTitle(String),

    #[error("Invalid cost: '{0}' is not a non-negative integer")]
    InvalidCost(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("You have no stats that can be assigned to tasks. Create a stat first")]
    NoStats,

    #[error("Stat not found: {0}")]
    StatNotFound(usize),

    #[error("Task not found: {0}")]
    TaskNotFound(usize),

    #[error("Reward not found: {0}")]
    RewardNotFound(usize),

    #[error("Task already completed today: {0}")]
    AlreadyCompleted(String),

    // Progression refusals (exit code 3)
    #[error("Not enough points: have {points}, need {cost}")]
    InsufficientPoints { points: u64, cost: u64 },

    // Operation failures (exit code 4)
    #[error("Corrupted '{key}' record at line {line}: {reason}")]
    CorruptRecord {
        key: String,
        line: usize,
        reason: String,
    },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidTitle(_)
            | Error::InvalidCost(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_)
            | Error::NoStats
            | Error::StatNotFound(_)
            | Error::TaskNotFound(_)
            | Error::RewardNotFound(_)
            | Error::AlreadyCompleted(_) => exit_codes::USER_ERROR,

            // Progression refusals
            Error::InsufficientPoints { .. } => exit_codes::RULE_REFUSED,

            // Operation failures
            Error::CorruptRecord { .. }
            | Error::StoreUnavailable(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured payload for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::InsufficientPoints { points, cost } => Some(serde_json::json!({
                "points": points,
                "cost": cost,
            })),
            Error::CorruptRecord { key, line, reason } => Some(serde_json::json!({
                "key": key,
                "line": line,
                "reason": reason,
            })),
            Error::StatNotFound(index) | Error::TaskNotFound(index) | Error::RewardNotFound(index) => {
                Some(serde_json::json!({ "index": index }))
            }
            Error::InvalidConfig(message) => Some(serde_json::json!({ "message": message })),
            _ => None,
        }
    }
}

/// Result type alias for levelup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
