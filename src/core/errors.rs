/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::AlgorithmId;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export LedgerError from memory module
pub use crate::memory::LedgerError;

/// Result type for GC manager operations
pub type GcResult<T> = Result<T, GcError>;

/// GC manager errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum GcError {
    #[error("Algorithm {0} not found")]
    #[diagnostic(
        code(gc::algorithm_not_found),
        help("Known algorithm ids are listed by list_algorithms().")
    )]
    AlgorithmNotFound(AlgorithmId),

    #[error("Algorithm {0} is already registered")]
    #[diagnostic(
        code(gc::duplicate_algorithm),
        help("Each algorithm id can be registered at most once.")
    )]
    DuplicateAlgorithm(AlgorithmId),

    #[error("Invalid settings: {0}")]
    #[diagnostic(
        code(settings::invalid),
        help("Threshold and CPU limit must be 0-100, time interval must be at least 1 minute.")
    )]
    InvalidSettings(String),

    #[error("Malformed command: {0}")]
    #[diagnostic(
        code(command::malformed),
        help("Commands are JSON objects with a \"command\" field and an optional payload.")
    )]
    MalformedCommand(String),

    #[error("Unknown command: {0}")]
    #[diagnostic(
        code(command::unknown),
        help("Supported commands: runGc, optimizeMemory, defragmentMemory, updateSettings, updateAlgorithm, getState.")
    )]
    UnknownCommand(String),

    #[error("Invalid ledger: {0}")]
    #[diagnostic(code(memory::invalid_ledger))]
    InvalidLedger(String),

    #[error("Failed to spawn scheduler: {0}")]
    #[diagnostic(
        code(scheduler::spawn_failed),
        help("The OS refused to create the background thread. Check thread limits.")
    )]
    SchedulerSpawn(String),
}

impl From<LedgerError> for GcError {
    fn from(err: LedgerError) -> Self {
        GcError::InvalidLedger(err.to_string())
    }
}

impl GcError {
    /// Stable machine-readable code, used by the wire protocol
    pub fn code(&self) -> &'static str {
        match self {
            GcError::AlgorithmNotFound(_) => "algorithm_not_found",
            GcError::DuplicateAlgorithm(_) => "duplicate_algorithm",
            GcError::InvalidSettings(_) => "invalid_settings",
            GcError::MalformedCommand(_) => "malformed_command",
            GcError::UnknownCommand(_) => "unknown_command",
            GcError::InvalidLedger(_) => "invalid_ledger",
            GcError::SchedulerSpawn(_) => "scheduler_spawn",
        }
    }
}
