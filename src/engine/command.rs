/*!
 * Engine Commands
 * Parsed control commands and their structured outcomes
 */

use crate::core::types::{AlgorithmId, Size};
use crate::gc::AlgorithmInfo;
use crate::settings::GcSettings;
use serde::{Deserialize, Serialize};

/// Control command accepted by the engine
///
/// Serialized with the command name in a `command` field, matching the
/// dashboard's message format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    RunGc,
    OptimizeMemory,
    DefragmentMemory,
    UpdateSettings {
        settings: GcSettings,
    },
    UpdateAlgorithm {
        id: AlgorithmId,
        enabled: bool,
        performance_score: i32,
    },
}

impl Command {
    /// Wire names of every command
    pub const NAMES: [&'static str; 5] = [
        "runGc",
        "optimizeMemory",
        "defragmentMemory",
        "updateSettings",
        "updateAlgorithm",
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Command::RunGc => "runGc",
            Command::OptimizeMemory => "optimizeMemory",
            Command::DefragmentMemory => "defragmentMemory",
            Command::UpdateSettings { .. } => "updateSettings",
            Command::UpdateAlgorithm { .. } => "updateAlgorithm",
        }
    }

    pub fn is_known(name: &str) -> bool {
        Self::NAMES.contains(&name)
    }
}

/// Result of a handled command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CommandOutcome {
    Collected {
        reclaimed_bytes: Size,
    },
    Optimized {
        reclaimed_bytes: Size,
    },
    Defragmented {
        reclaimed_bytes: Size,
    },
    SettingsApplied {
        settings: GcSettings,
        scheduler_running: bool,
    },
    AlgorithmUpdated {
        algorithm: AlgorithmInfo,
    },
}

impl CommandOutcome {
    /// Bytes reported by a memory command, None for configuration commands
    pub fn reclaimed_bytes(&self) -> Option<Size> {
        match self {
            CommandOutcome::Collected { reclaimed_bytes }
            | CommandOutcome::Optimized { reclaimed_bytes }
            | CommandOutcome::Defragmented { reclaimed_bytes } => Some(*reclaimed_bytes),
            _ => None,
        }
    }
}
