/*!
 * Wire Protocol
 * JSON text frames exchanged with dashboard clients
 *
 * Client frames carry a `command` field:
 *
 * - `runGc`, `optimizeMemory`, `defragmentMemory`
 * - `updateSettings` with the settings object under `settings`
 * - `updateAlgorithm` with `id`, `enabled`, `performanceScore`
 * - `getState`, optionally with `includeBlocks: true`
 *
 * Server frames carry a `type` field: `state`, `result`, `event` or `error`.
 */

use crate::core::errors::{GcError, GcResult};
use crate::core::limits::{DEFAULT_ACTIVITY_LIMIT, DEFAULT_MEMORY_RECORD_LIMIT};
use crate::core::serde::skip_serializing_none;
use crate::engine::{Command, CommandOutcome, GcManager, PerformanceSummary, RunStats};
use crate::gc::AlgorithmInfo;
use crate::history::{GcActivity, MemoryRecord};
use crate::memory::{BlockCounts, MemoryBlock, MemorySnapshot};
use crate::monitoring::GcEvent;
use crate::settings::GcSettings;
use serde::Serialize;
use serde_json::Value;

const GET_STATE: &str = "getState";

/// Decoded client frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Command(Command),
    GetState { include_blocks: bool },
}

impl ClientMessage {
    /// Decode a text frame
    ///
    /// Unknown command names fail with `UnknownCommand`; anything else that
    /// does not parse fails with `MalformedCommand`.
    pub fn decode(text: &str) -> GcResult<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| GcError::MalformedCommand(e.to_string()))?;

        let name = value
            .get("command")
            .and_then(Value::as_str)
            .ok_or_else(|| GcError::MalformedCommand("missing \"command\" field".to_string()))?;

        if name == GET_STATE {
            let include_blocks = value
                .get("includeBlocks")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            return Ok(ClientMessage::GetState { include_blocks });
        }

        if !Command::is_known(name) {
            return Err(GcError::UnknownCommand(name.to_string()));
        }

        let name = name.to_string();
        serde_json::from_value(value)
            .map(ClientMessage::Command)
            .map_err(|e| GcError::MalformedCommand(format!("{name}: {e}")))
    }
}

/// Everything the dashboard renders, captured in one pass
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub snapshot: MemorySnapshot,
    pub block_counts: BlockCounts,
    pub stats: RunStats,
    pub performance: PerformanceSummary,
    pub algorithms: Vec<AlgorithmInfo>,
    pub activities: Vec<GcActivity>,
    pub memory_records: Vec<MemoryRecord>,
    pub settings: GcSettings,
    pub scheduler_running: bool,
    pub blocks: Option<Vec<MemoryBlock>>,
}

impl DashboardState {
    pub fn capture(manager: &GcManager, include_blocks: bool) -> Self {
        Self {
            snapshot: manager.snapshot(),
            block_counts: manager.block_counts(),
            stats: manager.stats(),
            performance: manager.performance(),
            algorithms: manager.list_algorithms(),
            activities: manager.recent_activities(DEFAULT_ACTIVITY_LIMIT),
            memory_records: manager.recent_memory_records(DEFAULT_MEMORY_RECORD_LIMIT),
            settings: manager.settings(),
            scheduler_running: manager.scheduler_running(),
            blocks: include_blocks.then(|| manager.all_blocks()),
        }
    }
}

/// Server frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    State(Box<DashboardState>),
    Result {
        command: String,
        #[serde(flatten)]
        outcome: CommandOutcome,
    },
    Event(GcEvent),
    Error {
        code: String,
        message: String,
    },
}

impl ServerMessage {
    pub fn state(state: DashboardState) -> Self {
        ServerMessage::State(Box::new(state))
    }

    pub fn result(command: &Command, outcome: CommandOutcome) -> Self {
        ServerMessage::Result {
            command: command.name().to_string(),
            outcome,
        }
    }

    pub fn error(err: &GcError) -> Self {
        ServerMessage::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
