/*!
 * Engine Events
 * Structured notifications emitted after every committed state change
 */

use crate::core::types::Size;
use crate::gc::AlgorithmInfo;
use crate::history::GcActivity;
use crate::memory::MemorySnapshot;
use crate::settings::GcSettings;
use serde::{Deserialize, Serialize};

/// Event category for filtering on the client side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Collection,
    Memory,
    Configuration,
    Scheduler,
}

/// Engine event
///
/// Emitted once the originating operation has committed, so a snapshot carried
/// by an event is always consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GcEvent {
    CollectionCompleted {
        activity: GcActivity,
        snapshot: MemorySnapshot,
    },
    MemoryOptimized {
        reclaimed_bytes: Size,
        snapshot: MemorySnapshot,
    },
    MemoryDefragmented {
        reclaimed_bytes: Size,
        snapshot: MemorySnapshot,
    },
    SettingsUpdated {
        settings: GcSettings,
    },
    AlgorithmUpdated {
        algorithm: AlgorithmInfo,
    },
    SchedulerStateChanged {
        running: bool,
    },
}

impl GcEvent {
    pub fn category(&self) -> Category {
        match self {
            GcEvent::CollectionCompleted { .. } => Category::Collection,
            GcEvent::MemoryOptimized { .. } | GcEvent::MemoryDefragmented { .. } => {
                Category::Memory
            }
            GcEvent::SettingsUpdated { .. } | GcEvent::AlgorithmUpdated { .. } => {
                Category::Configuration
            }
            GcEvent::SchedulerStateChanged { .. } => Category::Scheduler,
        }
    }

    /// Snapshot carried by the event, if any
    pub fn snapshot(&self) -> Option<&MemorySnapshot> {
        match self {
            GcEvent::CollectionCompleted { snapshot, .. }
            | GcEvent::MemoryOptimized { snapshot, .. }
            | GcEvent::MemoryDefragmented { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }
}
