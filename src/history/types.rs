/*!
 * History Record Types
 * Immutable entries of the activity and memory-usage logs
 */

use crate::core::limits::BYTES_PER_OBJECT;
use crate::core::serde::{serde_as, TimestampMilliSeconds};
use crate::core::types::{AlgorithmId, RecordId, Size};
use crate::memory::MemorySnapshot;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Entry that receives its id from the log it is appended to
pub trait Sequenced {
    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);
}

/// One completed collection run
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcActivity {
    pub id: RecordId,
    pub algorithm_id: AlgorithmId,
    pub algorithm_name: String,
    #[serde_as(as = "TimestampMilliSeconds<i64>")]
    pub timestamp: SystemTime,
    pub duration_ms: u64,
    pub memory_reclaimed_bytes: Size,
    pub objects_collected: u64,
    pub cpu_impact_percent: f32,
}

impl GcActivity {
    /// Build an unsequenced activity; the log assigns the id on append
    pub fn new(
        algorithm_id: AlgorithmId,
        algorithm_name: impl Into<String>,
        timestamp: SystemTime,
        duration_ms: u64,
        memory_reclaimed_bytes: Size,
        cpu_impact_percent: f32,
    ) -> Self {
        Self {
            id: 0,
            algorithm_id,
            algorithm_name: algorithm_name.into(),
            timestamp,
            duration_ms,
            memory_reclaimed_bytes,
            objects_collected: (memory_reclaimed_bytes / BYTES_PER_OBJECT) as u64,
            cpu_impact_percent,
        }
    }
}

impl Sequenced for GcActivity {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Memory usage sample
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    pub id: RecordId,
    #[serde_as(as = "TimestampMilliSeconds<i64>")]
    pub timestamp: SystemTime,
    pub total_bytes: Size,
    pub used_bytes: Size,
    pub free_bytes: Size,
    pub fragmentation_percent: f64,
}

impl MemoryRecord {
    pub fn from_snapshot(timestamp: SystemTime, snapshot: &MemorySnapshot) -> Self {
        Self {
            id: 0,
            timestamp,
            total_bytes: snapshot.total_bytes,
            used_bytes: snapshot.used_bytes,
            free_bytes: snapshot.free_bytes,
            fragmentation_percent: snapshot.fragmentation_percent,
        }
    }
}

impl Sequenced for MemoryRecord {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
