/*!
 * Memory Types
 * Blocks, snapshots and classification levels for the simulated memory space
 */

use crate::core::limits::{
    FRAGMENTATION_HIGH_PERCENT, FRAGMENTATION_MEDIUM_PERCENT, PRESSURE_CRITICAL_PERCENT,
    PRESSURE_HIGH_PERCENT, PRESSURE_MEDIUM_PERCENT,
};
use crate::core::types::{BlockId, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ledger operation result
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Used bytes {used} exceed total bytes {total}")]
    UsedExceedsTotal { used: Size, total: Size },

    #[error("Duplicate block id {0}")]
    DuplicateBlock(BlockId),
}

/// Block status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStatus {
    Active,
    Free,
    Fragmented,
}

impl BlockStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BlockStatus::Active => "active",
            BlockStatus::Free => "free",
            BlockStatus::Fragmented => "fragmented",
        }
    }
}

impl std::fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Memory block metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBlock {
    pub id: BlockId,
    pub size: Size,
    pub status: BlockStatus,
}

impl MemoryBlock {
    pub fn new(id: BlockId, size: Size, status: BlockStatus) -> Self {
        Self { id, size, status }
    }

    pub fn is_active(&self) -> bool {
        self.status == BlockStatus::Active
    }

    pub fn is_free(&self) -> bool {
        self.status == BlockStatus::Free
    }

    pub fn is_fragmented(&self) -> bool {
        self.status == BlockStatus::Fragmented
    }
}

/// Block counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockCounts {
    pub active: usize,
    pub free: usize,
    pub fragmented: usize,
}

/// Fragmentation classification shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FragmentationLevel {
    Low,
    Medium,
    High,
}

impl FragmentationLevel {
    pub fn from_percent(percent: f64) -> Self {
        if percent < FRAGMENTATION_MEDIUM_PERCENT {
            FragmentationLevel::Low
        } else if percent < FRAGMENTATION_HIGH_PERCENT {
            FragmentationLevel::Medium
        } else {
            FragmentationLevel::High
        }
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_usage(usage_percent: f64) -> Self {
        if usage_percent >= PRESSURE_CRITICAL_PERCENT {
            MemoryPressure::Critical
        } else if usage_percent >= PRESSURE_HIGH_PERCENT {
            MemoryPressure::High
        } else if usage_percent >= PRESSURE_MEDIUM_PERCENT {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Consistent view of the ledger aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySnapshot {
    pub total_bytes: Size,
    pub used_bytes: Size,
    pub free_bytes: Size,
    pub fragmentation_percent: f64,
    pub fragmentation_level: FragmentationLevel,
    pub pressure: MemoryPressure,
}

impl MemorySnapshot {
    pub fn new(total_bytes: Size, used_bytes: Size, free_bytes: Size, fragmentation: f64) -> Self {
        let snapshot = Self {
            total_bytes,
            used_bytes,
            free_bytes,
            fragmentation_percent: fragmentation,
            fragmentation_level: FragmentationLevel::from_percent(fragmentation),
            pressure: MemoryPressure::Low,
        };
        Self {
            pressure: MemoryPressure::from_usage(snapshot.usage_percent()),
            ..snapshot
        }
    }

    /// Percentage of the memory space in use
    pub fn usage_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            self.used_bytes as f64 / self.total_bytes as f64 * 100.0
        }
    }
}
