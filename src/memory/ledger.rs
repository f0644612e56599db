/*!
 * Block Ledger
 * The simulated memory space: a fixed set of blocks plus aggregate counters
 *
 * The ledger is a plain data structure with no interior locking. The engine
 * owns it behind a single exclusive lock and performs every mutation and the
 * matching aggregate update inside one critical section, which is what keeps
 * `used + free == total` observable at all times.
 */

use super::types::{
    BlockCounts, BlockStatus, LedgerError, LedgerResult, MemoryBlock, MemorySnapshot,
};
use crate::core::limits::{
    ACTIVE_BLOCK_CUTOFF, FREE_BLOCK_CUTOFF, INITIAL_USED_RATIO, MAX_BLOCK_SIZE, MIN_BLOCK_SIZE,
};
use crate::core::random::RandomSource;
use crate::core::types::{BlockId, Size};
use std::collections::HashSet;
use tracing::{info, warn};

/// Block ledger
#[derive(Debug, Clone)]
pub struct BlockLedger {
    blocks: Vec<MemoryBlock>,
    total_bytes: Size,
    used_bytes: Size,
    free_bytes: Size,
    fragmentation: f64,
}

impl BlockLedger {
    /// Partition `total_bytes` into randomly sized blocks with random statuses
    ///
    /// Block sizes are drawn from `[1KB, 1MB]`, the last block being clamped
    /// to the remaining capacity. Reported usage starts at 42% of the total
    /// regardless of the block layout.
    pub fn initialize(total_bytes: Size, rng: &mut dyn RandomSource) -> Self {
        let mut blocks = Vec::with_capacity(total_bytes / ((MIN_BLOCK_SIZE + MAX_BLOCK_SIZE) / 2) + 1);
        let mut remaining = total_bytes;
        let mut next_id: BlockId = 1;

        while remaining > 0 {
            let size = rng.next_in_range(MIN_BLOCK_SIZE, MAX_BLOCK_SIZE).min(remaining);
            let draw = rng.next_unit();
            let status = if draw < FREE_BLOCK_CUTOFF {
                BlockStatus::Free
            } else if draw < ACTIVE_BLOCK_CUTOFF {
                BlockStatus::Active
            } else {
                BlockStatus::Fragmented
            };

            blocks.push(MemoryBlock::new(next_id, size, status));
            next_id += 1;
            remaining -= size;
        }

        let used_bytes = (total_bytes as f64 * INITIAL_USED_RATIO) as Size;
        let mut ledger = Self {
            blocks,
            total_bytes,
            used_bytes,
            free_bytes: total_bytes - used_bytes,
            fragmentation: 0.0,
        };
        ledger.recompute_fragmentation();

        info!(
            total_bytes,
            blocks = ledger.blocks.len(),
            used_bytes,
            fragmentation = ledger.fragmentation,
            "Block ledger initialized"
        );
        ledger
    }

    /// Build a ledger from an explicit block list
    ///
    /// The total is the sum of the block sizes.
    pub fn from_blocks(blocks: Vec<MemoryBlock>, used_bytes: Size) -> LedgerResult<Self> {
        let mut seen = HashSet::with_capacity(blocks.len());
        for block in &blocks {
            if !seen.insert(block.id) {
                return Err(LedgerError::DuplicateBlock(block.id));
            }
        }

        let total_bytes: Size = blocks.iter().map(|b| b.size).sum();
        if used_bytes > total_bytes {
            return Err(LedgerError::UsedExceedsTotal {
                used: used_bytes,
                total: total_bytes,
            });
        }

        let mut ledger = Self {
            blocks,
            total_bytes,
            used_bytes,
            free_bytes: total_bytes - used_bytes,
            fragmentation: 0.0,
        };
        ledger.recompute_fragmentation();
        Ok(ledger)
    }

    pub fn total_bytes(&self) -> Size {
        self.total_bytes
    }

    pub fn used_bytes(&self) -> Size {
        self.used_bytes
    }

    pub fn free_bytes(&self) -> Size {
        self.free_bytes
    }

    pub fn fragmentation_percent(&self) -> f64 {
        self.fragmentation
    }

    /// Percentage of the memory space in use
    pub fn used_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            self.used_bytes as f64 / self.total_bytes as f64 * 100.0
        }
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot::new(
            self.total_bytes,
            self.used_bytes,
            self.free_bytes,
            self.fragmentation,
        )
    }

    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    /// Mutable block access for collection strategies
    pub fn blocks_mut(&mut self) -> &mut [MemoryBlock] {
        &mut self.blocks
    }

    pub fn counts(&self) -> BlockCounts {
        self.blocks
            .iter()
            .fold(BlockCounts::default(), |mut counts, block| {
                match block.status {
                    BlockStatus::Active => counts.active += 1,
                    BlockStatus::Free => counts.free += 1,
                    BlockStatus::Fragmented => counts.fragmented += 1,
                }
                counts
            })
    }

    /// Recompute the fragmentation percentage from block statuses
    pub fn recompute_fragmentation(&mut self) -> f64 {
        let fragmented: Size = self
            .blocks
            .iter()
            .filter(|b| b.is_fragmented())
            .map(|b| b.size)
            .sum();

        self.fragmentation = if self.total_bytes == 0 {
            0.0
        } else {
            (fragmented as f64 / self.total_bytes as f64 * 100.0).clamp(0.0, 100.0)
        };
        self.fragmentation
    }

    /// Move `bytes` from used to free
    ///
    /// A reclaim larger than the used total is clamped, so the aggregates can
    /// never underflow. Returns the amount actually applied.
    pub fn apply_reclaim(&mut self, bytes: Size) -> Size {
        let applied = if bytes > self.used_bytes {
            warn!(
                requested = bytes,
                used = self.used_bytes,
                "Reclaim exceeds used bytes, clamping"
            );
            self.used_bytes
        } else {
            bytes
        };

        self.used_bytes -= applied;
        self.free_bytes += applied;
        debug_assert_eq!(self.used_bytes + self.free_bytes, self.total_bytes);
        applied
    }

    /// Turn every FRAGMENTED block FREE, returning the bytes involved
    pub fn optimize(&mut self) -> Size {
        self.blocks
            .iter_mut()
            .filter(|b| b.is_fragmented())
            .map(|b| {
                b.status = BlockStatus::Free;
                b.size
            })
            .sum()
    }

    /// Report free-block consolidation
    ///
    /// For every FREE block the sizes of all other FREE blocks are counted as
    /// reclaimed. No status changes. With `n` free blocks totalling `s` bytes
    /// this is `(n - 1) * s`.
    pub fn defragment(&mut self) -> Size {
        let (count, total) = self
            .blocks
            .iter()
            .filter(|b| b.is_free())
            .fold((0usize, 0usize), |(n, s), b| (n + 1, s + b.size));

        count.saturating_sub(1).saturating_mul(total)
    }
}
