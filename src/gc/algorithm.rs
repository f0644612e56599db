/*!
 * GC Algorithms
 * Collection strategy interface and the shipped probabilistic variants
 */

use crate::core::random::RandomSource;
use crate::core::types::{AlgorithmId, Size};
use crate::memory::{BlockStatus, MemoryBlock};
use serde::{Deserialize, Serialize};

/// Collection strategy interface
///
/// A strategy decides which blocks to reclaim. Reclaimed blocks must end up
/// FREE and the return value must equal the sum of their sizes. The engine
/// calls this with the ledger lock held.
pub trait CollectionStrategy: Send + Sync {
    /// Reclaim blocks, returning the number of bytes reclaimed
    fn collect(&self, blocks: &mut [MemoryBlock], rng: &mut dyn RandomSource) -> Size;
}

/// Shipped algorithm variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    MarkSweep,
    Generational,
    ReferenceCounting,
    ConcurrentGc,
}

impl AlgorithmKind {
    /// All variants in registration order
    pub const ALL: [AlgorithmKind; 4] = [
        AlgorithmKind::MarkSweep,
        AlgorithmKind::Generational,
        AlgorithmKind::ReferenceCounting,
        AlgorithmKind::ConcurrentGc,
    ];

    pub const fn id(&self) -> AlgorithmId {
        match self {
            AlgorithmKind::MarkSweep => 1,
            AlgorithmKind::Generational => 2,
            AlgorithmKind::ReferenceCounting => 3,
            AlgorithmKind::ConcurrentGc => 4,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            AlgorithmKind::MarkSweep => "Mark-Sweep",
            AlgorithmKind::Generational => "Generational",
            AlgorithmKind::ReferenceCounting => "Reference Counting",
            AlgorithmKind::ConcurrentGc => "Concurrent GC",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            AlgorithmKind::MarkSweep => {
                "A basic GC algorithm that marks all reachable objects and then sweeps away the unmarked ones."
            }
            AlgorithmKind::Generational => {
                "Groups objects by age and collects younger generations more frequently than older ones."
            }
            AlgorithmKind::ReferenceCounting => {
                "Keeps track of the number of references to each object and collects when count reaches zero."
            }
            AlgorithmKind::ConcurrentGc => {
                "Performs collection alongside program execution to minimize pauses."
            }
        }
    }

    pub const fn default_performance_score(&self) -> i32 {
        match self {
            AlgorithmKind::MarkSweep => 72,
            AlgorithmKind::Generational => 89,
            AlgorithmKind::ReferenceCounting => 65,
            AlgorithmKind::ConcurrentGc => 78,
        }
    }

    /// Chance that a single ACTIVE block is reclaimed in one run
    pub const fn reclaim_probability(&self) -> f64 {
        match self {
            AlgorithmKind::MarkSweep => 0.30,
            AlgorithmKind::Generational => 0.40,
            AlgorithmKind::ReferenceCounting => 0.25,
            AlgorithmKind::ConcurrentGc => 0.35,
        }
    }

    /// Public metadata with the default enabled flag and score
    pub fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo {
            id: self.id(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            enabled: true,
            performance_score: self.default_performance_score(),
        }
    }

    pub fn strategy(&self) -> ProbabilisticCollector {
        ProbabilisticCollector::new(self.reclaim_probability())
    }
}

/// Algorithm metadata exposed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmInfo {
    pub id: AlgorithmId,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub performance_score: i32,
}

impl AlgorithmInfo {
    pub fn new(id: AlgorithmId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            enabled: true,
            performance_score: 0,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_performance_score(mut self, score: i32) -> Self {
        self.performance_score = score;
        self
    }
}

/// Reclaims each ACTIVE block independently with a fixed probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilisticCollector {
    probability: f64,
}

impl ProbabilisticCollector {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl CollectionStrategy for ProbabilisticCollector {
    fn collect(&self, blocks: &mut [MemoryBlock], rng: &mut dyn RandomSource) -> Size {
        let mut reclaimed = 0;
        for block in blocks.iter_mut().filter(|b| b.is_active()) {
            if rng.next_unit() < self.probability {
                block.status = BlockStatus::Free;
                reclaimed += block.size;
            }
        }
        reclaimed
    }
}
