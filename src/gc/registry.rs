/*!
 * Algorithm Registry
 * Ordered set of collection algorithms with per-algorithm configuration
 */

use super::algorithm::{AlgorithmInfo, AlgorithmKind, CollectionStrategy};
use crate::core::errors::{GcError, GcResult};
use crate::core::types::AlgorithmId;
use std::sync::Arc;
use tracing::info;

struct RegisteredAlgorithm {
    info: AlgorithmInfo,
    strategy: Arc<dyn CollectionStrategy>,
}

/// Algorithm picked for a collection run
#[derive(Clone)]
pub struct SelectedAlgorithm {
    pub id: AlgorithmId,
    pub name: String,
    pub strategy: Arc<dyn CollectionStrategy>,
}

impl std::fmt::Debug for SelectedAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedAlgorithm")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Algorithm registry
///
/// Algorithms keep their registration order; the shipped set registers in
/// ascending id order.
#[derive(Default)]
pub struct AlgorithmRegistry {
    algorithms: Vec<RegisteredAlgorithm>,
}

impl AlgorithmRegistry {
    /// Registry with no algorithms
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the four shipped algorithms, all enabled
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for kind in AlgorithmKind::ALL {
            registry.algorithms.push(RegisteredAlgorithm {
                info: kind.info(),
                strategy: Arc::new(kind.strategy()),
            });
        }
        info!(
            algorithms = registry.algorithms.len(),
            "Algorithm registry initialized with default algorithms"
        );
        registry
    }

    /// Add an algorithm at the end of the registration order
    pub fn register(
        &mut self,
        info: AlgorithmInfo,
        strategy: Arc<dyn CollectionStrategy>,
    ) -> GcResult<()> {
        if self.position(info.id).is_some() {
            return Err(GcError::DuplicateAlgorithm(info.id));
        }
        info!(id = info.id, name = %info.name, "Registered GC algorithm");
        self.algorithms.push(RegisteredAlgorithm { info, strategy });
        Ok(())
    }

    pub fn list(&self) -> Vec<AlgorithmInfo> {
        self.algorithms.iter().map(|a| a.info.clone()).collect()
    }

    pub fn get(&self, id: AlgorithmId) -> GcResult<AlgorithmInfo> {
        self.position(id)
            .map(|idx| self.algorithms[idx].info.clone())
            .ok_or(GcError::AlgorithmNotFound(id))
    }

    pub fn set_enabled(&mut self, id: AlgorithmId, enabled: bool) -> GcResult<()> {
        self.entry_mut(id)?.info.enabled = enabled;
        Ok(())
    }

    pub fn set_performance_score(&mut self, id: AlgorithmId, score: i32) -> GcResult<()> {
        self.entry_mut(id)?.info.performance_score = score;
        Ok(())
    }

    /// Set both mutable fields at once, returning the updated metadata
    pub fn update(&mut self, id: AlgorithmId, enabled: bool, score: i32) -> GcResult<AlgorithmInfo> {
        let entry = self.entry_mut(id)?;
        entry.info.enabled = enabled;
        entry.info.performance_score = score;
        Ok(entry.info.clone())
    }

    /// First enabled algorithm in registration order
    pub fn select(&self) -> Option<SelectedAlgorithm> {
        self.algorithms
            .iter()
            .find(|a| a.info.enabled)
            .map(|a| SelectedAlgorithm {
                id: a.info.id,
                name: a.info.name.clone(),
                strategy: Arc::clone(&a.strategy),
            })
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    fn position(&self, id: AlgorithmId) -> Option<usize> {
        self.algorithms.iter().position(|a| a.info.id == id)
    }

    fn entry_mut(&mut self, id: AlgorithmId) -> GcResult<&mut RegisteredAlgorithm> {
        self.algorithms
            .iter_mut()
            .find(|a| a.info.id == id)
            .ok_or(GcError::AlgorithmNotFound(id))
    }
}
