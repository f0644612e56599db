/*!
 * Garbage Collection
 * Pluggable collection strategies and their registry
 */

pub mod algorithm;
pub mod registry;

pub use algorithm::{AlgorithmInfo, AlgorithmKind, CollectionStrategy, ProbabilisticCollector};
pub use registry::{AlgorithmRegistry, SelectedAlgorithm};
