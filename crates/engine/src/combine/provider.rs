use std::sync::Arc;

use rulefold_common::definition::DefinitionSnapshot;
use rulefold_common::state::StateSnapshot;

/// Supplies the two raw snapshots for a rules source, keyed by source name.
///
/// Recomputation is keyed on reference identity: implementations must hand
/// back the same `Arc` as long as the underlying data is unchanged, and a new
/// `Arc` whenever it changed. Synthesizing a fresh reference for unchanged
/// data defeats the cache.
pub trait SnapshotProvider: Send + Sync {
    fn definition_snapshot(&self, source_name: &str) -> Option<Arc<DefinitionSnapshot>>;
    fn state_snapshot(&self, source_name: &str) -> Option<Arc<StateSnapshot>>;
}
