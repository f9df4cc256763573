use std::sync::Arc;

use dashmap::DashMap;

use rulefold_common::combined::CombinedNamespace;
use rulefold_common::definition::DefinitionSnapshot;
use rulefold_common::state::StateSnapshot;

struct CacheEntry {
    definition: Option<Arc<DefinitionSnapshot>>,
    state: Option<Arc<StateSnapshot>>,
    result: Arc<Vec<CombinedNamespace>>,
}

/// Per-source memoization of the last merge pass, keyed on the identity of
/// the two input snapshots (`Arc::ptr_eq`, not structural equality). One slot
/// per source name; entries are overwritten, never evicted.
#[derive(Clone)]
pub struct ReconciliationCache {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl Default for ReconciliationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconciliationCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Returns the cached tree when both current snapshot references are the
    /// ones the tree was computed from. Two absent snapshots compare equal.
    pub fn lookup(
        &self,
        source_name: &str,
        definition: Option<&Arc<DefinitionSnapshot>>,
        state: Option<&Arc<StateSnapshot>>,
    ) -> Option<Arc<Vec<CombinedNamespace>>> {
        let entry = self.entries.get(source_name)?;
        if same_ref(entry.definition.as_ref(), definition) && same_ref(entry.state.as_ref(), state)
        {
            return Some(entry.result.clone());
        }
        None
    }

    pub fn store(
        &self,
        source_name: &str,
        definition: Option<Arc<DefinitionSnapshot>>,
        state: Option<Arc<StateSnapshot>>,
        result: Arc<Vec<CombinedNamespace>>,
    ) {
        self.entries.insert(
            source_name.to_string(),
            CacheEntry {
                definition,
                state,
                result,
            },
        );
    }
}

fn same_ref<T>(cached: Option<&Arc<T>>, current: Option<&Arc<T>>) -> bool {
    match (cached, current) {
        (None, None) => true,
        (Some(cached), Some(current)) => Arc::ptr_eq(cached, current),
        _ => false,
    }
}
