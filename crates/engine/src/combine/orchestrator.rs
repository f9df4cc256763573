use std::sync::Arc;

use rulefold_common::combined::CombinedNamespace;
use rulefold_common::source::RulesSource;

use super::cache::ReconciliationCache;
use super::merge::combine_rules_namespaces;
use super::provider::SnapshotProvider;

/// The orchestrator was asked to scope to a rules source that is not
/// configured. This is a configuration error, not a data error.
#[derive(Debug)]
pub struct UnknownRulesSource(pub String);

impl std::fmt::Display for UnknownRulesSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown rules source: {}", self.0)
    }
}

impl std::error::Error for UnknownRulesSource {}

/// Runs the merge across the configured rule sources, memoizing each source's
/// tree on snapshot identity.
pub struct Reconciler {
    sources: Vec<RulesSource>,
    cache: ReconciliationCache,
}

impl Reconciler {
    pub fn new(sources: Vec<RulesSource>) -> Self {
        Self {
            sources,
            cache: ReconciliationCache::new(),
        }
    }

    pub fn sources(&self) -> &[RulesSource] {
        &self.sources
    }

    /// One reconciliation pass for a single source. Returns the cached tree
    /// untouched when neither snapshot reference changed since the last pass.
    pub fn source_namespaces(
        &self,
        provider: &dyn SnapshotProvider,
        source_name: &str,
    ) -> Result<Arc<Vec<CombinedNamespace>>, UnknownRulesSource> {
        let source = self.resolve(source_name)?;
        Ok(self.reconcile(provider, source))
    }

    /// Merges all configured sources, or only the named one, into a flat
    /// namespace list.
    pub fn combined_namespaces(
        &self,
        provider: &dyn SnapshotProvider,
        scope: Option<&str>,
    ) -> Result<Vec<CombinedNamespace>, UnknownRulesSource> {
        let selected: Vec<&RulesSource> = match scope {
            Some(name) => vec![self.resolve(name)?],
            None => self.sources.iter().collect(),
        };

        let mut combined = Vec::new();
        for source in selected {
            let result = self.reconcile(provider, source);
            combined.extend_from_slice(&result);
        }
        Ok(combined)
    }

    fn resolve(&self, name: &str) -> Result<&RulesSource, UnknownRulesSource> {
        self.sources
            .iter()
            .find(|source| source.name() == name)
            .ok_or_else(|| UnknownRulesSource(name.to_string()))
    }

    fn reconcile(
        &self,
        provider: &dyn SnapshotProvider,
        source: &RulesSource,
    ) -> Arc<Vec<CombinedNamespace>> {
        let definition = provider.definition_snapshot(source.name());
        let state = provider.state_snapshot(source.name());

        if let Some(cached) = self
            .cache
            .lookup(source.name(), definition.as_ref(), state.as_ref())
        {
            tracing::debug!(source = %source.name(), "snapshots unchanged, reusing cached tree");
            return cached;
        }

        let namespaces = combine_rules_namespaces(source, definition.as_deref(), state.as_deref());
        tracing::debug!(
            source = %source.name(),
            namespaces = namespaces.len(),
            "recomputed combined namespaces"
        );
        let result = Arc::new(namespaces);
        self.cache
            .store(source.name(), definition, state, result.clone());
        result
    }
}
