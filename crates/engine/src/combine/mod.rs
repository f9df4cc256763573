mod cache;
mod hash;
mod matcher;
mod merge;
mod orchestrator;
mod provider;
mod totals;

pub use cache::ReconciliationCache;
pub use hash::hash_query;
pub use matcher::find_existing_rule;
pub use merge::{
    add_combined_groups, attach_definition_rules, combine_rules_namespaces,
    flatten_internal_namespaces, sort_rules_by_name,
};
pub use orchestrator::{Reconciler, UnknownRulesSource};
pub use provider::SnapshotProvider;
pub use totals::{
    calculate_all_groups_totals, calculate_group_totals, calculate_rule_filtered_totals,
    calculate_rule_totals,
};
