use std::collections::HashMap;

use rulefold_common::combined::{
    CombinedGroup, CombinedNamespace, CombinedRule, GroupTotals, GroupTotalsKey, InstanceTotals,
};
use rulefold_common::definition::{DefinitionGroup, DefinitionRule, DefinitionSnapshot};
use rulefold_common::source::RulesSource;
use rulefold_common::state::{StateGroup, StateNamespace, StateRule, StateSnapshot};

use super::matcher::{find_existing_rule, index_rules_by_name};
use super::totals::{
    calculate_all_groups_totals, calculate_group_totals, calculate_rule_filtered_totals,
    calculate_rule_totals,
};

/// Union merge for one rules source.
///
/// Definition namespaces are built first, establishing group order, paused
/// and recording counts, and per-rule identity; the state view is folded in
/// afterwards. Definition-only rules stay in the tree; state-only groups and
/// rules are appended.
pub fn combine_rules_namespaces(
    source: &RulesSource,
    definition: Option<&DefinitionSnapshot>,
    state: Option<&StateSnapshot>,
) -> Vec<CombinedNamespace> {
    let mut namespaces: Vec<CombinedNamespace> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    if let Some(definition) = definition {
        for namespace in &definition.namespaces {
            let mut combined = empty_namespace(source, &namespace.name);
            // all rules of a managed group share one namespace handle, so the
            // first rule's is lifted onto the namespace
            if let Some(DefinitionRule::Managed(rule)) =
                namespace.groups.first().and_then(|group| group.rules.first())
            {
                combined.uid = Some(rule.namespace_uid.clone());
            }
            add_definition_groups(&mut combined, &namespace.groups);
            index.insert(namespace.name.clone(), namespaces.len());
            namespaces.push(combined);
        }
    }

    if let Some(state) = state {
        for namespace in &state.namespaces {
            let slot = match index.get(namespace.name.as_str()) {
                Some(&slot) => slot,
                None => {
                    index.insert(namespace.name.clone(), namespaces.len());
                    namespaces.push(empty_namespace(source, &namespace.name));
                    namespaces.len() - 1
                }
            };
            add_state_groups(source, &mut namespaces[slot], &namespace.groups);
        }
    }

    namespaces
}

/// Attach-only variant: identical construction for a single namespace, after
/// which every rule lacking a state-view counterpart is dropped. Used when
/// the caller only wants definition rules confirmed live in the evaluation
/// engine.
pub fn attach_definition_rules(
    source: &RulesSource,
    state_namespace: &StateNamespace,
    definition_groups: &[DefinitionGroup],
) -> CombinedNamespace {
    let mut namespace = empty_namespace(source, &state_namespace.name);

    // order matters: definition rules first, so state records attach to them
    add_definition_groups(&mut namespace, definition_groups);
    add_state_groups(source, &mut namespace, &state_namespace.groups);

    for group in &mut namespace.groups {
        group.rules.retain(|rule| rule.state.is_some());
    }
    namespace
}

/// Folds both views' groups into an existing combined namespace. The
/// definition groups replace whatever groups the namespace already carried.
pub fn add_combined_groups(
    namespace: &mut CombinedNamespace,
    definition_groups: &[DefinitionGroup],
    state_groups: &[StateGroup],
) {
    let source = namespace.source.clone();
    add_definition_groups(namespace, definition_groups);
    add_state_groups(&source, namespace, state_groups);
}

/// Collapses every group of each namespace into a single group named
/// "default", with rules re-sorted by name and totals re-summed. Internal
/// source only, where the namespace is the real grouping unit.
pub fn flatten_internal_namespaces(namespaces: &[CombinedNamespace]) -> Vec<CombinedNamespace> {
    namespaces
        .iter()
        .map(|namespace| {
            let mut rules: Vec<CombinedRule> = namespace
                .groups
                .iter()
                .flat_map(|group| group.rules.iter().cloned())
                .collect();
            sort_rules_by_name(&mut rules);

            CombinedNamespace {
                source: namespace.source.clone(),
                name: namespace.name.clone(),
                uid: namespace.uid.clone(),
                groups: vec![CombinedGroup {
                    name: "default".to_string(),
                    interval: None,
                    source_tenants: None,
                    totals: calculate_all_groups_totals(&namespace.groups),
                    rules,
                }],
            }
        })
        .collect()
}

pub fn sort_rules_by_name(rules: &mut [CombinedRule]) {
    rules.sort_by(|a, b| a.name.cmp(&b.name));
}

fn empty_namespace(source: &RulesSource, name: &str) -> CombinedNamespace {
    CombinedNamespace {
        source: source.clone(),
        name: name.to_string(),
        uid: None,
        groups: Vec::new(),
    }
}

fn add_definition_groups(namespace: &mut CombinedNamespace, groups: &[DefinitionGroup]) {
    namespace.groups = groups
        .iter()
        .map(|group| {
            let recording = group
                .rules
                .iter()
                .filter(|rule| matches!(rule, DefinitionRule::Recording(_)))
                .count() as u64;
            let paused = group
                .rules
                .iter()
                .filter(|rule| matches!(rule, DefinitionRule::Managed(managed) if managed.is_paused))
                .count() as u64;

            CombinedGroup {
                name: group.name.clone(),
                interval: group.interval.clone(),
                source_tenants: group.source_tenants.clone(),
                rules: group.rules.iter().map(definition_rule_to_combined).collect(),
                totals: GroupTotals::from([
                    (GroupTotalsKey::Paused, paused),
                    (GroupTotalsKey::Recording, recording),
                ]),
            }
        })
        .collect();
}

fn add_state_groups(source: &RulesSource, namespace: &mut CombinedNamespace, groups: &[StateGroup]) {
    let mut groups_by_name: HashMap<String, usize> = namespace
        .groups
        .iter()
        .enumerate()
        .map(|(slot, group)| (group.name.clone(), slot))
        .collect();

    for group in groups {
        let state_totals = calculate_group_totals(group);
        let slot = match groups_by_name.get(group.name.as_str()) {
            Some(&slot) => slot,
            None => {
                groups_by_name.insert(group.name.clone(), namespace.groups.len());
                namespace.groups.push(CombinedGroup {
                    name: group.name.clone(),
                    interval: None,
                    source_tenants: None,
                    rules: Vec::new(),
                    totals: GroupTotals::new(),
                });
                namespace.groups.len() - 1
            }
        };
        let combined_group = &mut namespace.groups[slot];

        // overlay onto whatever the definition pass put there; state-derived
        // values win on key collision
        for (key, count) in state_totals {
            combined_group.totals.insert(key, count);
        }

        // built once: rules appended below are not candidates for later
        // records of the same group
        let rules_by_name = index_rules_by_name(&combined_group.rules);

        for rule in &group.rules {
            match find_existing_rule(source, rule, &combined_group.rules, &rules_by_name) {
                Some(slot) => {
                    let existing = &mut combined_group.rules[slot];
                    existing.state = Some(rule.clone());
                    match rule {
                        StateRule::Alerting(alerting) => {
                            existing.instance_totals = calculate_rule_totals(alerting);
                            existing.filtered_instance_totals =
                                calculate_rule_filtered_totals(alerting);
                        }
                        StateRule::Recording(_) => {
                            existing.instance_totals = InstanceTotals::new();
                            existing.filtered_instance_totals = InstanceTotals::new();
                        }
                    }
                }
                None => combined_group.rules.push(state_rule_to_combined(rule)),
            }
        }
    }
}

fn definition_rule_to_combined(rule: &DefinitionRule) -> CombinedRule {
    match rule {
        DefinitionRule::Alerting(alerting) => CombinedRule {
            name: alerting.alert.clone(),
            query: alerting.expr.clone(),
            labels: alerting.labels.clone(),
            annotations: alerting.annotations.clone(),
            definition: Some(rule.clone()),
            state: None,
            instance_totals: InstanceTotals::new(),
            filtered_instance_totals: InstanceTotals::new(),
        },
        DefinitionRule::Recording(recording) => CombinedRule {
            name: recording.record.clone(),
            query: recording.expr.clone(),
            labels: recording.labels.clone(),
            annotations: HashMap::new(),
            definition: Some(rule.clone()),
            state: None,
            instance_totals: InstanceTotals::new(),
            filtered_instance_totals: InstanceTotals::new(),
        },
        DefinitionRule::Managed(managed) => CombinedRule {
            name: managed.title.clone(),
            query: String::new(),
            labels: managed.labels.clone(),
            annotations: managed.annotations.clone(),
            definition: Some(rule.clone()),
            state: None,
            instance_totals: InstanceTotals::new(),
            filtered_instance_totals: InstanceTotals::new(),
        },
    }
}

fn state_rule_to_combined(rule: &StateRule) -> CombinedRule {
    match rule {
        StateRule::Alerting(alerting) => CombinedRule {
            name: alerting.name.clone(),
            query: alerting.query.clone(),
            labels: alerting.labels.clone(),
            annotations: alerting.annotations.clone(),
            definition: None,
            state: Some(rule.clone()),
            instance_totals: calculate_rule_totals(alerting),
            filtered_instance_totals: calculate_rule_filtered_totals(alerting),
        },
        StateRule::Recording(recording) => CombinedRule {
            name: recording.name.clone(),
            query: recording.query.clone(),
            labels: recording.labels.clone(),
            annotations: HashMap::new(),
            definition: None,
            state: Some(rule.clone()),
            instance_totals: InstanceTotals::new(),
            filtered_instance_totals: InstanceTotals::new(),
        },
    }
}
