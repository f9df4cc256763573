use std::collections::{BTreeMap, HashMap};

use rulefold_common::combined::{
    CombinedGroup, GroupTotals, GroupTotalsKey, InstanceTotals, InstanceTotalsKey,
};
use rulefold_common::state::{
    AlertingRuleState, AlertingStateRule, InstanceState, RuleHealth, StateGroup,
    StateGroupTotalsKey, StateRule, StateRuleTotalsKey,
};

/// Instance-level totals for an alerting rule.
///
/// When the source already aggregated the counts, only the schema is
/// translated (`normal` becomes `inactive`). Otherwise the instance list is
/// tallied, folding the `firing`/`err` synonyms into `alerting`/`error`.
/// Categories with no matching instances are omitted, not zero.
pub fn calculate_rule_totals(rule: &AlertingStateRule) -> InstanceTotals {
    if let Some(totals) = &rule.totals {
        return rekey_rule_totals(totals);
    }

    let mut by_state: HashMap<InstanceState, u64> = HashMap::new();
    for alert in &rule.alerts {
        *by_state.entry(alert.state).or_insert(0) += 1;
    }

    let mut totals = InstanceTotals::new();
    let alerting = by_state
        .get(&InstanceState::Alerting)
        .or_else(|| by_state.get(&InstanceState::Firing));
    if let Some(&count) = alerting {
        totals.insert(InstanceTotalsKey::Alerting, count);
    }
    if let Some(&count) = by_state.get(&InstanceState::Pending) {
        totals.insert(InstanceTotalsKey::Pending, count);
    }
    if let Some(&count) = by_state.get(&InstanceState::Normal) {
        totals.insert(InstanceTotalsKey::Inactive, count);
    }
    if let Some(&count) = by_state.get(&InstanceState::NoData) {
        totals.insert(InstanceTotalsKey::NoData, count);
    }
    let error = by_state
        .get(&InstanceState::Error)
        .or_else(|| by_state.get(&InstanceState::Err));
    if let Some(&count) = error {
        totals.insert(InstanceTotalsKey::Error, count);
    }
    totals
}

/// Same schema translation for the separately-tracked filtered totals; empty
/// when the source reported none.
pub fn calculate_rule_filtered_totals(rule: &AlertingStateRule) -> InstanceTotals {
    match &rule.totals_filtered {
        Some(totals) => rekey_rule_totals(totals),
        None => InstanceTotals::new(),
    }
}

fn rekey_rule_totals(totals: &BTreeMap<StateRuleTotalsKey, u64>) -> InstanceTotals {
    totals
        .iter()
        .map(|(key, &count)| {
            let key = match key {
                StateRuleTotalsKey::Alerting => InstanceTotalsKey::Alerting,
                StateRuleTotalsKey::Pending => InstanceTotalsKey::Pending,
                StateRuleTotalsKey::Normal => InstanceTotalsKey::Inactive,
                StateRuleTotalsKey::NoData => InstanceTotalsKey::NoData,
                StateRuleTotalsKey::Error => InstanceTotalsKey::Error,
            };
            (key, count)
        })
        .collect()
}

/// Group-level totals from the state view.
///
/// Pre-aggregated totals are re-keyed (`firing` becomes `alerting`).
/// Otherwise rules are tallied by evaluation state and health; the recording
/// count is always recorded, including an explicit zero.
pub fn calculate_group_totals(group: &StateGroup) -> GroupTotals {
    if let Some(totals) = &group.totals {
        return totals
            .iter()
            .map(|(&key, &count)| (rekey_group_key(key), count))
            .collect();
    }

    let mut by_state: HashMap<AlertingRuleState, u64> = HashMap::new();
    let mut by_health: HashMap<RuleHealth, u64> = HashMap::new();
    let mut recording = 0u64;
    for rule in &group.rules {
        match rule {
            StateRule::Alerting(alerting) => {
                *by_state.entry(alerting.state).or_insert(0) += 1;
            }
            StateRule::Recording(_) => recording += 1,
        }
        *by_health.entry(rule.health()).or_insert(0) += 1;
    }

    let mut totals = GroupTotals::new();
    if let Some(&count) = by_state.get(&AlertingRuleState::Firing) {
        totals.insert(GroupTotalsKey::Alerting, count);
    }
    if let Some(&count) = by_health.get(&RuleHealth::Error) {
        totals.insert(GroupTotalsKey::Error, count);
    }
    if let Some(&count) = by_health.get(&RuleHealth::NoData) {
        totals.insert(GroupTotalsKey::NoData, count);
    }
    if let Some(&count) = by_state.get(&AlertingRuleState::Inactive) {
        totals.insert(GroupTotalsKey::Inactive, count);
    }
    if let Some(&count) = by_state.get(&AlertingRuleState::Pending) {
        totals.insert(GroupTotalsKey::Pending, count);
    }
    totals.insert(GroupTotalsKey::Recording, recording);
    totals
}

fn rekey_group_key(key: StateGroupTotalsKey) -> GroupTotalsKey {
    match key {
        StateGroupTotalsKey::Firing => GroupTotalsKey::Alerting,
        StateGroupTotalsKey::Pending => GroupTotalsKey::Pending,
        StateGroupTotalsKey::Inactive => GroupTotalsKey::Inactive,
        StateGroupTotalsKey::NoData => GroupTotalsKey::NoData,
        StateGroupTotalsKey::Error => GroupTotalsKey::Error,
        StateGroupTotalsKey::Recording => GroupTotalsKey::Recording,
        StateGroupTotalsKey::Paused => GroupTotalsKey::Paused,
    }
}

/// Key-wise sum of group totals across a namespace; a category absent in all
/// groups stays absent. Used when collapsing internal-source namespaces.
pub fn calculate_all_groups_totals(groups: &[CombinedGroup]) -> GroupTotals {
    let mut totals = GroupTotals::new();
    for group in groups {
        for (&key, &count) in &group.totals {
            *totals.entry(key).or_insert(0) += count;
        }
    }
    totals
}
