use std::collections::HashMap;

use rulefold_common::combined::CombinedRule;
use rulefold_common::source::RulesSource;
use rulefold_common::state::StateRule;

use super::hash::hash_query;

/// Index of combined rules by name. Built once per group before folding in
/// state records; state-view names are not required to be unique, so each
/// name maps to every candidate slot.
pub fn index_rules_by_name(rules: &[CombinedRule]) -> HashMap<String, Vec<usize>> {
    let mut index: HashMap<String, Vec<usize>> = HashMap::new();
    for (slot, rule) in rules.iter().enumerate() {
        index.entry(rule.name.clone()).or_default().push(slot);
    }
    index
}

/// Finds the combined rule a state-view record corresponds to, or `None` when
/// the record is new to the group.
///
/// Internal-source groups hold a single rule, so the name match is taken
/// unconditionally. For external sources a strict pass compares the hashed
/// query plus labels and annotations against candidates not yet paired with a
/// state record; if that fails, a loose pass ignores the query entirely —
/// name, labels and annotations are the more trustworthy identity, since
/// sources can rewrite a query (`2 > 1` can come back as `1`).
pub fn find_existing_rule(
    source: &RulesSource,
    rule: &StateRule,
    rules: &[CombinedRule],
    rules_by_name: &HashMap<String, Vec<usize>>,
) -> Option<usize> {
    let candidates = rules_by_name.get(rule.name())?;

    if source.is_internal() {
        return candidates.first().copied();
    }

    let strict = candidates.iter().copied().find(|&slot| {
        let candidate = &rules[slot];
        candidate.state.is_none() && matches_state_rule(candidate, rule, true)
    });
    if strict.is_some() {
        return strict;
    }

    candidates.iter().copied().find(|&slot| {
        let candidate = &rules[slot];
        candidate.state.is_none() && matches_state_rule(candidate, rule, false)
    })
}

fn matches_state_rule(combined: &CombinedRule, rule: &StateRule, check_query: bool) -> bool {
    if combined.name != rule.name() {
        return false;
    }
    if check_query && hash_query(&combined.query) != hash_query(rule.query()) {
        return false;
    }
    if combined.labels != *rule.labels() {
        return false;
    }
    match rule {
        StateRule::Alerting(alerting) => combined.annotations == alerting.annotations,
        StateRule::Recording(_) => combined.annotations.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulefold_common::combined::InstanceTotals;
    use rulefold_common::state::{AlertingRuleState, AlertingStateRule, RuleHealth};

    fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn candidate(name: &str, query: &str, labels_in: &[(&str, &str)]) -> CombinedRule {
        CombinedRule {
            name: name.into(),
            query: query.into(),
            labels: labels(labels_in),
            annotations: HashMap::new(),
            definition: None,
            state: None,
            instance_totals: InstanceTotals::new(),
            filtered_instance_totals: InstanceTotals::new(),
        }
    }

    fn state_rule(name: &str, query: &str, labels_in: &[(&str, &str)]) -> StateRule {
        StateRule::Alerting(AlertingStateRule {
            name: name.into(),
            query: query.into(),
            labels: labels(labels_in),
            annotations: HashMap::new(),
            state: AlertingRuleState::Inactive,
            health: RuleHealth::Ok,
            alerts: Vec::new(),
            totals: None,
            totals_filtered: None,
        })
    }

    fn external() -> RulesSource {
        RulesSource::external("mimir")
    }

    #[test]
    fn strict_match_is_paren_insensitive() {
        let rules = vec![candidate("A", "(up==1)", &[("x", "1")])];
        let index = index_rules_by_name(&rules);
        let rule = state_rule("A", "up==1", &[("x", "1")]);
        assert_eq!(find_existing_rule(&external(), &rule, &rules, &index), Some(0));
    }

    #[test]
    fn label_mismatch_fails_both_passes() {
        let rules = vec![candidate("A", "up==1", &[("x", "1")])];
        let index = index_rules_by_name(&rules);
        let rule = state_rule("A", "up==1", &[("x", "2")]);
        assert_eq!(find_existing_rule(&external(), &rule, &rules, &index), None);
    }

    #[test]
    fn rewritten_query_matches_loosely() {
        let rules = vec![candidate("A", "2 > 1", &[])];
        let index = index_rules_by_name(&rules);
        let rule = state_rule("A", "1", &[]);
        assert_eq!(find_existing_rule(&external(), &rule, &rules, &index), Some(0));
    }

    #[test]
    fn already_paired_candidate_skipped() {
        let mut paired = candidate("A", "up==1", &[]);
        paired.state = Some(state_rule("A", "up==1", &[]));
        let rules = vec![paired, candidate("A", "up==1", &[])];
        let index = index_rules_by_name(&rules);
        let rule = state_rule("A", "up==1", &[]);
        assert_eq!(find_existing_rule(&external(), &rule, &rules, &index), Some(1));
    }

    #[test]
    fn unknown_name_is_new() {
        let rules = vec![candidate("A", "up==1", &[])];
        let index = index_rules_by_name(&rules);
        let rule = state_rule("B", "up==1", &[]);
        assert_eq!(find_existing_rule(&external(), &rule, &rules, &index), None);
    }

    #[test]
    fn internal_source_takes_first_name_match() {
        // managed groups hold one rule; labels and query are not re-checked
        let rules = vec![candidate("A", "something else", &[("other", "labels")])];
        let index = index_rules_by_name(&rules);
        let rule = state_rule("A", "up==1", &[]);
        assert_eq!(
            find_existing_rule(&RulesSource::Internal, &rule, &rules, &index),
            Some(0)
        );
    }
}
