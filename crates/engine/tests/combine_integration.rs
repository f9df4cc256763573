use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rulefold_common::combined::{GroupTotalsKey, InstanceTotalsKey};
use rulefold_common::definition::{
    AlertingDefinition, DefinitionGroup, DefinitionNamespace, DefinitionRule, DefinitionSnapshot,
    ManagedDefinition,
};
use rulefold_common::source::RulesSource;
use rulefold_common::state::{
    AlertInstance, AlertingRuleState, AlertingStateRule, InstanceState, RuleHealth, StateGroup,
    StateGroupTotalsKey, StateNamespace, StateRule, StateSnapshot,
};
use rulefold_engine::combine::{flatten_internal_namespaces, Reconciler, SnapshotProvider};
use rulefold_engine::config::load_from_str;

#[derive(Default)]
struct FakeProvider {
    definitions: HashMap<String, Arc<DefinitionSnapshot>>,
    states: HashMap<String, Arc<StateSnapshot>>,
}

impl SnapshotProvider for FakeProvider {
    fn definition_snapshot(&self, source_name: &str) -> Option<Arc<DefinitionSnapshot>> {
        self.definitions.get(source_name).cloned()
    }

    fn state_snapshot(&self, source_name: &str) -> Option<Arc<StateSnapshot>> {
        self.states.get(source_name).cloned()
    }
}

fn alerting_definition(name: &str, expr: &str) -> DefinitionRule {
    DefinitionRule::Alerting(AlertingDefinition {
        alert: name.into(),
        expr: expr.into(),
        labels: HashMap::new(),
        annotations: HashMap::new(),
    })
}

fn managed_definition(title: &str, namespace_uid: &str) -> DefinitionRule {
    DefinitionRule::Managed(ManagedDefinition {
        uid: format!("uid-{title}"),
        title: title.into(),
        namespace_uid: namespace_uid.into(),
        group_name: "eval-group".into(),
        is_paused: false,
        labels: HashMap::new(),
        annotations: HashMap::new(),
    })
}

fn definition_snapshot(namespace: &str, groups: Vec<DefinitionGroup>) -> Arc<DefinitionSnapshot> {
    Arc::new(DefinitionSnapshot {
        namespaces: vec![DefinitionNamespace {
            name: namespace.into(),
            groups,
        }],
    })
}

fn alerting_state_rule(name: &str, expr: &str, alerts: Vec<InstanceState>) -> StateRule {
    StateRule::Alerting(AlertingStateRule {
        name: name.into(),
        query: expr.into(),
        labels: HashMap::new(),
        annotations: HashMap::new(),
        state: AlertingRuleState::Firing,
        health: RuleHealth::Ok,
        alerts: alerts
            .into_iter()
            .map(|state| AlertInstance {
                labels: HashMap::new(),
                state,
            })
            .collect(),
        totals: None,
        totals_filtered: None,
    })
}

fn state_snapshot(namespace: &str, groups: Vec<StateGroup>) -> Arc<StateSnapshot> {
    Arc::new(StateSnapshot {
        namespaces: vec![StateNamespace {
            name: namespace.into(),
            groups,
        }],
    })
}

fn reconciler_from_config() -> Reconciler {
    let cfg = load_from_str(
        r#"
sources:
  - name: mimir-prod
    url: https://mimir.example.com
"#,
    )
    .unwrap();
    Reconciler::new(cfg.rules_sources())
}

#[test]
fn full_pass_merges_config_sources_and_caches() {
    let reconciler = reconciler_from_config();

    let mut provider = FakeProvider::default();
    provider.definitions.insert(
        "mimir-prod".into(),
        definition_snapshot(
            "team-a",
            vec![DefinitionGroup {
                name: "availability".into(),
                interval: Some("1m".into()),
                source_tenants: None,
                rules: vec![
                    alerting_definition("InstanceDown", "up == 0"),
                    alerting_definition("ConfiguredOnly", "rate(errors[5m]) > 1"),
                ],
            }],
        ),
    );
    provider.states.insert(
        "mimir-prod".into(),
        state_snapshot(
            "team-a",
            vec![StateGroup {
                name: "availability".into(),
                rules: vec![alerting_state_rule(
                    "InstanceDown",
                    "(up == 0)",
                    vec![
                        InstanceState::Firing,
                        InstanceState::Firing,
                        InstanceState::Pending,
                    ],
                )],
                totals: Some(BTreeMap::from([(StateGroupTotalsKey::Firing, 1)])),
            }],
        ),
    );

    let combined = reconciler.combined_namespaces(&provider, None).unwrap();

    // internal source has no snapshots, so only the external namespace shows
    assert_eq!(combined.len(), 1);
    let namespace = &combined[0];
    assert_eq!(namespace.source, RulesSource::external("mimir-prod"));
    assert_eq!(namespace.name, "team-a");

    let group = &namespace.groups[0];
    assert_eq!(group.interval.as_deref(), Some("1m"));
    assert_eq!(group.totals.get(&GroupTotalsKey::Alerting), Some(&1));

    // paren-wrapped query still pairs with its definition
    assert_eq!(group.rules.len(), 2);
    let matched = &group.rules[0];
    assert!(matched.definition.is_some() && matched.state.is_some());
    assert_eq!(matched.instance_totals.get(&InstanceTotalsKey::Alerting), Some(&2));
    assert_eq!(matched.instance_totals.get(&InstanceTotalsKey::Pending), Some(&1));

    // definition-only rule survives the union merge
    let unmatched = &group.rules[1];
    assert_eq!(unmatched.name, "ConfiguredOnly");
    assert!(unmatched.state.is_none());

    // identical snapshot references short-circuit into the cached tree
    let first = reconciler.source_namespaces(&provider, "mimir-prod").unwrap();
    let second = reconciler.source_namespaces(&provider, "mimir-prod").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn scoping_to_unknown_source_fails() {
    let reconciler = reconciler_from_config();
    let provider = FakeProvider::default();

    let err = reconciler
        .combined_namespaces(&provider, Some("not-configured"))
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown rules source: not-configured");
}

#[test]
fn internal_namespaces_flatten_into_default_group() {
    let reconciler = reconciler_from_config();

    let mut provider = FakeProvider::default();
    provider.definitions.insert(
        "internal".into(),
        definition_snapshot(
            "ops-folder",
            vec![
                DefinitionGroup {
                    name: "g1".into(),
                    interval: None,
                    source_tenants: None,
                    rules: vec![managed_definition("ZuluAlert", "folder-uid")],
                },
                DefinitionGroup {
                    name: "g2".into(),
                    interval: None,
                    source_tenants: None,
                    rules: vec![managed_definition("AlphaAlert", "folder-uid")],
                },
            ],
        ),
    );

    let combined = reconciler
        .combined_namespaces(&provider, Some("internal"))
        .unwrap();
    assert_eq!(combined[0].uid.as_deref(), Some("folder-uid"));

    let flattened = flatten_internal_namespaces(&combined);
    assert_eq!(flattened.len(), 1);
    assert_eq!(flattened[0].groups.len(), 1);

    let group = &flattened[0].groups[0];
    assert_eq!(group.name, "default");
    assert_eq!(group.rules[0].name, "AlphaAlert");
    assert_eq!(group.rules[1].name, "ZuluAlert");
    // two groups of one unpaused managed rule each
    assert_eq!(group.totals.get(&GroupTotalsKey::Paused), Some(&0));
    assert_eq!(group.totals.get(&GroupTotalsKey::Recording), Some(&0));
}
