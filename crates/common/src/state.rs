use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// State-view snapshot for one rules source: the evaluation engine's live
/// view of the same rules, with firing state, health and instance counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub namespaces: Vec<StateNamespace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateNamespace {
    pub name: String,
    pub groups: Vec<StateGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateGroup {
    pub name: String,
    pub rules: Vec<StateRule>,
    /// Pre-aggregated per-group counts, in the source schema (`firing` key).
    pub totals: Option<BTreeMap<StateGroupTotalsKey, u64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StateRule {
    Alerting(AlertingStateRule),
    Recording(RecordingStateRule),
}

impl StateRule {
    pub fn name(&self) -> &str {
        match self {
            Self::Alerting(rule) => &rule.name,
            Self::Recording(rule) => &rule.name,
        }
    }

    pub fn query(&self) -> &str {
        match self {
            Self::Alerting(rule) => &rule.query,
            Self::Recording(rule) => &rule.query,
        }
    }

    pub fn labels(&self) -> &HashMap<String, String> {
        match self {
            Self::Alerting(rule) => &rule.labels,
            Self::Recording(rule) => &rule.labels,
        }
    }

    pub fn health(&self) -> RuleHealth {
        match self {
            Self::Alerting(rule) => rule.health,
            Self::Recording(rule) => rule.health,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertingStateRule {
    pub name: String,
    pub query: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    pub state: AlertingRuleState,
    pub health: RuleHealth,
    #[serde(default)]
    pub alerts: Vec<AlertInstance>,
    /// Pre-aggregated per-instance counts, in the source schema (`normal` key).
    pub totals: Option<BTreeMap<StateRuleTotalsKey, u64>>,
    pub totals_filtered: Option<BTreeMap<StateRuleTotalsKey, u64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingStateRule {
    pub name: String,
    pub query: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    pub health: RuleHealth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertInstance {
    #[serde(default)]
    pub labels: HashMap<String, String>,
    pub state: InstanceState,
}

/// Per-instance state. Carries the union vocabulary of both upstreams:
/// `firing` is a synonym for `alerting` and `err` for `error`; `normal`
/// counts as inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceState {
    Alerting,
    Firing,
    Pending,
    Normal,
    NoData,
    Error,
    Err,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertingRuleState {
    Firing,
    Pending,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleHealth {
    Ok,
    Error,
    NoData,
    Unknown,
}

/// Keys of a rule's pre-aggregated totals as the source reports them; the
/// source says `normal` where the combined tree says `inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateRuleTotalsKey {
    Alerting,
    Pending,
    Normal,
    NoData,
    Error,
}

/// Keys of a group's pre-aggregated totals as the source reports them; the
/// source says `firing` where the combined tree says `alerting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateGroupTotalsKey {
    Firing,
    Pending,
    Inactive,
    NoData,
    Error,
    Recording,
    Paused,
}
