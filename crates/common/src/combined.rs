use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::definition::DefinitionRule;
use crate::source::RulesSource;
use crate::state::StateRule;

/// Instance-level outcome categories of a combined rule. Absent key means
/// unknown or not applicable, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceTotalsKey {
    Alerting,
    Pending,
    Inactive,
    NoData,
    Error,
}

/// Group-level outcome categories; the group schema additionally counts
/// recording and paused rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupTotalsKey {
    Alerting,
    Pending,
    Inactive,
    NoData,
    Error,
    Recording,
    Paused,
}

pub type InstanceTotals = BTreeMap<InstanceTotalsKey, u64>;
pub type GroupTotals = BTreeMap<GroupTotalsKey, u64>;

/// One reconciled namespace. Rebuilt from scratch on every merge pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedNamespace {
    pub source: RulesSource,
    pub name: String,
    pub uid: Option<String>,
    pub groups: Vec<CombinedGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedGroup {
    pub name: String,
    pub interval: Option<String>,
    pub source_tenants: Option<Vec<String>>,
    pub rules: Vec<CombinedRule>,
    pub totals: GroupTotals,
}

/// The unified rule entity. Carries at least one of the two origin records;
/// it is fully matched when it carries both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRule {
    pub name: String,
    pub query: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    pub definition: Option<DefinitionRule>,
    pub state: Option<StateRule>,
    #[serde(default)]
    pub instance_totals: InstanceTotals,
    #[serde(default)]
    pub filtered_instance_totals: InstanceTotals,
}

impl CombinedRule {
    pub fn is_fully_matched(&self) -> bool {
        self.definition.is_some() && self.state.is_some()
    }
}
