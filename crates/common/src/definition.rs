use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Definition-view snapshot for one rules source: the rules as configured,
/// independent of evaluation. Namespace order is the order the source
/// reported them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionSnapshot {
    pub namespaces: Vec<DefinitionNamespace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionNamespace {
    pub name: String,
    pub groups: Vec<DefinitionGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionGroup {
    pub name: String,
    pub interval: Option<String>,
    pub source_tenants: Option<Vec<String>>,
    pub rules: Vec<DefinitionRule>,
}

/// A configured rule record. The wire shape is discriminated by which fields
/// are present: `alert` + `expr`, `record` + `expr`, or a managed rule with a
/// title and pause flag but no raw expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefinitionRule {
    Alerting(AlertingDefinition),
    Recording(RecordingDefinition),
    Managed(ManagedDefinition),
}

impl DefinitionRule {
    pub fn name(&self) -> &str {
        match self {
            Self::Alerting(rule) => &rule.alert,
            Self::Recording(rule) => &rule.record,
            Self::Managed(rule) => &rule.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertingDefinition {
    pub alert: String,
    pub expr: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingDefinition {
    pub record: String,
    pub expr: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// Rule managed by the hosting system itself. Carries handles back to its
/// namespace and group; every rule in a managed group shares the same
/// namespace handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagedDefinition {
    pub uid: String,
    pub title: String,
    pub namespace_uid: String,
    pub group_name: String,
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}
