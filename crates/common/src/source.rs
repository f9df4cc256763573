use serde::{Deserialize, Serialize};

pub const INTERNAL_RULES_SOURCE_NAME: &str = "internal";

/// Where rules come from: the singleton source managed by the hosting system,
/// or a named external rule source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RulesSource {
    Internal,
    External { name: String },
}

impl RulesSource {
    pub fn external(name: impl Into<String>) -> Self {
        Self::External { name: name.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Internal => INTERNAL_RULES_SOURCE_NAME,
            Self::External { name } => name,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}
