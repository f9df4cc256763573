use serde::Deserialize;

use rulefold_common::source::RulesSource;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SourcesConfig {
    #[serde(default = "yes")]
    pub internal: bool,
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SourceEntry {
    pub name: String,
    pub url: String,
}

fn yes() -> bool {
    true
}

impl SourcesConfig {
    /// Rules sources in resolution order: the internal source first when
    /// enabled, then the externals as declared.
    pub fn rules_sources(&self) -> Vec<RulesSource> {
        let mut sources = Vec::new();
        if self.internal {
            sources.push(RulesSource::Internal);
        }
        for entry in &self.sources {
            sources.push(RulesSource::external(entry.name.clone()));
        }
        sources
    }
}
