use std::collections::HashSet;
use std::path::Path;

use rulefold_common::source::INTERNAL_RULES_SOURCE_NAME;

use super::schema::SourcesConfig;

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Validation(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for LoadError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

pub fn load_from_file(path: &Path) -> Result<SourcesConfig, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(yaml: &str) -> Result<SourcesConfig, LoadError> {
    let cfg: SourcesConfig = serde_yaml::from_str(yaml)?;
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &SourcesConfig) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for entry in &cfg.sources {
        if entry.name.is_empty() {
            return Err(LoadError::Validation("source name must not be empty".into()));
        }
        if entry.name == INTERNAL_RULES_SOURCE_NAME {
            return Err(LoadError::Validation(format!(
                "source name {INTERNAL_RULES_SOURCE_NAME:?} is reserved for the internal source"
            )));
        }
        if entry.url.is_empty() {
            return Err(LoadError::Validation(format!(
                "source {}: url must not be empty",
                entry.name
            )));
        }
        if !seen.insert(entry.name.as_str()) {
            return Err(LoadError::Validation(format!(
                "duplicate source name: {}",
                entry.name
            )));
        }
    }
    Ok(())
}
