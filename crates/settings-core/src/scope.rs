//! Settings scopes and repository selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where a setting lives: shared with the project or local to one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsScope {
    /// Shared settings, committed with the project
    #[default]
    Project,
    /// Personal settings for the current user
    User,
}

impl SettingsScope {
    /// Narrow this scope to the repository called `name`.
    pub fn named(self, name: &str) -> RepositorySelector<'_> {
        RepositorySelector {
            scope: self,
            name: Some(name),
        }
    }
}

impl fmt::Display for SettingsScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::User => write!(f, "user"),
        }
    }
}

impl FromStr for SettingsScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "project" => Ok(Self::Project),
            "user" => Ok(Self::User),
            other => Err(format!("unknown settings scope '{other}' (expected project or user)")),
        }
    }
}

/// Picks the repositories a façade call applies to.
///
/// Built from a bare [`SettingsScope`] to match every repository of that
/// scope, or with [`SettingsScope::named`] to also match on repository name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositorySelector<'a> {
    pub scope: SettingsScope,
    pub name: Option<&'a str>,
}

impl RepositorySelector<'_> {
    /// Whether a repository with this identity is selected.
    pub fn matches(&self, scope: SettingsScope, name: &str) -> bool {
        self.scope == scope && self.name.is_none_or(|wanted| wanted == name)
    }
}

impl From<SettingsScope> for RepositorySelector<'_> {
    fn from(scope: SettingsScope) -> Self {
        Self { scope, name: None }
    }
}

impl fmt::Display for RepositorySelector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "{} repository '{}'", self.scope, name),
            None => write!(f, "{} repository", self.scope),
        }
    }
}
