use serde::{Deserialize, Serialize};

/// Content-model configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub css: CssConfig,
}

/// Which node type represents a group shared by several node types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupTieBreak {
    #[default]
    FirstDeclared,
    LastDeclared,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Maximum nesting of node content expansions
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default)]
    pub group_tie_break: GroupTieBreak,
}

fn default_max_depth() -> usize {
    32
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            group_tie_break: GroupTieBreak::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssConfig {
    /// Parse every bundled syntax once when the property table is built
    #[serde(default = "default_true")]
    pub startup_diagnostics: bool,

    /// Drop unknown CSS functions from composite values instead of failing
    #[serde(default = "default_true")]
    pub drop_unknown_functions: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            startup_diagnostics: true,
            drop_unknown_functions: true,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
