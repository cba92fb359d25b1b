use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Upper bound on the size of a group of enzyme actions that can block one
    /// another. Such a group is ordered exhaustively.
    pub max_permutation_actions: usize,
    /// Upper bound on distinct sets of accepted actions, each of which is
    /// reconstructed into fragments.
    pub max_cut_outcomes: usize,
    /// Also look for non-palindromic sites on the complementary strand.
    pub search_both_strands: bool,
    /// JSON enzyme catalog replacing the builtin one.
    pub catalog_path: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_permutation_actions: 10,
            max_cut_outcomes: 4096,
            search_both_strands: false,
            catalog_path: None,
        }
    }
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_permutation_actions == 0 {
            bail!("max_permutation_actions must be at least 1");
        }
        if self.max_cut_outcomes == 0 {
            bail!("max_cut_outcomes must be at least 1");
        }
        if let Some(path) = &self.catalog_path {
            if !Path::new(path).exists() {
                bail!("catalog_path does not exist: '{path}'");
            }
        }
        Ok(())
    }
}
