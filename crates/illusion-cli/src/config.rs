//! Illusion CLI configuration.
//!
//! TOML file with one section per mode. Every section and field is optional;
//! command-line flags override whatever the file sets.

use anyhow::{Context, Result};
use illusion_core::IllusionError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IllusionConfig {
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl IllusionConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        content
            .parse::<Self>()
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Checks value ranges across all sections.
    pub fn validate(&self) -> illusion_core::Result<()> {
        self.synthesis.validate()?;
        self.search.validate()?;
        self.evaluation.validate()
    }

    /// Checks only the sections `mode` reads.
    ///
    /// Unknown modes fall back to [`IllusionConfig::validate`].
    pub fn validate_for_mode(&self, mode: &str) -> illusion_core::Result<()> {
        match mode {
            "synth" | "dynamics" => self.synthesis.validate(),
            "evaluate" => self.evaluation.validate(),
            "search" => {
                self.search.validate()?;
                self.evaluation.validate()
            }
            _ => self.validate(),
        }
    }
}

impl FromStr for IllusionConfig {
    type Err = toml::de::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        toml::from_str(content)
    }
}

// =============================================================================
// Synthesis
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default = "default_synth_nodes")]
    pub num_nodes: usize,

    #[serde(default = "default_synth_degree")]
    pub degree: usize,

    /// Step budget for the dynamics mode
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            num_nodes: default_synth_nodes(),
            degree: default_synth_degree(),
            max_steps: default_max_steps(),
        }
    }
}

impl SynthesisConfig {
    pub fn validate(&self) -> illusion_core::Result<()> {
        if self.degree < 3 || self.degree >= self.num_nodes {
            return Err(IllusionError::config(format!(
                "synthesis.degree must satisfy 3 <= degree < num_nodes (got degree={}, num_nodes={})",
                self.degree, self.num_nodes
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Search
// =============================================================================

/// What the random-graph search looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchTarget {
    /// A coloring with majority-majority illusion
    Majority,
    /// A graph on which no coloring has majority-majority illusion
    NoMajority,
    /// A coloring where more than 1/k of the nodes are under strict plurality illusion
    Plurality,
    /// A coloring where more than 1/k of the nodes are under strict quota illusion
    Quota,
}

impl FromStr for SearchTarget {
    type Err = IllusionError;

    fn from_str(s: &str) -> illusion_core::Result<Self> {
        match s {
            "majority" => Ok(SearchTarget::Majority),
            "no-majority" => Ok(SearchTarget::NoMajority),
            "plurality" => Ok(SearchTarget::Plurality),
            "quota" => Ok(SearchTarget::Quota),
            other => Err(IllusionError::config(format!(
                "unknown search target '{}'. Valid targets: majority, no-majority, plurality, quota",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_nodes")]
    pub num_nodes: usize,

    /// Out-neighbours per node in generated digraphs
    #[serde(default = "default_out_degree")]
    pub out_degree: usize,

    /// Colors used for plurality and quota targets (majority targets use 2)
    #[serde(default = "default_palette_size")]
    pub palette_size: usize,

    /// Random graphs to try before giving up
    #[serde(default = "default_max_graphs")]
    pub max_graphs: usize,

    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Weak tie handling for majority targets
    #[serde(default)]
    pub weak: bool,

    #[serde(default = "default_target")]
    pub target: SearchTarget,

    /// Wall-clock budget; the running search is cancelled when it expires
    #[serde(default)]
    pub time_limit_secs: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_nodes: default_search_nodes(),
            out_degree: default_out_degree(),
            palette_size: default_palette_size(),
            max_graphs: default_max_graphs(),
            seed: default_seed(),
            weak: false,
            target: default_target(),
            time_limit_secs: None,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> illusion_core::Result<()> {
        if self.out_degree == 0 || self.out_degree >= self.num_nodes {
            return Err(IllusionError::config(format!(
                "search.out_degree must satisfy 1 <= out_degree < num_nodes (got out_degree={}, num_nodes={})",
                self.out_degree, self.num_nodes
            )));
        }
        if self.palette_size < 2 {
            return Err(IllusionError::config(format!(
                "search.palette_size must be >= 2 (got {})",
                self.palette_size
            )));
        }
        if self.max_graphs == 0 {
            return Err(IllusionError::config("search.max_graphs must be > 0"));
        }
        Ok(())
    }
}

// =============================================================================
// Evaluation
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default = "default_quota")]
    pub quota: f64,

    /// Fraction threshold `1/k` for the aggregate plurality and quota checks
    #[serde(default = "default_k_fraction")]
    pub k_fraction: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            quota: default_quota(),
            k_fraction: default_k_fraction(),
        }
    }
}

impl EvaluationConfig {
    pub fn validate(&self) -> illusion_core::Result<()> {
        if !(self.quota > 0.0 && self.quota < 1.0) {
            return Err(IllusionError::config(format!(
                "evaluation.quota must be in (0.0, 1.0) (got {})",
                self.quota
            )));
        }
        if self.k_fraction == 0 {
            return Err(IllusionError::config("evaluation.k_fraction must be >= 1"));
        }
        Ok(())
    }
}

fn default_synth_nodes() -> usize { 14 }
fn default_synth_degree() -> usize { 4 }
fn default_max_steps() -> usize { 20 }
fn default_search_nodes() -> usize { 7 }
fn default_out_degree() -> usize { 3 }
fn default_palette_size() -> usize { 4 }
fn default_max_graphs() -> usize { 100 }
fn default_seed() -> u64 { 42 }
fn default_target() -> SearchTarget { SearchTarget::Majority }
fn default_quota() -> f64 { 0.5 }
fn default_k_fraction() -> usize { 2 }
