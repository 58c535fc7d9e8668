//! Search configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::eval::Heuristics;

/// How a drawn terminal position scores for the searching side
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPolicy {
    /// A draw is as bad as a loss
    #[default]
    Loss,
    /// A draw scores zero
    Neutral,
}

/// Minimax search configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search depth in plies
    pub depth: u32,
    /// Keep only the first N spawn actions per node (None = all)
    pub spawn_cap: Option<usize>,
    /// Evaluation weights for depth-limited leaves
    pub heuristics: Heuristics,
    /// Score of drawn terminal positions
    pub draw_policy: DrawPolicy,
    /// Consult and fill the transposition table
    pub use_transposition: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            spawn_cap: None,
            heuristics: Heuristics::default(),
            draw_policy: DrawPolicy::Loss,
            use_transposition: true,
        }
    }
}

impl SearchConfig {
    /// Default config searching `depth` plies
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    pub fn with_spawn_cap(mut self, cap: usize) -> Self {
        self.spawn_cap = Some(cap);
        self
    }

    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    pub fn with_draw_policy(mut self, draw_policy: DrawPolicy) -> Self {
        self.draw_policy = draw_policy;
        self
    }

    pub fn without_transposition(mut self) -> Self {
        self.use_transposition = false;
        self
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid search config")
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&content)
    }
}
