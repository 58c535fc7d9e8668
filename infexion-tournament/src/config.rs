//! Configuration types for match play
//!
//! Level 4 - Utilities and configuration

use std::fmt;
use std::path::Path;

use anyhow::Context;
use infexion_core::{DrawPolicy, Heuristics, SearchConfig, MAX_TURNS};
use infexion_mcts::MctsConfig;
use serde::{Deserialize, Serialize};

/// Agent type for games
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerType {
    /// Alpha-beta minimax with transposition table
    #[default]
    Minimax,
    /// Monte Carlo Tree Search
    Mcts,
    /// Uniformly random legal actions (baseline)
    Random,
}

/// Configuration for one agent
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub player_type: PlayerType,
    /// Used by minimax agents
    pub search: SearchConfig,
    /// Used by MCTS agents
    pub mcts: MctsConfig,
    /// Fixed seed (None = derive from the game seed)
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            player_type: PlayerType::Minimax,
            search: SearchConfig::default(),
            mcts: MctsConfig::default(),
            seed: None,
        }
    }
}

impl AgentConfig {
    /// Minimax at the given depth
    pub fn minimax(depth: u32) -> Self {
        Self {
            player_type: PlayerType::Minimax,
            search: SearchConfig::with_depth(depth),
            ..Default::default()
        }
    }

    /// MCTS with the given simulation count
    pub fn mcts(simulations: usize) -> Self {
        Self {
            player_type: PlayerType::Mcts,
            mcts: MctsConfig::with_simulations(simulations),
            ..Default::default()
        }
    }

    pub fn random() -> Self {
        Self {
            player_type: PlayerType::Random,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Limit spawn branching for every agent type
    pub fn with_spawn_cap(mut self, cap: usize) -> Self {
        self.search.spawn_cap = Some(cap);
        self.mcts.spawn_cap = Some(cap);
        self
    }

    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.search.heuristics = heuristics;
        self
    }

    pub fn with_draw_policy(mut self, draw_policy: DrawPolicy) -> Self {
        self.search.draw_policy = draw_policy;
        self
    }

    /// Spawn cap relevant to this agent type
    pub fn spawn_cap(&self) -> Option<usize> {
        match self.player_type {
            PlayerType::Minimax | PlayerType::Random => self.search.spawn_cap,
            PlayerType::Mcts => self.mcts.spawn_cap,
        }
    }
}

impl fmt::Display for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.player_type {
            PlayerType::Minimax => write!(f, "minimax(d{})", self.search.depth),
            PlayerType::Mcts => write!(f, "mcts({})", self.mcts.simulations),
            PlayerType::Random => write!(f, "random"),
        }
    }
}

/// Configuration for a match between two agents
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub first: AgentConfig,
    pub second: AgentConfig,
    /// Games to play; colors alternate, first agent is red in even games
    pub games: usize,
    /// Turn cap per game; a capped game without a winner is a draw
    pub max_turns: usize,
    /// Play games on the rayon pool
    pub parallel: bool,
    /// Base seed, game i uses seed + i
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            first: AgentConfig::minimax(3),
            second: AgentConfig::random(),
            games: 10,
            max_turns: MAX_TURNS,
            parallel: true,
            seed: 42,
        }
    }
}

impl MatchConfig {
    pub fn new(first: AgentConfig, second: AgentConfig, games: usize) -> Self {
        Self {
            first,
            second,
            games,
            ..Default::default()
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid match config")
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read match config {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("in {}", path.display()))
    }
}
