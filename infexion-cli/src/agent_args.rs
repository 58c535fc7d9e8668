//! Shared agent options for the play and match commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use infexion_core::{DrawPolicy, SearchConfig};
use infexion_mcts::RolloutKind;
use infexion_tournament::AgentConfig;

/// Agent selectable on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AgentKind {
    Minimax,
    Mcts,
    Random,
}

/// Engine tuning applied to every agent built from the command line
#[derive(Args, Clone, Debug, Default)]
pub struct EngineArgs {
    /// Minimax search depth (overrides --search-config)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Minimax search config JSON file
    #[arg(long, value_name = "FILE")]
    pub search_config: Option<PathBuf>,

    /// MCTS simulations per action
    #[arg(long, default_value = "500")]
    pub simulations: usize,

    /// Use greedy instead of uniform MCTS rollouts
    #[arg(long)]
    pub greedy_rollouts: bool,

    /// Keep only the first N spawn actions per position
    #[arg(long)]
    pub spawn_cap: Option<usize>,

    /// Score drawn terminal positions as 0 instead of a loss
    #[arg(long)]
    pub neutral_draws: bool,
}

impl EngineArgs {
    /// Build the agent config for `kind`
    pub fn agent(&self, kind: AgentKind) -> Result<AgentConfig> {
        let mut agent = match kind {
            AgentKind::Minimax => AgentConfig::minimax(SearchConfig::default().depth),
            AgentKind::Mcts => AgentConfig::mcts(self.simulations),
            AgentKind::Random => AgentConfig::random(),
        };

        if let Some(path) = &self.search_config {
            agent.search = SearchConfig::load(path)
                .with_context(|| format!("Failed to load search config: {}", path.display()))?;
        }
        if let Some(depth) = self.depth {
            agent.search.depth = depth;
        }
        if let Some(cap) = self.spawn_cap {
            agent = agent.with_spawn_cap(cap);
        }
        if self.neutral_draws {
            agent = agent.with_draw_policy(DrawPolicy::Neutral);
        }
        if self.greedy_rollouts {
            agent.mcts.rollout = RolloutKind::Greedy;
        }

        Ok(agent)
    }
}
