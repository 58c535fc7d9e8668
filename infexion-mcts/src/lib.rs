//! Infexion MCTS - Monte Carlo Tree Search player
//!
//! This crate provides a secondary engine next to the minimax search:
//! - Tree policy (UCB1) over an arena of explicit board snapshots
//! - Random or greedy rollouts
//! - Backpropagation of win/draw/loss rewards
//! - Batched rollouts, run on rayon with the `parallel` feature

pub mod tree;
pub mod rollout;
pub mod search;

use infexion_core::{Action, Board, GameError, MAX_TURNS};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use rollout::{GreedyPolicy, RolloutPolicy, RolloutResult, UniformPolicy};
pub use search::{run_search, MoveStatistics, SearchResult};
pub use tree::{MctsNode, MctsTree, NodeId, NodeStats, Playout};

/// Which rollout policy simulations use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloutKind {
    #[default]
    Uniform,
    Greedy,
}

/// MCTS configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    pub simulations: usize,
    /// Rollouts selected per batch; 1 runs plain sequential MCTS
    pub batch_size: usize,
    pub exploration: f32,
    pub max_rollout_depth: usize,
    pub rollout: RolloutKind,
    /// Chance of a random action in greedy rollouts
    pub greedy_epsilon: f64,
    pub spawn_cap: Option<usize>,
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            simulations: 500,
            batch_size: 1,
            exploration: 1.65,
            max_rollout_depth: MAX_TURNS,
            rollout: RolloutKind::Uniform,
            greedy_epsilon: 0.1,
            spawn_cap: None,
            seed: 42,
        }
    }
}

impl MctsConfig {
    pub fn with_simulations(simulations: usize) -> Self {
        Self {
            simulations,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_rollout(mut self, rollout: RolloutKind) -> Self {
        self.rollout = rollout;
        self
    }

    pub fn with_rollout_depth(mut self, depth: usize) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_spawn_cap(mut self, cap: usize) -> Self {
        self.spawn_cap = Some(cap);
        self
    }
}

/// MCTS player
///
/// Every search starts from a fresh tree rooted at a clone of the given
/// board; the caller's board is never touched.
pub struct MctsPlayer {
    config: MctsConfig,
    rng: ChaCha8Rng,
}

impl MctsPlayer {
    pub fn new(config: MctsConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Run a full search from `board`
    pub fn search(&mut self, board: &Board) -> SearchResult {
        let tree = MctsTree::new(board.clone(), self.config.spawn_cap);
        let result = run_search(tree, &self.config, self.rng.gen());

        debug!(
            color = %board.turn_color(),
            simulations = result.total_simulations,
            nodes = result.tree.len(),
            "mcts search complete"
        );
        result
    }

    /// Pick the most visited root action
    pub fn choose_action(&mut self, board: &Board) -> Result<Action, GameError> {
        if board.is_terminal() {
            return Err(GameError::GameOver);
        }
        self.search(board)
            .best_action()
            .ok_or(GameError::NoLegalAction(board.turn_color()))
    }
}
