//! Rollout (simulation) strategies for MCTS
//!
//! ## Architecture
//! - Level 2: Batch rollout coordination
//! - Level 3: Single rollout implementation
//! - Level 4: Action selection policies

use infexion_core::{evaluate_with, legal_actions, Action, Board, Heuristics};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::tree::Playout;
use crate::{MctsConfig, RolloutKind};

// ============================================================================
// ROLLOUT RESULT
// ============================================================================

/// Result of a rollout simulation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RolloutResult {
    pub playout: Playout,
    pub actions_played: usize,
}

// ============================================================================
// POLICIES (Level 4)
// ============================================================================

/// Chooses the next action during a simulation
pub trait RolloutPolicy: Send + Sync {
    /// Pick one of `actions` (never empty) for the side to move on `board`.
    /// The board may be probed with apply/undo but must be left unchanged.
    fn select_action<R: Rng>(&self, board: &mut Board, actions: &[Action], rng: &mut R) -> Action;
}

/// Uniform random policy
pub struct UniformPolicy;

impl RolloutPolicy for UniformPolicy {
    fn select_action<R: Rng>(&self, _board: &mut Board, actions: &[Action], rng: &mut R) -> Action {
        select_random_action(actions, rng)
    }
}

/// One-ply greedy policy with epsilon exploration
///
/// Tries every candidate on the board, scores it for the mover and keeps the
/// first best one.
pub struct GreedyPolicy {
    pub epsilon: f64,
    pub heuristics: Heuristics,
}

impl Default for GreedyPolicy {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            heuristics: Heuristics::default(),
        }
    }
}

impl RolloutPolicy for GreedyPolicy {
    fn select_action<R: Rng>(&self, board: &mut Board, actions: &[Action], rng: &mut R) -> Action {
        if rng.gen_bool(self.epsilon.clamp(0.0, 1.0)) {
            return select_random_action(actions, rng);
        }

        let mover = board.turn_color();
        let mut best = actions[0];
        let mut best_score = i32::MIN;

        for &action in actions {
            board
                .apply_action(action)
                .unwrap_or_else(|err| panic!("rollout probed an illegal action: {}", err));
            let score = evaluate_with(board, mover, &self.heuristics);
            board
                .undo_action()
                .unwrap_or_else(|err| panic!("rollout lost track of its history: {}", err));

            if score > best_score {
                best = action;
                best_score = score;
            }
        }

        best
    }
}

fn select_random_action<R: Rng>(actions: &[Action], rng: &mut R) -> Action {
    actions[rng.gen_range(0..actions.len())]
}

// ============================================================================
// SINGLE ROLLOUT (Level 3)
// ============================================================================

/// Play `policy` from a copy of `board` until the game ends or `max_depth`
/// actions have been played
pub fn rollout<R: Rng, P: RolloutPolicy>(
    board: &Board,
    max_depth: usize,
    spawn_cap: Option<usize>,
    policy: &P,
    rng: &mut R,
) -> RolloutResult {
    let mut current = board.clone();
    let mut actions_played = 0;

    while !current.is_terminal() && actions_played < max_depth {
        let actions = legal_actions(&current, current.turn_color(), spawn_cap);
        if actions.is_empty() {
            break;
        }

        let action = policy.select_action(&mut current, &actions, rng);
        current
            .apply_action(action)
            .unwrap_or_else(|err| panic!("rollout produced an illegal action: {}", err));
        actions_played += 1;
    }

    RolloutResult {
        playout: Playout::of(&current),
        actions_played,
    }
}

/// Rollout with the policy selected in `config`
pub fn configured_rollout<R: Rng>(board: &Board, config: &MctsConfig, rng: &mut R) -> RolloutResult {
    match config.rollout {
        RolloutKind::Uniform => rollout(
            board,
            config.max_rollout_depth,
            config.spawn_cap,
            &UniformPolicy,
            rng,
        ),
        RolloutKind::Greedy => {
            let policy = GreedyPolicy {
                epsilon: config.greedy_epsilon,
                ..Default::default()
            };
            rollout(board, config.max_rollout_depth, config.spawn_cap, &policy, rng)
        }
    }
}

// ============================================================================
// BATCH ROLLOUT (Level 2)
// ============================================================================

/// Roll out every board in parallel, seeding board `i` with `seed + i`
#[cfg(feature = "parallel")]
pub fn rollout_batch(boards: &[Board], config: &MctsConfig, seed: u64) -> Vec<RolloutResult> {
    use rayon::prelude::*;

    boards
        .par_iter()
        .enumerate()
        .map(|(i, board)| seeded_rollout(board, config, seed, i))
        .collect()
}

/// Roll out every board in order, seeding board `i` with `seed + i`
#[cfg(not(feature = "parallel"))]
pub fn rollout_batch(boards: &[Board], config: &MctsConfig, seed: u64) -> Vec<RolloutResult> {
    boards
        .iter()
        .enumerate()
        .map(|(i, board)| seeded_rollout(board, config, seed, i))
        .collect()
}

fn seeded_rollout(board: &Board, config: &MctsConfig, seed: u64, index: usize) -> RolloutResult {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(index as u64));
    configured_rollout(board, config, &mut rng)
}

// ============================================================================
// TESTS
// ============================================================================
