//! MCTS search loop
//!
//! Implements the core MCTS algorithm:
//! 1. Selection - Use UCB1 to traverse tree
//! 2. Expansion - Add child node
//! 3. Simulation - Rollout to terminal state
//! 4. Backpropagation - Update statistics
//!
//! ## Architecture
//! - Level 2: Search loop coordination
//! - Level 3: Individual MCTS phases
//! - Level 4: Utilities

use infexion_core::{Action, Board};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::rollout::{configured_rollout, rollout_batch};
use crate::tree::{MctsTree, NodeId, Playout};
use crate::MctsConfig;

// ============================================================================
// SEARCH RESULT
// ============================================================================

/// Result of MCTS search
#[derive(Debug)]
pub struct SearchResult {
    /// The final tree after search
    pub tree: MctsTree,
    pub total_simulations: u32,
    /// Statistics for each expanded root action
    pub move_stats: Vec<MoveStatistics>,
}

/// Statistics for a single action at the root
#[derive(Clone, Debug)]
pub struct MoveStatistics {
    pub action: Action,
    pub visits: u32,
    pub win_rate: f32,
    pub ucb1: f32,
}

impl SearchResult {
    /// Most visited action
    pub fn best_action(&self) -> Option<Action> {
        self.tree.best_action()
    }

    pub fn highest_winrate_action(&self) -> Option<Action> {
        self.move_stats
            .iter()
            .max_by(|a, b| a.win_rate.total_cmp(&b.win_rate))
            .map(|s| s.action)
    }

    /// Root actions sorted by visits, most visited first
    pub fn actions_by_visits(&self) -> Vec<(Action, u32)> {
        let mut actions: Vec<_> = self.move_stats.iter().map(|s| (s.action, s.visits)).collect();
        actions.sort_by(|a, b| b.1.cmp(&a.1));
        actions
    }
}

// ============================================================================
// SEARCH LOOP (Level 2 - Main Coordination)
// ============================================================================

/// Run `config.simulations` iterations on `tree`
pub fn run_search(mut tree: MctsTree, config: &MctsConfig, seed: u64) -> SearchResult {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    if config.batch_size > 1 {
        run_batched_search(&mut tree, config, &mut rng);
    } else {
        run_sequential_search(&mut tree, config, &mut rng);
    }

    let total_simulations = tree.total_simulations();
    let move_stats = collect_move_statistics(&tree, config.exploration);

    SearchResult {
        tree,
        total_simulations,
        move_stats,
    }
}

// ============================================================================
// SEQUENTIAL SEARCH (Level 3)
// ============================================================================

fn run_sequential_search(tree: &mut MctsTree, config: &MctsConfig, rng: &mut ChaCha8Rng) {
    for _ in 0..config.simulations {
        let leaf = select_and_expand(tree, config.exploration);
        let playout = simulate_node(tree, leaf, config, rng);
        tree.backpropagate(leaf, playout);
    }
}

/// Selection plus expansion; returns the node to simulate from
fn select_and_expand(tree: &mut MctsTree, exploration: f32) -> NodeId {
    let leaf = tree.select_leaf(exploration);
    let node = tree.get(leaf);

    if !node.is_terminal() && !node.is_fully_expanded() {
        tree.expand(leaf).unwrap_or(leaf)
    } else {
        leaf
    }
}

/// Known outcome for terminal nodes, a rollout otherwise
fn simulate_node(
    tree: &MctsTree,
    node_id: NodeId,
    config: &MctsConfig,
    rng: &mut ChaCha8Rng,
) -> Playout {
    let node = tree.get(node_id);
    match node.terminal {
        Some(playout) => playout,
        None => configured_rollout(&node.board, config, rng).playout,
    }
}

// ============================================================================
// BATCHED SEARCH (Level 3)
// ============================================================================

fn run_batched_search(tree: &mut MctsTree, config: &MctsConfig, rng: &mut ChaCha8Rng) {
    let mut simulations_done = 0;

    while simulations_done < config.simulations {
        let batch_size = config.batch_size.min(config.simulations - simulations_done);
        run_batch_iteration(tree, config, rng, batch_size);
        simulations_done += batch_size;
    }
}

/// Select `batch_size` leaves under virtual loss, roll them out together,
/// then backpropagate
fn run_batch_iteration(
    tree: &mut MctsTree,
    config: &MctsConfig,
    rng: &mut ChaCha8Rng,
    batch_size: usize,
) {
    let mut leaves = Vec::with_capacity(batch_size);
    for _ in 0..batch_size {
        let leaf = select_and_expand(tree, config.exploration);
        tree.add_virtual_loss(leaf);
        leaves.push(leaf);
    }

    let mut pending = Vec::new();
    let mut boards: Vec<Board> = Vec::new();
    for &leaf in &leaves {
        tree.remove_virtual_loss(leaf);
        let terminal = tree.get(leaf).terminal;
        match terminal {
            Some(playout) => tree.backpropagate(leaf, playout),
            None => {
                pending.push(leaf);
                boards.push(tree.get(leaf).board.clone());
            }
        }
    }

    let results = rollout_batch(&boards, config, rng.gen());
    for (leaf, result) in pending.into_iter().zip(results) {
        tree.backpropagate(leaf, result.playout);
    }
}

// ============================================================================
// STATISTICS COLLECTION (Level 4)
// ============================================================================

fn collect_move_statistics(tree: &MctsTree, exploration: f32) -> Vec<MoveStatistics> {
    let root = tree.get(tree.root());
    let parent_visits = root.stats.adjusted_visits();

    root.children
        .iter()
        .map(|&(action, child_id)| {
            let stats = &tree.get(child_id).stats;
            MoveStatistics {
                action,
                visits: stats.visits,
                win_rate: stats.win_rate(),
                ucb1: tree.ucb1(child_id, parent_visits, exploration),
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use infexion_core::{HexDir, HexPos, BOARD_CELLS};

    fn spawn(r: i8, q: i8) -> Action {
        Action::Spawn { cell: HexPos::new(r, q) }
    }

    fn stats(action: Action, visits: u32, win_rate: f32) -> MoveStatistics {
        MoveStatistics {
            action,
            visits,
            win_rate,
            ucb1: 1.0,
        }
    }

    #[test]
    fn test_run_search_basic() {
        let tree = MctsTree::new(Board::new(), None);
        let config = MctsConfig::with_simulations(50).with_rollout_depth(8);

        let result = run_search(tree, &config, 42);

        assert_eq!(result.total_simulations, 50);
        // Every root action is expanded before any is revisited
        assert_eq!(result.move_stats.len(), BOARD_CELLS);
        let visits: u32 = result.move_stats.iter().map(|s| s.visits).sum();
        assert_eq!(visits, 50);
        assert!(result.best_action().unwrap().is_spawn());
    }

    #[test]
    fn test_search_finds_winning_capture() {
        let mut board = Board::new();
        board.apply_action(spawn(0, 0)).unwrap();
        board.apply_action(spawn(1, 0)).unwrap();

        let tree = MctsTree::new(board, None);
        let config = MctsConfig::with_simulations(1000).with_rollout_depth(10);
        let result = run_search(tree, &config, 7);

        let winning = Action::Spread {
            cell: HexPos::new(0, 0),
            direction: HexDir::UpRight,
        };
        assert_eq!(result.best_action(), Some(winning));
        assert_eq!(result.actions_by_visits()[0].0, winning);
    }

    #[test]
    fn test_batched_search_counts_simulations() {
        let tree = MctsTree::new(Board::new(), Some(6));
        let config = MctsConfig::with_simulations(64)
            .with_rollout_depth(8)
            .with_batch_size(8);

        let result = run_search(tree, &config, 3);

        assert_eq!(result.total_simulations, 64);
        assert_eq!(result.tree.get(NodeId::ROOT).stats.virtual_losses, 0);
        assert_eq!(result.move_stats.len(), 6);
    }

    #[test]
    fn test_search_on_terminal_root() {
        let mut board = Board::new();
        board.apply_action(spawn(0, 0)).unwrap();
        board.apply_action(spawn(1, 0)).unwrap();
        board
            .apply_action(Action::Spread {
                cell: HexPos::new(0, 0),
                direction: HexDir::UpRight,
            })
            .unwrap();

        let tree = MctsTree::new(board, None);
        let result = run_search(tree, &MctsConfig::with_simulations(5), 1);

        assert_eq!(result.total_simulations, 5);
        assert!(result.best_action().is_none());
        assert!(result.move_stats.is_empty());
    }

    #[test]
    fn test_highest_winrate_action() {
        let result = SearchResult {
            tree: MctsTree::new(Board::new(), None),
            total_simulations: 150,
            move_stats: vec![stats(spawn(0, 0), 100, 0.4), stats(spawn(0, 1), 50, 0.6)],
        };

        assert_eq!(result.highest_winrate_action(), Some(spawn(0, 1)));
    }

    #[test]
    fn test_actions_by_visits() {
        let result = SearchResult {
            tree: MctsTree::new(Board::new(), None),
            total_simulations: 150,
            move_stats: vec![stats(spawn(0, 0), 50, 0.4), stats(spawn(0, 1), 100, 0.6)],
        };

        let sorted = result.actions_by_visits();
        assert_eq!(sorted, vec![(spawn(0, 1), 100), (spawn(0, 0), 50)]);
    }

    #[test]
    fn test_collect_move_statistics_empty() {
        let tree = MctsTree::new(Board::new(), None);
        assert!(collect_move_statistics(&tree, 1.65).is_empty());
    }
}
