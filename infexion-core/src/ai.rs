//! Minimax search with alpha-beta pruning and a transposition table
//!
//! The search mutates a single borrowed board in place: every child is
//! reached by `apply_action` and left by `undo_action`, so on entry and exit
//! of each frame the board holds exactly the path from the root.

use tracing::{debug, warn};

use crate::board::{Action, Board, Color};
use crate::config::{DrawPolicy, SearchConfig};
use crate::error::GameError;
use crate::eval::{evaluate_with, WIN_VALUE};
use crate::movegen::legal_actions;
use crate::transposition::TranspositionTable;

// ============================================================================
// RESULTS
// ============================================================================

/// Best action and its minimax value from the root player's perspective
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// None when the node had no legal action or was a leaf
    pub action: Option<Action>,
    pub value: i32,
}

impl SearchResult {
    fn leaf(value: i32) -> Self {
        Self {
            action: None,
            value,
        }
    }
}

/// Counters for the most recent search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub leaf_evals: u64,
    pub tt_cutoffs: u64,
    pub beta_cutoffs: u64,
    pub no_legal_nodes: u64,
}

// ============================================================================
// MINIMAX AI
// ============================================================================

/// Alpha-beta minimax player
///
/// The transposition table persists across calls so later searches reuse
/// earlier work. Stored values are relative to the root color, so the table
/// is dropped whenever the searching color changes.
#[derive(Debug)]
pub struct MinimaxAI {
    config: SearchConfig,
    table: TranspositionTable,
    table_color: Option<Color>,
    stats: SearchStats,
}

impl MinimaxAI {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            table: TranspositionTable::new(),
            table_color: None,
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    /// Counters from the last call to `search`
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Drop every memoized position
    pub fn clear_table(&mut self) {
        self.table.clear();
        self.table_color = None;
    }

    /// Search the position for the side to move.
    ///
    /// The board is restored before returning. A depth of zero is searched
    /// as one ply so there is always a candidate action.
    pub fn search(&mut self, board: &mut Board) -> SearchResult {
        let root = board.turn_color();
        if self.table_color != Some(root) {
            self.table.clear();
            self.table_color = Some(root);
        }

        self.stats = SearchStats::default();
        let depth = self.config.depth.max(1);
        let result = self.minimax(board, root, depth, true, -WIN_VALUE, WIN_VALUE);

        debug!(
            color = %root,
            depth,
            value = result.value,
            nodes = self.stats.nodes,
            leaf_evals = self.stats.leaf_evals,
            tt_cutoffs = self.stats.tt_cutoffs,
            beta_cutoffs = self.stats.beta_cutoffs,
            table_size = self.table.len(),
            "search complete"
        );
        result
    }

    /// Pick an action for the side to move
    pub fn choose_action(&mut self, board: &mut Board) -> Result<Action, GameError> {
        if board.is_terminal() {
            return Err(GameError::GameOver);
        }
        self.search(board)
            .action
            .ok_or(GameError::NoLegalAction(board.turn_color()))
    }

    fn terminal_value(&self, board: &Board, root: Color) -> i32 {
        match board.winner() {
            Some(color) if color == root => WIN_VALUE,
            Some(_) => -WIN_VALUE,
            None => match self.config.draw_policy {
                DrawPolicy::Loss => -WIN_VALUE,
                DrawPolicy::Neutral => 0,
            },
        }
    }

    fn minimax(
        &mut self,
        board: &mut Board,
        root: Color,
        depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> SearchResult {
        self.stats.nodes += 1;

        if depth == 0 {
            self.stats.leaf_evals += 1;
            return SearchResult::leaf(evaluate_with(board, root, &self.config.heuristics));
        }
        if board.is_terminal() {
            return SearchResult::leaf(self.terminal_value(board, root));
        }

        let mover = board.turn_color();
        debug_assert_eq!(mover == root, maximizing, "side to move out of step with search");

        let fingerprint = self.config.use_transposition.then(|| board.fingerprint());
        let mut hint = None;
        if let Some(fingerprint) = &fingerprint {
            let probe = self.table.find(fingerprint, depth, alpha, beta);
            if probe.usable {
                self.stats.tt_cutoffs += 1;
                return SearchResult {
                    action: probe.suggested_action,
                    value: probe.score,
                };
            }
            hint = probe.suggested_action;
        }

        let mut actions = legal_actions(board, mover, self.config.spawn_cap);
        if actions.is_empty() {
            self.stats.no_legal_nodes += 1;
            warn!(color = %mover, depth, "no legal action, scoring statically");
            return SearchResult::leaf(evaluate_with(board, root, &self.config.heuristics));
        }

        // Try the remembered best action first
        if let Some(pos) = hint.and_then(|h| actions.iter().position(|&a| a == h)) {
            actions[..=pos].rotate_right(1);
        }

        let (alpha_orig, beta_orig) = (alpha, beta);
        let mut best = SearchResult {
            action: None,
            value: if maximizing { -WIN_VALUE } else { WIN_VALUE },
        };

        for action in actions {
            board
                .apply_action(action)
                .unwrap_or_else(|err| panic!("search produced an illegal action: {}", err));
            let value = self
                .minimax(board, root, depth - 1, !maximizing, alpha, beta)
                .value;
            board
                .undo_action()
                .unwrap_or_else(|err| panic!("search lost track of its history: {}", err));

            let improves = if maximizing {
                value > best.value
            } else {
                value < best.value
            };
            if best.action.is_none() || improves {
                best = SearchResult {
                    action: Some(action),
                    value,
                };
            }

            if maximizing {
                alpha = alpha.max(value);
            } else {
                beta = beta.min(value);
            }
            if beta <= alpha {
                self.stats.beta_cutoffs += 1;
                break;
            }
        }

        if let Some(fingerprint) = fingerprint {
            self.table
                .store(fingerprint, best.value, best.action, depth, alpha_orig, beta_orig);
        }
        best
    }
}

/// Choose an action for the side to move with a fresh default engine
pub fn choose_action(board: &mut Board, depth: u32) -> Result<Action, GameError> {
    MinimaxAI::new(SearchConfig::with_depth(depth)).choose_action(board)
}

// ============================================================================
// TESTS
// ============================================================================
