//! Infexion Core - Game engine and AI
//!
//! This crate provides the core game logic for Infexion:
//! - Board geometry (7x7 wrapping hex grid)
//! - Board state machine with in-place apply/undo
//! - Legal action generation
//! - Position evaluation
//! - Alpha-beta minimax with a transposition table

pub mod hex;
pub mod board;
pub mod error;
pub mod movegen;
pub mod eval;
pub mod transposition;
pub mod config;
pub mod ai;

// Re-exports for convenient access
pub use hex::{HexDir, HexPos, HexVec, BOARD_CELLS, BOARD_N, DIRECTIONS};
pub use board::{
    Action, Board, BoardMutation, CellMutation, CellState, Color, Fingerprint, MAX_CELL_POWER,
    MAX_TOTAL_POWER, MAX_TURNS, WIN_POWER_DIFF,
};
pub use error::GameError;
pub use movegen::legal_actions;
pub use eval::{evaluate, evaluate_with, Heuristics, WIN_VALUE};
pub use transposition::{Bound, Probe, TableStats, TranspositionEntry, TranspositionTable};
pub use config::{DrawPolicy, SearchConfig};
pub use ai::{choose_action, MinimaxAI, SearchResult, SearchStats};

/// Empty board with red to move
pub fn new_board() -> Board {
    Board::new()
}
