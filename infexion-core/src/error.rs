//! Error types for board and search operations

use crate::board::{Action, Color};

/// Errors surfaced by the board state machine and the move chooser
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("illegal action {action} for {color}")]
    IllegalAction { action: Action, color: Color },

    #[error("no actions to undo")]
    EmptyHistory,

    #[error("no legal action available for {0}")]
    NoLegalAction(Color),

    #[error("game is already over")]
    GameOver,
}
