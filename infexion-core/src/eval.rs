//! Position evaluation

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color};

/// Score standing in for a won (or, negated, lost) game
pub const WIN_VALUE: i32 = i32::MAX;

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Weight for the power difference
    pub power_weight: i32,
    /// Weight for the occupied-cell difference
    pub cell_weight: i32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            power_weight: 1,
            cell_weight: 0,
        }
    }
}

impl Heuristics {
    /// Power difference plus occupied-cell difference
    pub fn with_cell_bonus() -> Self {
        Self {
            power_weight: 1,
            cell_weight: 1,
        }
    }
}

/// Power difference from `perspective`'s point of view
pub fn evaluate(board: &Board, perspective: Color) -> i32 {
    evaluate_with(board, perspective, &Heuristics::default())
}

/// Weighted power and cell-count difference from `perspective`'s point of view
pub fn evaluate_with(board: &Board, perspective: Color, heuristics: &Heuristics) -> i32 {
    let opponent = perspective.opponent();

    let power = board.color_power(perspective) as i32 - board.color_power(opponent) as i32;
    let cells = board.color_cells(perspective) as i32 - board.color_cells(opponent) as i32;

    heuristics.power_weight * power + heuristics.cell_weight * cells
}
