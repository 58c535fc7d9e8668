//! Legal action generation

use crate::board::{Action, Board, Color, MAX_TOTAL_POWER};
use crate::hex::{HexPos, DIRECTIONS};

/// Enumerate legal actions for `color`.
///
/// Spreads come first (row-major over owned cells, six directions each), then
/// spawns (row-major over empty cells) while the board is below the power
/// cap. `spawn_cap` keeps only the first N spawns to bound branching.
/// Legality assumes `color` is the side to move.
pub fn legal_actions(board: &Board, color: Color, spawn_cap: Option<usize>) -> Vec<Action> {
    let mut actions = Vec::new();
    spread_actions(board, color, &mut actions);
    spawn_actions(board, spawn_cap, &mut actions);
    actions
}

fn spread_actions(board: &Board, color: Color, actions: &mut Vec<Action>) {
    for (cell, state) in board.occupied() {
        if !state.is_owned_by(color) {
            continue;
        }
        for direction in DIRECTIONS {
            actions.push(Action::Spread { cell, direction });
        }
    }
}

fn spawn_actions(board: &Board, spawn_cap: Option<usize>, actions: &mut Vec<Action>) {
    if board.total_power() >= MAX_TOTAL_POWER {
        return;
    }

    let cap = spawn_cap.unwrap_or(usize::MAX);
    actions.extend(
        HexPos::all()
            .filter(|&cell| board.cell(cell).is_empty())
            .take(cap)
            .map(|cell| Action::Spawn { cell }),
    );
}
