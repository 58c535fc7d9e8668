//! Text rendering of boards for human inspection

use std::fmt::Write;

use infexion_core::{Board, Color, HexPos, BOARD_N};

/// Grid of cells, one row per `r`, shifted to suggest the hex layout
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();

    out.push_str("   ");
    for q in 0..BOARD_N {
        let _ = write!(out, "{:>3}", q);
    }
    out.push('\n');

    for r in 0..BOARD_N {
        let _ = write!(out, "{:>2} {}", r, " ".repeat(r as usize));
        for q in 0..BOARD_N {
            let cell = board.cell(HexPos::new(r, q));
            let text = match cell.owner() {
                Some(Color::Red) => format!("R{}", cell.power()),
                Some(Color::Blue) => format!("B{}", cell.power()),
                None => ".".to_string(),
            };
            let _ = write!(out, "{:>3}", text);
        }
        out.push('\n');
    }

    let _ = write!(
        out,
        "turn {}, {} to move, power RED {} / BLUE {}",
        board.turn_count(),
        board.turn_color(),
        board.color_power(Color::Red),
        board.color_power(Color::Blue)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use infexion_core::CellState;

    #[test]
    fn test_render_empty_board() {
        let text = render_board(&Board::new());
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), BOARD_N as usize + 2);
        assert_eq!(lines[0], "     0  1  2  3  4  5  6");
        assert_eq!(lines[1], " 0   .  .  .  .  .  .  .");
        assert_eq!(lines[8], "turn 0, RED to move, power RED 0 / BLUE 0");
    }

    #[test]
    fn test_render_shows_owners_and_power() {
        let board = Board::from_cells([
            (HexPos::new(0, 0), CellState::owned(Color::Red, 3)),
            (HexPos::new(2, 6), CellState::owned(Color::Blue, 6)),
        ]);
        let text = render_board(&board);
        let lines: Vec<_> = text.lines().collect();

        assert!(lines[1].starts_with(" 0  R3"));
        assert!(lines[3].ends_with("B6"));
        assert!(lines[8].ends_with("power RED 3 / BLUE 6"));
    }
}
