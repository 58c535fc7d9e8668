//! MCTS vs Minimax Performance Benchmark
//!
//! Compares:
//! 1. Time to find an action at various depths/simulations
//! 2. Action quality via head-to-head games

use std::time::Instant;

use infexion_core::{Action, Board, CellState, Color, HexPos, MinimaxAI, SearchConfig};
use infexion_mcts::{MctsConfig, MctsPlayer};

// ============================================================================
// TEST POSITIONS
// ============================================================================

fn opening_position() -> Board {
    let mut board = Board::new();
    for (r, q) in [(3, 3), (0, 0)] {
        board
            .apply_action(Action::Spawn { cell: HexPos::new(r, q) })
            .expect("opening spawn");
    }
    board
}

fn midgame_position() -> Board {
    Board::from_cells([
        (HexPos::new(1, 1), CellState::owned(Color::Red, 3)),
        (HexPos::new(1, 4), CellState::owned(Color::Red, 2)),
        (HexPos::new(5, 2), CellState::owned(Color::Red, 1)),
        (HexPos::new(2, 2), CellState::owned(Color::Blue, 2)),
        (HexPos::new(4, 4), CellState::owned(Color::Blue, 4)),
        (HexPos::new(6, 0), CellState::owned(Color::Blue, 1)),
    ])
}

// ============================================================================
// BENCHMARK STRUCTURES
// ============================================================================

#[derive(Clone, Debug)]
struct BenchmarkResult {
    player: String,
    config: String,
    avg_action_time_ms: f64,
}

impl BenchmarkResult {
    fn to_table_row(&self) -> String {
        format!(
            "| {:<8} | {:<10} | {:>10.2}ms |",
            self.player, self.config, self.avg_action_time_ms
        )
    }
}

// ============================================================================
// BENCHMARK: Time to Find Action
// ============================================================================

fn benchmark_action_time(board: &Board, position_name: &str) -> Vec<BenchmarkResult> {
    println!("\n=== ACTION TIME BENCHMARK: {} ===", position_name);
    let mut results = Vec::new();
    let iterations = 3;

    for depth in [1, 2, 3] {
        let mut total_time = 0.0;
        for _ in 0..iterations {
            // Fresh engine each time so the table does not answer the root
            let mut ai = MinimaxAI::new(SearchConfig::with_depth(depth));
            let mut board = board.clone();
            let start = Instant::now();
            let _ = ai.choose_action(&mut board);
            total_time += start.elapsed().as_secs_f64() * 1000.0;
        }

        let avg = total_time / iterations as f64;
        println!("  Minimax depth {} ... {:.2}ms", depth, avg);
        results.push(BenchmarkResult {
            player: "Minimax".to_string(),
            config: format!("Depth {}", depth),
            avg_action_time_ms: avg,
        });
    }

    for sims in [100, 500, 1000] {
        let mut player = MctsPlayer::new(MctsConfig::with_simulations(sims).with_rollout_depth(40));
        let mut total_time = 0.0;
        for _ in 0..iterations {
            let start = Instant::now();
            let _ = player.choose_action(board);
            total_time += start.elapsed().as_secs_f64() * 1000.0;
        }

        let avg = total_time / iterations as f64;
        println!("  MCTS {} sims ... {:.2}ms", sims, avg);
        results.push(BenchmarkResult {
            player: "MCTS".to_string(),
            config: format!("{} sims", sims),
            avg_action_time_ms: avg,
        });
    }

    results
}

// ============================================================================
// BENCHMARK: Action Quality (Head-to-Head Games)
// ============================================================================

fn benchmark_action_quality(games: usize, max_turns: usize) {
    println!("\n=== ACTION QUALITY BENCHMARK: Minimax D2 vs MCTS 300 ===");

    for game in 0..games {
        let mut minimax = MinimaxAI::new(SearchConfig::with_depth(2).with_spawn_cap(8));
        let mut mcts = MctsPlayer::new(
            MctsConfig::with_simulations(300)
                .with_rollout_depth(40)
                .with_seed(game as u64),
        );
        // Alternate who plays red
        let minimax_color = if game % 2 == 0 { Color::Red } else { Color::Blue };

        let mut board = Board::new();
        while !board.is_terminal() && board.turn_count() < max_turns {
            let chosen = if board.turn_color() == minimax_color {
                minimax.choose_action(&mut board)
            } else {
                mcts.choose_action(&board)
            };
            let Ok(action) = chosen else { break };
            if board.apply_action(action).is_err() {
                break;
            }
        }

        let winner = match board.winner() {
            Some(color) if color == minimax_color => "Minimax",
            Some(_) => "MCTS",
            None => "Draw",
        };
        println!(
            "  Game {}: {} ({} turns, minimax as {})",
            game + 1,
            winner,
            board.turn_count(),
            minimax_color
        );
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    println!("\nINFEXION: MCTS vs Minimax Benchmark");

    let mut all_results = Vec::new();
    all_results.extend(benchmark_action_time(&opening_position(), "Opening"));
    all_results.extend(benchmark_action_time(&midgame_position(), "Mid-Game"));

    benchmark_action_quality(4, 120);

    println!("\n| Player   | Config     | Avg Action Time |");
    println!("|----------|------------|-----------------|");
    for result in &all_results {
        println!("{}", result.to_table_row());
    }
    println!();
}
