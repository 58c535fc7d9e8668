//! Integration tests for the Infexion engine
//!
//! Tests the full stack: board state machine, minimax, MCTS, match play and
//! the `infexion` binary

use std::process::Command;

use infexion_core::{legal_actions, new_board, Board, Color, MinimaxAI, SearchConfig};
use infexion_mcts::{MctsConfig, MctsPlayer};
use infexion_tournament::{play_match, AgentConfig, MatchConfig};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Play `plies` random legal actions from the empty board
fn random_position(seed: u64, plies: usize) -> Board {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut board = new_board();

    for _ in 0..plies {
        if board.is_terminal() {
            break;
        }
        let actions = legal_actions(&board, board.turn_color(), None);
        let Some(&action) = actions.choose(&mut rng) else { break };
        board.apply_action(action).unwrap();
    }
    board
}

fn run_cli(args: &[&str]) -> serde_json::Value {
    let output = Command::new(env!("CARGO_BIN_EXE_infexion"))
        .args(args)
        .output()
        .expect("failed to run infexion binary");

    assert!(
        output.status.success(),
        "infexion {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

// ============================================================================
// BOARD
// ============================================================================

#[test]
fn test_random_apply_undo_restores_every_position() {
    for seed in 0..5 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut board = new_board();
        let mut seen = vec![board.fingerprint()];

        for _ in 0..60 {
            if board.is_terminal() {
                break;
            }
            let actions = legal_actions(&board, board.turn_color(), None);
            let Some(&action) = actions.choose(&mut rng) else { break };
            board.apply_action(action).unwrap();
            seen.push(board.fingerprint());
            assert!(board.total_power() <= infexion_core::MAX_TOTAL_POWER);
        }

        while let Some(expected) = seen.pop() {
            assert_eq!(board.fingerprint(), expected);
            if seen.is_empty() {
                break;
            }
            board.undo_action().unwrap();
        }
        assert_eq!(board.turn_count(), 0);
        assert_eq!(board.turn_color(), Color::Red);
        assert!(board.undo_action().is_err());
    }
}

// ============================================================================
// MINIMAX
// ============================================================================

#[test]
fn test_transposition_table_preserves_search_result() {
    for seed in 0..4 {
        for depth in [2, 3] {
            let mut board = random_position(100 + seed, 6);
            if board.is_terminal() {
                continue;
            }

            let config = SearchConfig::with_depth(depth).with_spawn_cap(6);
            let with_table = MinimaxAI::new(config.clone()).search(&mut board);
            let without_table = MinimaxAI::new(config.without_transposition()).search(&mut board);

            assert_eq!(with_table.value, without_table.value, "seed {} depth {}", seed, depth);
            assert_eq!(with_table.action, without_table.action, "seed {} depth {}", seed, depth);
        }
    }
}

#[test]
fn test_minimax_leaves_board_untouched() {
    let mut board = random_position(7, 8);
    let before = board.fingerprint();
    let turns = board.turn_count();

    let mut ai = MinimaxAI::new(SearchConfig::with_depth(3).with_spawn_cap(4));
    let action = ai.choose_action(&mut board).unwrap();

    assert!(board.validate_action(&action));
    assert_eq!(board.fingerprint(), before);
    assert_eq!(board.turn_count(), turns);
}

// ============================================================================
// MCTS
// ============================================================================

#[test]
fn test_mcts_chooses_legal_action() {
    let board = random_position(21, 5);
    let mut player = MctsPlayer::new(
        MctsConfig::with_simulations(100)
            .with_spawn_cap(5)
            .with_rollout_depth(40),
    );

    let result = player.search(&board);
    assert_eq!(result.total_simulations, 100);

    let action = player.choose_action(&board).unwrap();
    assert!(board.validate_action(&action));
}

// ============================================================================
// MATCH PLAY
// ============================================================================

#[test]
fn test_match_outcomes_replay_to_same_result() {
    let config = MatchConfig::new(
        AgentConfig::minimax(1).with_spawn_cap(5),
        AgentConfig::random(),
        4,
    )
    .with_max_turns(30)
    .with_seed(3);

    let result = play_match(&config).unwrap();
    assert_eq!(result.games_played, 4);

    for outcome in &result.game_outcomes {
        let mut board = new_board();
        for &action in &outcome.actions {
            board.apply_action(action).unwrap();
        }
        assert_eq!(board.turn_count(), outcome.turns);
        assert_eq!(board.color_power(Color::Red), outcome.red_power);
        assert_eq!(board.color_power(Color::Blue), outcome.blue_power);
        assert_eq!(board.winner(), outcome.winner);
    }
}

// ============================================================================
// BINARY
// ============================================================================

#[test]
fn test_cli_play_json() {
    let json = run_cli(&[
        "play", "--red", "random", "--blue", "random", "--max-turns", "10", "--seed", "3",
        "--json",
    ]);

    let turns = json["turns"].as_u64().unwrap();
    assert!(turns <= 10);
    assert_eq!(json["actions"].as_array().unwrap().len() as u64, turns);
}

#[test]
fn test_cli_match_json() {
    let json = run_cli(&[
        "match", "--first", "minimax", "--second", "random", "--depth", "1", "--spawn-cap", "4",
        "-n", "2", "--max-turns", "12", "--json",
    ]);

    assert_eq!(json["games_played"], 2);
    let wins = json["first_wins"].as_u64().unwrap()
        + json["second_wins"].as_u64().unwrap()
        + json["draws"].as_u64().unwrap();
    assert_eq!(wins, 2);
    assert_eq!(json["game_outcomes"].as_array().unwrap().len(), 2);
}
