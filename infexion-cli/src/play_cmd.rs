//! Play command - a single game between two agents
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_game(), report_game()
//! - Level 3: replay_with_boards()

use anyhow::{Context, Result};
use clap::Args;

use infexion_core::{new_board, Action, MAX_TURNS};
use infexion_tournament::{GameOutcome, GameRunner};

use crate::agent_args::{AgentKind, EngineArgs};
use crate::render::render_board;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Agent playing red (moves first)
    #[arg(long, value_enum, default_value = "minimax")]
    pub red: AgentKind,

    /// Agent playing blue
    #[arg(long, value_enum, default_value = "random")]
    pub blue: AgentKind,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Stop after this many turns
    #[arg(long, default_value_t = MAX_TURNS)]
    pub max_turns: usize,

    /// Print the board after every action
    #[arg(long)]
    pub show: bool,

    /// Output the game record as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let outcome = play_game(&args, seed.unwrap_or(42))?;
    report_game(&outcome, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_game(args: &PlayArgs, seed: u64) -> Result<GameOutcome> {
    let red = args.engine.agent(args.red)?;
    let blue = args.engine.agent(args.blue)?;

    tracing::info!(%red, %blue, seed, max_turns = args.max_turns, "starting game");

    GameRunner::new(&red, &blue, seed)
        .with_max_turns(args.max_turns)
        .play_game()
        .context("game aborted")
}

fn report_game(outcome: &GameOutcome, args: &PlayArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    if args.show {
        for frame in replay_with_boards(&outcome.actions)? {
            println!("{}\n", frame);
        }
    }

    let result = match outcome.winner {
        Some(color) => format!("{} wins", color),
        None if outcome.finished => "draw".to_string(),
        None => "no result (turn cap)".to_string(),
    };
    println!(
        "{} after {} turns (RED {} / BLUE {})",
        result, outcome.turns, outcome.red_power, outcome.blue_power
    );
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Replay `actions` from the empty board, rendering after each one
fn replay_with_boards(actions: &[Action]) -> Result<Vec<String>> {
    let mut board = new_board();
    let mut frames = Vec::with_capacity(actions.len());

    for (i, &action) in actions.iter().enumerate() {
        let mover = board.turn_color();
        board
            .apply_action(action)
            .with_context(|| format!("replay failed at action {}", i + 1))?;
        frames.push(format!("{}: {} {}\n{}", i + 1, mover, action, render_board(&board)));
    }

    Ok(frames)
}
