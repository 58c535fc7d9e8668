//! Match command - play multiple games between two agents
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_match_config(), print_json_results(), print_text_results()
//! - Level 3: percent()

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use infexion_tournament::{play_match, MatchConfig, MatchResult};

use crate::agent_args::{AgentKind, EngineArgs};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Match config JSON file; flags below override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// First agent (red in even games)
    #[arg(long, value_enum)]
    pub first: Option<AgentKind>,

    /// Second agent
    #[arg(long, value_enum)]
    pub second: Option<AgentKind>,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Number of games
    #[arg(short = 'n', long)]
    pub games: Option<usize>,

    /// Turn cap per game
    #[arg(long)]
    pub max_turns: Option<usize>,

    /// Play games one at a time instead of on the thread pool
    #[arg(long)]
    pub sequential: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let config = build_match_config(&args, seed)?;

    tracing::info!(
        first = %config.first,
        second = %config.second,
        games = config.games,
        parallel = config.parallel,
        "starting match"
    );

    let result = play_match(&config).context("match aborted")?;

    if args.json {
        print_json_results(&result)
    } else {
        print_text_results(&config, &result);
        Ok(())
    }
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_match_config(args: &MatchArgs, seed: Option<u64>) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)
            .with_context(|| format!("Failed to load match config: {}", path.display()))?,
        None => MatchConfig::default(),
    };

    if let Some(kind) = args.first {
        config.first = args.engine.agent(kind)?;
    }
    if let Some(kind) = args.second {
        config.second = args.engine.agent(kind)?;
    }
    if let Some(games) = args.games {
        config.games = games;
    }
    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }
    if args.sequential {
        config = config.sequential();
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    Ok(config)
}

fn print_json_results(result: &MatchResult) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        #[serde(flatten)]
        result: &'a MatchResult,
        first_win_rate: f32,
        second_win_rate: f32,
        draw_rate: f32,
    }

    let output = JsonOutput {
        result,
        first_win_rate: result.first_win_rate(),
        second_win_rate: result.second_win_rate(),
        draw_rate: result.draw_rate(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_results(config: &MatchConfig, result: &MatchResult) {
    println!("\n=== Match Results ===");
    println!("{} vs {}", config.first, config.second);
    println!("Total games: {}", result.games_played);
    println!(
        "First wins:  {} ({:.1}%)",
        result.first_wins,
        percent(result.first_win_rate())
    );
    println!(
        "Second wins: {} ({:.1}%)",
        result.second_wins,
        percent(result.second_win_rate())
    );
    println!(
        "Draws:       {} ({:.1}%)",
        result.draws,
        percent(result.draw_rate())
    );
    println!("Avg turns:   {:.1}", result.avg_turns);
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn percent(rate: f32) -> f32 {
    rate * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use infexion_tournament::PlayerType;
    use std::io::Write;

    fn args() -> MatchArgs {
        MatchArgs {
            config: None,
            first: None,
            second: None,
            engine: EngineArgs {
                simulations: 500,
                ..Default::default()
            },
            games: None,
            max_turns: None,
            sequential: false,
            json: false,
        }
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = build_match_config(&args(), None).unwrap();
        assert_eq!(config, MatchConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let mut args = args();
        args.first = Some(AgentKind::Mcts);
        args.second = Some(AgentKind::Minimax);
        args.engine.depth = Some(2);
        args.games = Some(6);
        args.max_turns = Some(50);
        args.sequential = true;

        let config = build_match_config(&args, Some(9)).unwrap();
        assert_eq!(config.first.player_type, PlayerType::Mcts);
        assert_eq!(config.second.player_type, PlayerType::Minimax);
        assert_eq!(config.second.search.depth, 2);
        assert_eq!(config.games, 6);
        assert_eq!(config.max_turns, 50);
        assert!(!config.parallel);
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn test_flags_override_config_file() {
        let path = std::env::temp_dir().join(format!("infexion-match-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"first": {{"player_type": "random"}}, "games": 3, "seed": 5}}"#
        )
        .unwrap();

        let mut args = args();
        args.config = Some(path.clone());
        args.games = Some(8);

        let config = build_match_config(&args, None).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.first.player_type, PlayerType::Random);
        assert_eq!(config.games, 8);
        assert_eq!(config.seed, 5);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let mut args = args();
        args.config = Some(PathBuf::from("/nonexistent/match.json"));

        let err = build_match_config(&args, None).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load match config"));
    }
}
