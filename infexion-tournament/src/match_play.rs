//! Match play - multiple games between two agents
//!
//! Level 2 - Phase-level implementation

use infexion_core::{Color, GameError};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::{AgentConfig, MatchConfig};
use crate::game_runner::{GameOutcome, GameRunner};

/// Result of a match (multiple games)
#[derive(Clone, Debug, Serialize)]
pub struct MatchResult {
    /// Wins for the first agent, whichever color it played
    pub first_wins: u32,
    pub second_wins: u32,
    pub draws: u32,
    pub avg_turns: f32,
    pub games_played: u32,
    pub game_outcomes: Vec<GameOutcome>,
}

impl MatchResult {
    pub fn empty() -> Self {
        Self {
            first_wins: 0,
            second_wins: 0,
            draws: 0,
            avg_turns: 0.0,
            games_played: 0,
            game_outcomes: Vec::new(),
        }
    }

    /// Combine two results
    pub fn combine(&self, other: &MatchResult) -> MatchResult {
        let total_games = self.games_played + other.games_played;
        let avg_turns = if total_games > 0 {
            (self.avg_turns * self.games_played as f32 + other.avg_turns * other.games_played as f32)
                / total_games as f32
        } else {
            0.0
        };

        let mut game_outcomes = self.game_outcomes.clone();
        game_outcomes.extend(other.game_outcomes.iter().cloned());

        MatchResult {
            first_wins: self.first_wins + other.first_wins,
            second_wins: self.second_wins + other.second_wins,
            draws: self.draws + other.draws,
            avg_turns,
            games_played: total_games,
            game_outcomes,
        }
    }

    pub fn first_win_rate(&self) -> f32 {
        self.rate(self.first_wins)
    }

    pub fn second_win_rate(&self) -> f32 {
        self.rate(self.second_wins)
    }

    pub fn draw_rate(&self) -> f32 {
        self.rate(self.draws)
    }

    /// Wins = 1.0, Draws = 0.5, Losses = 0.0
    pub fn score_for_first(&self) -> f32 {
        self.first_wins as f32 + 0.5 * self.draws as f32
    }

    pub fn score_for_second(&self) -> f32 {
        self.second_wins as f32 + 0.5 * self.draws as f32
    }

    fn rate(&self, count: u32) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            count as f32 / self.games_played as f32
        }
    }
}

/// Play a match (Level 2 phase)
///
/// Colors alternate every game so neither agent keeps the first move.
pub fn play_match(config: &MatchConfig) -> Result<MatchResult, GameError> {
    if config.games == 0 {
        return Ok(MatchResult::empty());
    }

    let game_configs = prepare_game_configs(config.games);
    let outcomes = if config.parallel {
        game_configs
            .par_iter()
            .map(|gc| play_single_game(config, gc))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        game_configs
            .iter()
            .map(|gc| play_single_game(config, gc))
            .collect::<Result<Vec<_>, _>>()?
    };

    let result = aggregate_results(outcomes);
    info!(
        first = %config.first,
        second = %config.second,
        games = result.games_played,
        first_wins = result.first_wins,
        second_wins = result.second_wins,
        draws = result.draws,
        "match finished"
    );
    Ok(result)
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Configuration for a single game in a match
#[derive(Clone, Copy)]
struct GameConfig {
    /// Whether the first agent plays red this game
    first_is_red: bool,
    /// Game index (for seeding)
    game_index: usize,
}

fn prepare_game_configs(games: usize) -> Vec<GameConfig> {
    (0..games)
        .map(|i| GameConfig {
            first_is_red: i % 2 == 0,
            game_index: i,
        })
        .collect()
}

/// Outcome with context about which agent played which color
struct GameOutcomeWithContext {
    outcome: GameOutcome,
    first_is_red: bool,
}

fn play_single_game(
    config: &MatchConfig,
    gc: &GameConfig,
) -> Result<GameOutcomeWithContext, GameError> {
    let (red, blue): (&AgentConfig, &AgentConfig) = if gc.first_is_red {
        (&config.first, &config.second)
    } else {
        (&config.second, &config.first)
    };

    let seed = config.seed.wrapping_add(gc.game_index as u64);
    let outcome = GameRunner::new(red, blue, seed)
        .with_max_turns(config.max_turns)
        .play_game()?;

    Ok(GameOutcomeWithContext {
        outcome,
        first_is_red: gc.first_is_red,
    })
}

fn aggregate_results(outcomes: Vec<GameOutcomeWithContext>) -> MatchResult {
    let mut result = MatchResult::empty();
    let mut total_turns = 0usize;

    for owc in outcomes {
        total_turns += owc.outcome.turns;

        let first_color = if owc.first_is_red { Color::Red } else { Color::Blue };
        match owc.outcome.winner {
            Some(color) if color == first_color => result.first_wins += 1,
            Some(_) => result.second_wins += 1,
            None => result.draws += 1,
        }
        result.game_outcomes.push(owc.outcome);
    }

    result.games_played = result.game_outcomes.len() as u32;
    if result.games_played > 0 {
        result.avg_turns = total_turns as f32 / result.games_played as f32;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(winner: Option<Color>, turns: usize) -> GameOutcome {
        GameOutcome {
            winner,
            turns,
            red_power: 0,
            blue_power: 0,
            finished: winner.is_some(),
            actions: vec![],
        }
    }

    fn summary(first_wins: u32, second_wins: u32, draws: u32, avg_turns: f32) -> MatchResult {
        MatchResult {
            first_wins,
            second_wins,
            draws,
            avg_turns,
            games_played: first_wins + second_wins + draws,
            game_outcomes: vec![],
        }
    }

    #[test]
    fn test_match_result_empty() {
        let result = MatchResult::empty();
        assert_eq!(result.games_played, 0);
        assert_eq!(result.first_win_rate(), 0.0);
    }

    #[test]
    fn test_match_result_combine() {
        let combined = summary(2, 1, 1, 20.0).combine(&summary(1, 2, 1, 30.0));
        assert_eq!(combined.first_wins, 3);
        assert_eq!(combined.second_wins, 3);
        assert_eq!(combined.draws, 2);
        assert_eq!(combined.games_played, 8);
        assert!((combined.avg_turns - 25.0).abs() < 0.01);
    }

    #[test]
    fn test_match_result_rates_and_scores() {
        let result = summary(6, 3, 1, 25.0);
        assert!((result.first_win_rate() - 0.6).abs() < 1e-6);
        assert!((result.second_win_rate() - 0.3).abs() < 1e-6);
        assert!((result.draw_rate() - 0.1).abs() < 1e-6);
        assert_eq!(result.score_for_first(), 6.5);
        assert_eq!(result.score_for_second(), 3.5);
    }

    #[test]
    fn test_aggregate_attributes_colors() {
        let outcomes = vec![
            // First agent red, red wins
            GameOutcomeWithContext {
                outcome: outcome(Some(Color::Red), 10),
                first_is_red: true,
            },
            // First agent blue, red wins
            GameOutcomeWithContext {
                outcome: outcome(Some(Color::Red), 20),
                first_is_red: false,
            },
            // First agent blue, blue wins
            GameOutcomeWithContext {
                outcome: outcome(Some(Color::Blue), 30),
                first_is_red: false,
            },
            GameOutcomeWithContext {
                outcome: outcome(None, 40),
                first_is_red: true,
            },
        ];

        let result = aggregate_results(outcomes);
        assert_eq!(result.first_wins, 2);
        assert_eq!(result.second_wins, 1);
        assert_eq!(result.draws, 1);
        assert_eq!(result.avg_turns, 25.0);
    }

    #[test]
    fn test_prepare_game_configs() {
        let configs = prepare_game_configs(4);
        assert_eq!(configs.len(), 4);
        assert!(configs[0].first_is_red);
        assert!(!configs[1].first_is_red);
        assert!(configs[2].first_is_red);
        assert!(!configs[3].first_is_red);
    }

    #[test]
    fn test_play_match_zero_games() {
        let config = MatchConfig::new(AgentConfig::random(), AgentConfig::random(), 0);
        assert_eq!(play_match(&config).unwrap().games_played, 0);
    }

    #[test]
    fn test_play_match_basic() {
        let config = MatchConfig::new(
            AgentConfig::minimax(1).with_spawn_cap(4),
            AgentConfig::random(),
            2,
        )
        .with_max_turns(20);

        let result = play_match(&config).unwrap();
        assert_eq!(result.games_played, 2);
        assert_eq!(result.first_wins + result.second_wins + result.draws, 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = MatchConfig::new(AgentConfig::random(), AgentConfig::random(), 4)
            .with_max_turns(40)
            .with_seed(11);

        let parallel = play_match(&config).unwrap();
        let sequential = play_match(&config.clone().sequential()).unwrap();

        let actions = |r: &MatchResult| -> Vec<_> {
            r.game_outcomes.iter().map(|o| o.actions.clone()).collect()
        };
        assert_eq!(actions(&parallel), actions(&sequential));
        assert_eq!(parallel.first_wins, sequential.first_wins);
    }
}
