//! Infexion Tournament - games and matches between agents
//!
//! This crate drives the engines from the outside:
//! - Agents built from serde configs (minimax, MCTS, random baseline)
//! - Single games replayed through `apply_action`
//! - Matches with alternating colors, sequential or on rayon
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 2: play_match (phases)
//! - Level 3: GameRunner::play_game (steps)
//! - Level 4: configuration

mod config;
mod game_runner;
mod match_play;

pub use config::{AgentConfig, MatchConfig, PlayerType};
pub use game_runner::{Agent, GameOutcome, GameRunner};
pub use match_play::{play_match, MatchResult};
