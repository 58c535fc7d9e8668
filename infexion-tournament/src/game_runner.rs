//! Game runner - executes single games
//!
//! Level 3 - Step-level implementation

use infexion_core::{legal_actions, new_board, Action, Board, Color, GameError, MinimaxAI};
use infexion_mcts::MctsPlayer;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{AgentConfig, PlayerType};

/// Outcome of a single game
#[derive(Clone, Debug, Serialize)]
pub struct GameOutcome {
    /// None for a draw or a game stopped at the turn cap
    pub winner: Option<Color>,
    pub turns: usize,
    pub red_power: u32,
    pub blue_power: u32,
    /// Whether the game reached a terminal position
    pub finished: bool,
    pub actions: Vec<Action>,
}

impl GameOutcome {
    fn from_board(board: &Board, actions: Vec<Action>) -> Self {
        Self {
            winner: board.winner(),
            turns: board.turn_count(),
            red_power: board.color_power(Color::Red),
            blue_power: board.color_power(Color::Blue),
            finished: board.is_terminal(),
            actions,
        }
    }

    pub fn red_wins(&self) -> bool {
        self.winner == Some(Color::Red)
    }

    pub fn blue_wins(&self) -> bool {
        self.winner == Some(Color::Blue)
    }

    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

/// A configured player
pub enum Agent {
    Minimax(MinimaxAI),
    Mcts(MctsPlayer),
    Random {
        rng: ChaCha8Rng,
        spawn_cap: Option<usize>,
    },
}

impl Agent {
    /// Build an agent; `seed` applies unless the config pins its own
    pub fn from_config(config: &AgentConfig, seed: u64) -> Self {
        let seed = config.seed.unwrap_or(seed);
        match config.player_type {
            PlayerType::Minimax => Agent::Minimax(MinimaxAI::new(config.search.clone())),
            PlayerType::Mcts => Agent::Mcts(MctsPlayer::new(config.mcts.clone().with_seed(seed))),
            PlayerType::Random => Agent::Random {
                rng: ChaCha8Rng::seed_from_u64(seed),
                spawn_cap: config.search.spawn_cap,
            },
        }
    }

    /// Choose an action for the side to move; the board is left as found
    pub fn choose_action(&mut self, board: &mut Board) -> Result<Action, GameError> {
        match self {
            Agent::Minimax(ai) => ai.choose_action(board),
            Agent::Mcts(player) => player.choose_action(board),
            Agent::Random { rng, spawn_cap } => {
                if board.is_terminal() {
                    return Err(GameError::GameOver);
                }
                legal_actions(board, board.turn_color(), *spawn_cap)
                    .choose(rng)
                    .copied()
                    .ok_or(GameError::NoLegalAction(board.turn_color()))
            }
        }
    }
}

/// Plays games between a red and a blue agent
pub struct GameRunner {
    red: Agent,
    blue: Agent,
    max_turns: usize,
}

impl GameRunner {
    /// Agents are seeded with `seed` (red) and `seed + 1` (blue)
    pub fn new(red: &AgentConfig, blue: &AgentConfig, seed: u64) -> Self {
        Self {
            red: Agent::from_config(red, seed),
            blue: Agent::from_config(blue, seed.wrapping_add(1)),
            max_turns: infexion_core::MAX_TURNS,
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Play a full game from the empty board
    pub fn play_game(&mut self) -> Result<GameOutcome, GameError> {
        self.play_from(new_board())
    }

    /// Play from `board` until it is terminal or the turn cap is reached.
    ///
    /// Every chosen action goes through `apply_action`, so an agent proposing
    /// an illegal action ends the game with an error.
    pub fn play_from(&mut self, mut board: Board) -> Result<GameOutcome, GameError> {
        let mut actions = Vec::new();

        while !board.is_terminal() && board.turn_count() < self.max_turns {
            let agent = match board.turn_color() {
                Color::Red => &mut self.red,
                Color::Blue => &mut self.blue,
            };

            let action = match agent.choose_action(&mut board) {
                Ok(action) => action,
                Err(GameError::NoLegalAction(color)) => {
                    warn!(%color, turn = board.turn_count(), "no legal action, stopping game");
                    break;
                }
                Err(err) => return Err(err),
            };

            board.apply_action(action)?;
            actions.push(action);
        }

        let outcome = GameOutcome::from_board(&board, actions);
        info!(
            winner = ?outcome.winner,
            turns = outcome.turns,
            red_power = outcome.red_power,
            blue_power = outcome.blue_power,
            "game finished"
        );
        Ok(outcome)
    }
}
