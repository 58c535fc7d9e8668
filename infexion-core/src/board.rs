//! Board state machine: cell occupancy, actions and reversible mutations

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::hex::{HexDir, HexPos, BOARD_CELLS, BOARD_N};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Highest power a single cell can hold
pub const MAX_CELL_POWER: u8 = 6;

/// Spawning is only legal while total board power is below this
pub const MAX_TOTAL_POWER: u32 = BOARD_CELLS as u32;

/// The game ends once this many actions have been played
pub const MAX_TURNS: usize = 343;

/// Minimum power margin needed to win a finished game
pub const WIN_POWER_DIFF: u32 = 2;

// A spread line never revisits a cell or its own source.
const _: () = assert!((MAX_CELL_POWER as i8) < BOARD_N);

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Blue,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "RED"),
            Color::Blue => write!(f, "BLUE"),
        }
    }
}

/// Occupancy of a single cell.
///
/// Normalized on construction: a state without an owner, with zero power, or
/// with power above `MAX_CELL_POWER` collapses to [`CellState::EMPTY`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellState {
    owner: Option<Color>,
    power: u8,
}

impl CellState {
    pub const EMPTY: CellState = CellState {
        owner: None,
        power: 0,
    };

    pub fn new(owner: Option<Color>, power: u8) -> Self {
        match owner {
            Some(color) if power > 0 && power <= MAX_CELL_POWER => Self {
                owner: Some(color),
                power,
            },
            _ => Self::EMPTY,
        }
    }

    /// Shorthand for `CellState::new(Some(color), power)`
    pub fn owned(color: Color, power: u8) -> Self {
        Self::new(Some(color), power)
    }

    pub fn owner(&self) -> Option<Color> {
        self.owner
    }

    pub fn power(&self) -> u8 {
        self.power
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_none()
    }

    pub fn is_owned_by(&self, color: Color) -> bool {
        self.owner == Some(color)
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            Some(color) => write!(f, "{}{}", color, self.power),
            None => write!(f, "empty"),
        }
    }
}

/// A player action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Place one power on an empty cell
    Spawn { cell: HexPos },
    /// Empty an owned cell and spread its power along a line
    Spread { cell: HexPos, direction: HexDir },
}

impl Action {
    /// The cell the action starts from
    pub fn cell(&self) -> HexPos {
        match self {
            Action::Spawn { cell } | Action::Spread { cell, .. } => *cell,
        }
    }

    pub fn is_spawn(&self) -> bool {
        matches!(self, Action::Spawn { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Spawn { cell } => write!(f, "SPAWN({}, {})", cell.r, cell.q),
            Action::Spread { cell, direction } => {
                write!(f, "SPREAD({}, {}, {})", cell.r, cell.q, direction)
            }
        }
    }
}

/// Single-cell delta produced by resolving an action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellMutation {
    pub cell: HexPos,
    pub prev: CellState,
    pub next: CellState,
}

/// Minimal delta for one action; the unit of the undo history.
///
/// Every cell appears at most once and every `prev` is read from the board
/// before any `next` is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardMutation {
    pub action: Action,
    pub cell_mutations: Vec<CellMutation>,
}

// ============================================================================
// FINGERPRINT
// ============================================================================

/// Canonical key for a board position.
///
/// One byte per coordinate (0 empty, 1..=6 red power, 7..=12 blue power) plus
/// the side to move. Independent of how the position was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    cells: [u8; BOARD_CELLS],
    turn: Color,
}

impl Fingerprint {
    fn encode(state: CellState) -> u8 {
        match state.owner {
            None => 0,
            Some(Color::Red) => state.power,
            Some(Color::Blue) => MAX_CELL_POWER + state.power,
        }
    }

    fn decode(byte: u8) -> CellState {
        match byte {
            0 => CellState::EMPTY,
            p if p <= MAX_CELL_POWER => CellState::owned(Color::Red, p),
            p => CellState::owned(Color::Blue, p - MAX_CELL_POWER),
        }
    }

    /// Side to move in the fingerprinted position
    pub fn turn(&self) -> Color {
        self.turn
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (index, &byte) in self.cells.iter().enumerate() {
            let state = Self::decode(byte);
            let Some(owner) = state.owner else { continue };
            let pos = HexPos::from_index(index);
            let tag = if owner == Color::Red { 'R' } else { 'B' };
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}{}{}{}", pos.r, pos.q, tag, state.power)?;
            first = false;
        }
        let turn = if self.turn == Color::Red { 'R' } else { 'B' };
        write!(f, "|{}", turn)
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Game board (mutate in place with apply/undo; clone explicitly for snapshots)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// Occupied cells only; absent means empty
    cells: FxHashMap<HexPos, CellState>,

    /// Side to move
    turn_color: Color,

    /// Applied mutations, oldest first
    history: Vec<BoardMutation>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board, RED to move
    pub fn new() -> Self {
        Self {
            cells: FxHashMap::default(),
            turn_color: Color::Red,
            history: Vec::new(),
        }
    }

    /// Board with the given cells occupied, RED to move and no history.
    ///
    /// Empty states and off-board coordinates are skipped.
    pub fn from_cells(cells: impl IntoIterator<Item = (HexPos, CellState)>) -> Self {
        let mut board = Self::new();
        for (pos, state) in cells {
            if pos.is_valid() {
                board.set_cell(pos, state);
            }
        }
        board
    }

    /// Set the side to move (position setup only)
    pub fn with_turn(mut self, color: Color) -> Self {
        self.turn_color = color;
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// State of a cell (empty when unoccupied or off the board)
    pub fn cell(&self, pos: HexPos) -> CellState {
        self.cells.get(&pos).copied().unwrap_or(CellState::EMPTY)
    }

    pub fn turn_color(&self) -> Color {
        self.turn_color
    }

    /// Number of actions played so far
    pub fn turn_count(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[BoardMutation] {
        &self.history
    }

    pub fn last_action(&self) -> Option<Action> {
        self.history.last().map(|m| m.action)
    }

    /// Occupied cells in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (HexPos, CellState)> + '_ {
        HexPos::all().filter_map(move |pos| self.cells.get(&pos).map(|&state| (pos, state)))
    }

    /// Total power of all cells
    pub fn total_power(&self) -> u32 {
        self.cells.values().map(|c| c.power as u32).sum()
    }

    /// Total power of one color
    pub fn color_power(&self, color: Color) -> u32 {
        self.cells
            .values()
            .filter(|c| c.is_owned_by(color))
            .map(|c| c.power as u32)
            .sum()
    }

    /// Number of cells one color occupies
    pub fn color_cells(&self, color: Color) -> usize {
        self.cells.values().filter(|c| c.is_owned_by(color)).count()
    }

    // ========================================================================
    // GAME STATUS
    // ========================================================================

    /// True once the game has ended
    pub fn is_terminal(&self) -> bool {
        if self.turn_count() < 2 {
            return false;
        }

        self.turn_count() >= MAX_TURNS
            || self.color_power(Color::Red) == 0
            || self.color_power(Color::Blue) == 0
    }

    /// Winner of a finished game; `None` while ongoing or on a draw
    pub fn winner(&self) -> Option<Color> {
        if !self.is_terminal() {
            return None;
        }

        let red = self.color_power(Color::Red);
        let blue = self.color_power(Color::Blue);

        if red.abs_diff(blue) < WIN_POWER_DIFF {
            None
        } else if red > blue {
            Some(Color::Red)
        } else {
            Some(Color::Blue)
        }
    }

    /// Canonical position key
    pub fn fingerprint(&self) -> Fingerprint {
        let mut cells = [0u8; BOARD_CELLS];
        for (pos, &state) in &self.cells {
            if let Some(index) = pos.index() {
                cells[index] = Fingerprint::encode(state);
            }
        }
        Fingerprint {
            cells,
            turn: self.turn_color,
        }
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// Check an action against the current position without mutating it
    pub fn validate_action(&self, action: &Action) -> bool {
        match *action {
            Action::Spawn { cell } => {
                cell.is_valid()
                    && self.cell(cell).is_empty()
                    && self.total_power() < MAX_TOTAL_POWER
            }
            Action::Spread { cell, .. } => {
                cell.is_valid() && self.cell(cell).is_owned_by(self.turn_color)
            }
        }
    }

    // ========================================================================
    // APPLY / UNDO
    // ========================================================================

    /// Validate and apply an action, recording it in the history.
    ///
    /// The board is left untouched when the action is illegal.
    pub fn apply_action(&mut self, action: Action) -> Result<&BoardMutation, GameError> {
        if !self.validate_action(&action) {
            return Err(GameError::IllegalAction {
                action,
                color: self.turn_color,
            });
        }

        let mutation = self.resolve_action(action);
        for m in &mutation.cell_mutations {
            self.set_cell(m.cell, m.next);
        }

        self.history.push(mutation);
        self.turn_color = self.turn_color.opponent();

        Ok(&self.history[self.history.len() - 1])
    }

    /// Revert the most recent action
    pub fn undo_action(&mut self) -> Result<BoardMutation, GameError> {
        let mutation = self.history.pop().ok_or(GameError::EmptyHistory)?;

        for m in mutation.cell_mutations.iter().rev() {
            self.set_cell(m.cell, m.prev);
        }
        self.turn_color = self.turn_color.opponent();

        Ok(mutation)
    }

    fn set_cell(&mut self, pos: HexPos, state: CellState) {
        if state.is_empty() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, state);
        }
    }

    // ========================================================================
    // RESOLUTION
    // ========================================================================

    fn resolve_action(&self, action: Action) -> BoardMutation {
        let cell_mutations = match action {
            Action::Spawn { cell } => vec![CellMutation {
                cell,
                prev: self.cell(cell),
                next: CellState::owned(self.turn_color, 1),
            }],
            Action::Spread { cell, direction } => self.resolve_spread(cell, direction),
        };

        BoardMutation {
            action,
            cell_mutations,
        }
    }

    fn resolve_spread(&self, from: HexPos, direction: HexDir) -> Vec<CellMutation> {
        let source = self.cell(from);
        let player = self.turn_color;

        let mut mutations = Vec::with_capacity(source.power as usize + 1);
        mutations.push(CellMutation {
            cell: from,
            prev: source,
            next: CellState::EMPTY,
        });

        for step in 1..=source.power as i8 {
            let to = from.offset(direction, step);
            let prev = self.cell(to);
            // Exceeding MAX_CELL_POWER normalizes to empty (capture by overflow).
            let next = CellState::owned(player, prev.power + 1);
            mutations.push(CellMutation { cell: to, prev, next });
        }

        mutations
    }
}

// ============================================================================
// TESTS
// ============================================================================
