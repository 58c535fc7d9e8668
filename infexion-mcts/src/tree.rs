//! MCTS tree structure and node management
//!
//! Nodes live in an arena and each owns a snapshot of its board, so
//! expansion clones the parent board and applies one action to the copy.
//!
//! ## Architecture
//! - Level 2: Tree operations (select, expand, backpropagate)
//! - Level 3: UCB1 calculation, node accessors
//! - Level 4: Statistics

use infexion_core::{legal_actions, Action, Board, Color, Fingerprint};

// ============================================================================
// TYPES
// ============================================================================

/// Node identifier (index into arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// How a simulated game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playout {
    Won(Color),
    Drawn,
    /// Stopped at the rollout depth limit
    Unfinished,
}

impl Playout {
    /// Outcome of `board` as it stands
    pub fn of(board: &Board) -> Self {
        if !board.is_terminal() {
            return Playout::Unfinished;
        }
        match board.winner() {
            Some(color) => Playout::Won(color),
            None => Playout::Drawn,
        }
    }

    /// Reward for `color`: 1 for a win, 0 for a loss, 0.5 otherwise
    pub fn reward_for(self, color: Color) -> f32 {
        match self {
            Playout::Won(winner) if winner == color => 1.0,
            Playout::Won(_) => 0.0,
            Playout::Drawn | Playout::Unfinished => 0.5,
        }
    }
}

/// Statistics for a tree node
#[derive(Clone, Debug, Default)]
pub struct NodeStats {
    pub visits: u32,
    /// Total reward for the player who moved into this node
    pub wins: f32,
    /// Pending selections in a batch
    pub virtual_losses: u32,
}

impl NodeStats {
    pub fn win_rate(&self) -> f32 {
        if self.visits == 0 {
            0.5
        } else {
            self.wins / self.visits as f32
        }
    }

    pub fn adjusted_visits(&self) -> u32 {
        self.visits + self.virtual_losses
    }
}

/// A node in the MCTS tree
#[derive(Clone, Debug)]
pub struct MctsNode {
    pub board: Board,
    pub fingerprint: Fingerprint,
    pub parent: Option<NodeId>,
    /// Action that led to this node (None for root)
    pub incoming_action: Option<Action>,
    pub children: Vec<(Action, NodeId)>,
    /// Actions not yet expanded, next one last
    pub untried_actions: Vec<Action>,
    pub stats: NodeStats,
    /// Known outcome when the board is terminal
    pub terminal: Option<Playout>,
}

impl MctsNode {
    pub fn new(
        board: Board,
        parent: Option<NodeId>,
        incoming_action: Option<Action>,
        spawn_cap: Option<usize>,
    ) -> Self {
        let terminal = board.is_terminal().then(|| Playout::of(&board));

        let untried_actions = if terminal.is_none() {
            let mut actions = legal_actions(&board, board.turn_color(), spawn_cap);
            actions.reverse();
            actions
        } else {
            Vec::new()
        };

        Self {
            fingerprint: board.fingerprint(),
            board,
            parent,
            incoming_action,
            children: Vec::new(),
            untried_actions,
            stats: NodeStats::default(),
            terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.untried_actions.is_empty()
    }

    /// The player whose action produced this node
    pub fn mover(&self) -> Color {
        self.board.turn_color().opponent()
    }
}

// ============================================================================
// MCTS TREE (Level 2 - Tree Operations)
// ============================================================================

/// MCTS search tree with arena allocation
#[derive(Debug)]
pub struct MctsTree {
    nodes: Vec<MctsNode>,
    spawn_cap: Option<usize>,
}

impl MctsTree {
    pub fn new(root_board: Board, spawn_cap: Option<usize>) -> Self {
        let root = MctsNode::new(root_board, None, None, spawn_cap);
        Self {
            nodes: vec![root],
            spawn_cap,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Descend by UCB1 until a node that is terminal or still has untried actions
    pub fn select_leaf(&self, exploration: f32) -> NodeId {
        let mut current = self.root();

        while self.get(current).is_fully_expanded() && !self.get(current).is_terminal() {
            match self.select_best_child(current, exploration) {
                Some(child) => current = child,
                None => break,
            }
        }

        current
    }

    /// Add one child for the next untried action
    pub fn expand(&mut self, node_id: NodeId) -> Option<NodeId> {
        let action = self.get_mut(node_id).untried_actions.pop()?;

        let mut child_board = self.get(node_id).board.clone();
        child_board
            .apply_action(action)
            .unwrap_or_else(|err| panic!("expansion produced an illegal action: {}", err));

        let child_id = NodeId(self.nodes.len());
        let child = MctsNode::new(child_board, Some(node_id), Some(action), self.spawn_cap);
        self.nodes.push(child);
        self.get_mut(node_id).children.push((action, child_id));

        Some(child_id)
    }

    // ========================================================================
    // Level 3: Selection Helpers
    // ========================================================================

    fn select_best_child(&self, node_id: NodeId, exploration: f32) -> Option<NodeId> {
        let node = self.get(node_id);
        let parent_visits = node.stats.adjusted_visits();

        node.children
            .iter()
            .max_by(|(_, a), (_, b)| {
                let ucb_a = self.ucb1(*a, parent_visits, exploration);
                let ucb_b = self.ucb1(*b, parent_visits, exploration);
                ucb_a.total_cmp(&ucb_b)
            })
            .map(|(_, id)| *id)
    }

    /// UCB1 = wins/visits + C * sqrt(ln(parent_visits) / visits)
    pub(crate) fn ucb1(&self, node_id: NodeId, parent_visits: u32, exploration: f32) -> f32 {
        let stats = &self.get(node_id).stats;
        let visits = stats.adjusted_visits();

        if visits == 0 {
            return f32::INFINITY;
        }

        let exploitation = stats.wins / visits as f32;
        let exploration_term = exploration * ((parent_visits as f32).ln() / visits as f32).sqrt();

        exploitation + exploration_term
    }

    // ========================================================================
    // Level 2: Backpropagation
    // ========================================================================

    /// Credit `playout` to every node from `leaf_id` up to the root
    pub fn backpropagate(&mut self, leaf_id: NodeId, playout: Playout) {
        let mut current = Some(leaf_id);

        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.stats.visits += 1;
            node.stats.wins += playout.reward_for(node.mover());
            current = node.parent;
        }
    }

    pub fn add_virtual_loss(&mut self, node_id: NodeId) {
        let mut current = Some(node_id);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.stats.virtual_losses += 1;
            current = node.parent;
        }
    }

    pub fn remove_virtual_loss(&mut self, node_id: NodeId) {
        let mut current = Some(node_id);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.stats.virtual_losses = node.stats.virtual_losses.saturating_sub(1);
            current = node.parent;
        }
    }

    // ========================================================================
    // Level 4: Statistics
    // ========================================================================

    /// Most visited root action
    pub fn best_action(&self) -> Option<Action> {
        self.get(self.root())
            .children
            .iter()
            .max_by_key(|(_, id)| self.get(*id).stats.visits)
            .map(|(action, _)| *action)
    }

    pub fn total_simulations(&self) -> u32 {
        self.get(self.root()).stats.visits
    }
}

// ============================================================================
// TESTS
// ============================================================================
