//! Transposition table for alpha-beta search
//!
//! Memoizes completed minimax nodes by board fingerprint. Each entry records
//! how its score relates to the window it was searched with:
//! - `Exact`: the score is the true minimax value
//! - `LowerBound`: the search failed high, true value >= score
//! - `UpperBound`: the search failed low, true value <= score

use rustc_hash::FxHashMap;

use crate::board::{Action, Fingerprint};

/// How a stored score bounds the true value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    LowerBound,
    UpperBound,
}

/// A memoized search result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranspositionEntry {
    pub best_action: Option<Action>,
    pub score: i32,
    pub bound: Bound,
    pub depth: u32,
}

/// Result of a table lookup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Probe {
    /// Score to return when `usable`
    pub score: i32,
    /// Whether the caller may return `score` without searching
    pub usable: bool,
    /// Best action of any stored entry, usable for move ordering
    pub suggested_action: Option<Action>,
}

impl Probe {
    const MISS: Probe = Probe {
        score: 0,
        usable: false,
        suggested_action: None,
    };
}

/// Lookup counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

/// Fingerprint-keyed transposition table (single owner, no replacement policy)
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: FxHashMap<Fingerprint, TranspositionEntry>,
    stats: TableStats,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a position searched to at least `depth` plies.
    ///
    /// Bound entries are only usable when they already decide the current
    /// window, and then report the window edge (fail-hard).
    pub fn find(&mut self, fingerprint: &Fingerprint, depth: u32, alpha: i32, beta: i32) -> Probe {
        self.stats.probes += 1;

        let Some(entry) = self.entries.get(fingerprint) else {
            return Probe::MISS;
        };

        let mut probe = Probe {
            score: entry.score,
            usable: false,
            suggested_action: entry.best_action,
        };

        if entry.depth < depth {
            return probe;
        }

        match entry.bound {
            Bound::Exact => probe.usable = true,
            Bound::LowerBound if entry.score >= beta => {
                probe.score = beta;
                probe.usable = true;
            }
            Bound::UpperBound if entry.score <= alpha => {
                probe.score = alpha;
                probe.usable = true;
            }
            _ => {}
        }

        if probe.usable {
            self.stats.hits += 1;
        }
        probe
    }

    /// Record a completed node, classifying it against its entry window
    pub fn store(
        &mut self,
        fingerprint: Fingerprint,
        score: i32,
        best_action: Option<Action>,
        depth: u32,
        alpha: i32,
        beta: i32,
    ) {
        let bound = if score <= alpha {
            Bound::UpperBound
        } else if score >= beta {
            Bound::LowerBound
        } else {
            Bound::Exact
        };

        self.stats.stores += 1;
        self.entries.insert(
            fingerprint,
            TranspositionEntry {
                best_action,
                score,
                bound,
                depth,
            },
        );
    }

    /// Raw entry for a position
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&TranspositionEntry> {
        self.entries.get(fingerprint)
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> TableStats {
        self.stats
    }
}
