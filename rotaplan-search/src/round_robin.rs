//! Round-robin pair selection
//!
//! Level 3 - Step-level implementation

use rand::Rng;
use rustc_hash::FxHashSet;

use rotaplan_core::{Pair, PairCatalog, TeamId};

/// Picks conflict-free pairs round after round for one attempt
///
/// Owns a shuffled copy of the catalog and the set of pairs used since the
/// last reset. Once every catalog pair has been used the set is cleared, so
/// a long schedule cycles through the catalog in epochs.
#[derive(Clone, Debug)]
pub struct RoundBuilder {
    pool: Vec<Pair>,
    used: FxHashSet<Pair>,
    capacity: usize,
}

impl RoundBuilder {
    /// Create a builder over a freshly shuffled catalog
    ///
    /// # Arguments
    /// * `catalog` - Admissible pairs of the session
    /// * `capacity` - Maximum pairs per round, `min(n_games, n_teams / 2)`
    /// * `rng` - Random number generator used for the shuffle
    pub fn new<R: Rng + ?Sized>(catalog: &PairCatalog, capacity: usize, rng: &mut R) -> Self {
        Self::from_pool(catalog.shuffled(rng), capacity)
    }

    /// Create a builder over an already ordered pool
    pub fn from_pool(pool: Vec<Pair>, capacity: usize) -> Self {
        Self {
            pool,
            used: FxHashSet::default(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pairs used since the last epoch reset
    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    /// Select the pairs of the next round
    ///
    /// First only pairs not used in the current epoch are taken. If that
    /// cannot fill the round, the pool is walked again accepting repeats;
    /// a team is never placed twice in one round either way.
    pub fn next_round(&mut self) -> Vec<Pair> {
        let mut selected = Vec::with_capacity(self.capacity);
        let mut placed: FxHashSet<TeamId> = FxHashSet::default();

        self.fill(&mut selected, &mut placed, true);
        if selected.len() < self.capacity {
            self.fill(&mut selected, &mut placed, false);
        }

        self.used.extend(selected.iter().copied());
        if self.used.len() >= self.pool.len() {
            self.used.clear();
        }

        selected
    }

    fn fill(&self, selected: &mut Vec<Pair>, placed: &mut FxHashSet<TeamId>, unused_only: bool) {
        for pair in &self.pool {
            if selected.len() >= self.capacity {
                break;
            }
            if unused_only && self.used.contains(pair) {
                continue;
            }
            if placed.contains(&pair.a()) || placed.contains(&pair.b()) {
                continue;
            }
            placed.insert(pair.a());
            placed.insert(pair.b());
            selected.push(*pair);
        }
    }
}
