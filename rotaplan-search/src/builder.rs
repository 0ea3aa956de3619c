//! Schedule builder - one full candidate per call
//!
//! Level 2 - Phase-level implementation

use rand::Rng;

use rotaplan_core::{PairCatalog, Schedule};

use crate::games::GameAssigner;
use crate::round_robin::RoundBuilder;

/// Composes round selection and game assignment over all rounds
#[derive(Clone, Debug)]
pub struct ScheduleBuilder<'a> {
    catalog: &'a PairCatalog,
    n_rounds: usize,
    capacity: usize,
    assigner: GameAssigner,
}

impl<'a> ScheduleBuilder<'a> {
    pub fn new(catalog: &'a PairCatalog, n_teams: usize, n_games: usize, n_rounds: usize) -> Self {
        Self {
            catalog,
            n_rounds,
            capacity: n_games.min(n_teams / 2),
            assigner: GameAssigner::new(n_games),
        }
    }

    /// Maximum fixtures per round
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn n_rounds(&self) -> usize {
        self.n_rounds
    }

    /// Build an independent candidate from a fresh shuffle of the catalog
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Schedule {
        let mut rounds = RoundBuilder::new(self.catalog, self.capacity, rng);
        let mut schedule = Vec::with_capacity(self.n_rounds);

        for _ in 0..self.n_rounds {
            let pairs = rounds.next_round();
            schedule.push(self.assigner.assign(&pairs, rng));
        }

        Schedule::new(schedule)
    }
}
