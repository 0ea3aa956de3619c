//! Game assignment - maps a round's pairs onto game stations
//!
//! Level 3 - Step-level implementation

use rand::seq::SliceRandom;
use rand::Rng;

use rotaplan_core::{Fixture, GameSlot, Pair, Round};

/// Randomly assigns one distinct game station per pair
#[derive(Clone, Copy, Debug)]
pub struct GameAssigner {
    n_games: usize,
}

impl GameAssigner {
    pub fn new(n_games: usize) -> Self {
        Self { n_games }
    }

    pub fn n_games(&self) -> usize {
        self.n_games
    }

    /// Build a round from `pairs`, sorted by game station
    ///
    /// Pairs beyond the number of stations would have nowhere to play;
    /// the round builder never produces more than `n_games` pairs.
    pub fn assign<R: Rng + ?Sized>(&self, pairs: &[Pair], rng: &mut R) -> Round {
        debug_assert!(pairs.len() <= self.n_games, "more pairs than game stations");

        let mut slots: Vec<GameSlot> = (0..self.n_games).collect();
        slots.shuffle(rng);

        let fixtures = pairs
            .iter()
            .zip(slots)
            .map(|(pair, game)| Fixture::new(game, *pair))
            .collect();

        Round::from_fixtures(fixtures)
    }
}
