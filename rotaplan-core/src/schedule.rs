//! Rounds, fixtures and schedules

use serde::{Deserialize, Serialize};

use crate::pairs::Pair;
use crate::registry::TeamId;

/// Index of a game station, `0..n_games`
pub type GameSlot = usize;

/// One pairing played at one game station
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub game: GameSlot,
    pub team_a: TeamId,
    pub team_b: TeamId,
}

impl Fixture {
    pub fn new(game: GameSlot, pair: Pair) -> Self {
        Self {
            game,
            team_a: pair.a(),
            team_b: pair.b(),
        }
    }

    pub fn pair(&self) -> Pair {
        Pair::new(self.team_a, self.team_b)
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.team_a == team || self.team_b == team
    }
}

/// Fixtures of one time slot, ordered by game station
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    fixtures: Vec<Fixture>,
}

impl Round {
    pub fn from_fixtures(mut fixtures: Vec<Fixture>) -> Self {
        fixtures.sort_by_key(|f| f.game);
        Self { fixtures }
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    pub fn fixture_at(&self, game: GameSlot) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.game == game)
    }

    /// Teams playing this round, two per fixture
    pub fn teams(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.fixtures.iter().flat_map(|f| [f.team_a, f.team_b])
    }
}

/// A full candidate: one `Round` per time slot
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    rounds: Vec<Round>,
}

impl Schedule {
    pub fn new(rounds: Vec<Round>) -> Self {
        Self { rounds }
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn fixtures(&self) -> impl Iterator<Item = &Fixture> + '_ {
        self.rounds.iter().flat_map(|r| r.fixtures.iter())
    }

    pub fn total_fixtures(&self) -> usize {
        self.rounds.iter().map(Round::len).sum()
    }
}
