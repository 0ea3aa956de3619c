//! Schedule statistics - how often each pairing, game and team/game
//! combination occurs

use std::collections::BTreeMap;

use crate::pairs::Pair;
use crate::registry::TeamId;
use crate::schedule::{Fixture, GameSlot, Schedule};

/// Occurrence count per unordered pair
///
/// Every pair of the chosen universe is present from the start, so pairs
/// that never meet count as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchupCounts {
    counts: BTreeMap<Pair, u32>,
}

impl MatchupCounts {
    pub fn new(universe: impl IntoIterator<Item = Pair>) -> Self {
        Self {
            counts: universe.into_iter().map(|p| (p, 0)).collect(),
        }
    }

    pub fn record(&mut self, pair: Pair) {
        *self.counts.entry(pair).or_insert(0) += 1;
    }

    pub fn get(&self, pair: &Pair) -> u32 {
        self.counts.get(pair).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pair, u32)> + '_ {
        self.counts.iter().map(|(p, c)| (*p, *c))
    }

    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.counts.values().copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

/// Number of fixtures played at each game station
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameCounts {
    counts: Vec<u32>,
}

impl GameCounts {
    pub fn new(n_games: usize) -> Self {
        Self { counts: vec![0; n_games] }
    }

    pub fn record(&mut self, game: GameSlot) {
        if let Some(count) = self.counts.get_mut(game) {
            *count += 1;
        }
    }

    pub fn get(&self, game: GameSlot) -> u32 {
        self.counts.get(game).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// Dense `n_games x n_teams` matrix: how often team `t` played game `g`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameTeamCounts {
    n_games: usize,
    n_teams: usize,
    cells: Vec<u32>,
}

impl GameTeamCounts {
    pub fn new(n_games: usize, n_teams: usize) -> Self {
        Self {
            n_games,
            n_teams,
            cells: vec![0; n_games * n_teams],
        }
    }

    pub fn n_games(&self) -> usize {
        self.n_games
    }

    pub fn n_teams(&self) -> usize {
        self.n_teams
    }

    pub fn record(&mut self, game: GameSlot, team: TeamId) {
        if game < self.n_games && team < self.n_teams {
            self.cells[game * self.n_teams + team] += 1;
        }
    }

    pub fn get(&self, game: GameSlot, team: TeamId) -> u32 {
        if game < self.n_games && team < self.n_teams {
            self.cells[game * self.n_teams + team]
        } else {
            0
        }
    }

    /// Counts of one game across all teams
    pub fn row(&self, game: GameSlot) -> &[u32] {
        if game < self.n_games {
            &self.cells[game * self.n_teams..(game + 1) * self.n_teams]
        } else {
            &[]
        }
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Column sums: total rounds played per team
    pub fn team_totals(&self) -> Vec<u32> {
        (0..self.n_teams)
            .map(|t| (0..self.n_games).map(|g| self.get(g, t)).sum())
            .collect()
    }

    pub fn total(&self) -> u32 {
        self.cells.iter().sum()
    }
}

/// All raw statistics of one schedule
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduleStats {
    pub matchups: MatchupCounts,
    pub games: GameCounts,
    pub game_teams: GameTeamCounts,
}

impl ScheduleStats {
    /// Empty statistics with every key pre-populated
    pub fn empty(universe: impl IntoIterator<Item = Pair>, n_games: usize, n_teams: usize) -> Self {
        Self {
            matchups: MatchupCounts::new(universe),
            games: GameCounts::new(n_games),
            game_teams: GameTeamCounts::new(n_games, n_teams),
        }
    }

    /// Count every fixture of `schedule`
    pub fn tally(
        schedule: &Schedule,
        universe: impl IntoIterator<Item = Pair>,
        n_games: usize,
        n_teams: usize,
    ) -> Self {
        let mut stats = Self::empty(universe, n_games, n_teams);
        for fixture in schedule.fixtures() {
            stats.record(fixture);
        }
        stats
    }

    pub fn record(&mut self, fixture: &Fixture) {
        self.games.record(fixture.game);
        self.game_teams.record(fixture.game, fixture.team_a);
        self.game_teams.record(fixture.game, fixture.team_b);
        self.matchups.record(fixture.pair());
    }

    pub fn rounds_played(&self) -> Vec<u32> {
        self.game_teams.team_totals()
    }
}
