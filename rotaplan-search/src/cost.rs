//! Cost evaluation - how unfair is a schedule
//!
//! Level 2 - Phase-level implementation

use rotaplan_core::{Pair, Schedule, ScheduleStats};

use crate::config::CostPolicy;

/// Cost of a schedule plus the statistics it was derived from
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Non-negative, lower is better, 0 is perfectly balanced
    pub cost: f64,
    pub stats: ScheduleStats,
}

/// Scores schedules of one session
///
/// Four statistics are combined: fixtures per game, fixtures per
/// (game, team), rounds played per team and occurrences per matchup.
#[derive(Clone, Debug)]
pub struct CostEvaluator {
    policy: CostPolicy,
    universe: Vec<Pair>,
    n_games: usize,
    n_teams: usize,
}

impl CostEvaluator {
    /// # Arguments
    /// * `policy` - Variance or range scoring
    /// * `universe` - Pairs the matchup statistic is computed over
    /// * `n_games` - Number of game stations
    /// * `n_teams` - Number of teams
    pub fn new(policy: CostPolicy, universe: Vec<Pair>, n_games: usize, n_teams: usize) -> Self {
        Self {
            policy,
            universe,
            n_games,
            n_teams,
        }
    }

    pub fn policy(&self) -> CostPolicy {
        self.policy
    }

    /// Count and score a schedule
    pub fn evaluate(&self, schedule: &Schedule) -> Evaluation {
        let stats = ScheduleStats::tally(
            schedule,
            self.universe.iter().copied(),
            self.n_games,
            self.n_teams,
        );
        let cost = self.score(&stats);
        Evaluation { cost, stats }
    }

    /// Score already counted statistics
    pub fn score(&self, stats: &ScheduleStats) -> f64 {
        let spread: fn(&[u32]) -> f64 = match self.policy {
            CostPolicy::Variance => variance,
            CostPolicy::Range => range,
        };

        let games = spread(stats.games.counts());
        let game_teams = spread(stats.game_teams.cells());
        let rounds_played = spread(&stats.rounds_played());
        let matchups = spread(&stats.matchups.values().collect::<Vec<u32>>());

        games + self.policy.game_team_weight() * game_teams + rounds_played + matchups
    }
}

// ============================================================================
// Level 4 - Utilities
// ============================================================================

/// Population variance; 0 for an empty slice
fn variance(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

/// max - min; 0 for an empty slice
fn range(values: &[u32]) -> f64 {
    match (values.iter().max(), values.iter().min()) {
        (Some(&max), Some(&min)) => (max - min) as f64,
        _ => 0.0,
    }
}
