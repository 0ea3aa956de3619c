//! Named result tables
//!
//! Every raw id is resolved to a display name here, so a presentation or
//! export layer (terminal, grid widget, spreadsheet writer) can render the
//! tables without knowing about team ids or game slots.

use serde::{Deserialize, Serialize};

use crate::registry::TeamRegistry;
use crate::schedule::Schedule;
use crate::stats::ScheduleStats;

/// A single table cell
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Count(u32),
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(text) => f.pad(text),
            Cell::Count(count) => f.pad(&count.to_string()),
        }
    }
}

/// One labelled row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub label: String,
    pub cells: Vec<Cell>,
}

/// A named table: one sheet of an export
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    /// Header of the label column
    pub label_header: String,
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Table {
    fn new(name: &str, label_header: &str, columns: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            label_header: label_header.to_string(),
            columns,
            rows: Vec::new(),
        }
    }

    fn push(&mut self, label: String, cells: Vec<Cell>) {
        self.rows.push(TableRow { label, cells });
    }

    pub fn row(&self, label: &str) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}

/// The four result tables of a schedule
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Rounds x games, cells `"<team> vs <team>"`, empty where a game is idle
    pub schedule: Table,
    pub game_counts: Table,
    pub matchups: Table,
    /// Games x teams
    pub game_team_counts: Table,
}

impl Report {
    pub fn build(
        registry: &TeamRegistry,
        game_names: &[String],
        schedule: &Schedule,
        stats: &ScheduleStats,
    ) -> Self {
        Self {
            schedule: schedule_table(registry, game_names, schedule),
            game_counts: game_count_table(game_names, stats),
            matchups: matchup_table(registry, stats),
            game_team_counts: game_team_table(registry, game_names, stats),
        }
    }

    /// Tables in sheet order
    pub fn tables(&self) -> [&Table; 4] {
        [&self.schedule, &self.game_counts, &self.matchups, &self.game_team_counts]
    }
}

fn game_name(game_names: &[String], game: usize) -> String {
    game_names
        .get(game)
        .cloned()
        .unwrap_or_else(|| format!("Game {}", game + 1))
}

fn schedule_table(registry: &TeamRegistry, game_names: &[String], schedule: &Schedule) -> Table {
    let mut table = Table::new("Schedule", "Round", game_names.to_vec());

    for (i, round) in schedule.rounds().iter().enumerate() {
        let cells = (0..game_names.len())
            .map(|game| match round.fixture_at(game) {
                Some(f) => Cell::Text(format!(
                    "{} vs {}",
                    registry.display_name(f.team_a),
                    registry.display_name(f.team_b)
                )),
                None => Cell::Text(String::new()),
            })
            .collect();
        table.push(format!("Round {}", i + 1), cells);
    }

    table
}

fn game_count_table(game_names: &[String], stats: &ScheduleStats) -> Table {
    let mut table = Table::new("Game Counts", "Game", vec!["Count".to_string()]);
    for (game, &count) in stats.games.counts().iter().enumerate() {
        table.push(game_name(game_names, game), vec![Cell::Count(count)]);
    }
    table
}

fn matchup_table(registry: &TeamRegistry, stats: &ScheduleStats) -> Table {
    let mut table = Table::new(
        "Team Matchups",
        "Team 1",
        vec!["Team 2".to_string(), "Count".to_string()],
    );
    for (pair, count) in stats.matchups.iter() {
        table.push(
            registry.display_name(pair.a()),
            vec![Cell::Text(registry.display_name(pair.b())), Cell::Count(count)],
        );
    }
    table
}

fn game_team_table(registry: &TeamRegistry, game_names: &[String], stats: &ScheduleStats) -> Table {
    let columns = (0..stats.game_teams.n_teams())
        .map(|t| registry.display_name(t))
        .collect();
    let mut table = Table::new("Game Team Counts", "Game", columns);
    for game in 0..stats.game_teams.n_games() {
        let cells = stats.game_teams.row(game).iter().map(|&c| Cell::Count(c)).collect();
        table.push(game_name(game_names, game), cells);
    }
    table
}
