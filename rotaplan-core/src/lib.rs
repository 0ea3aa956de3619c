//! Rotaplan Core - Teams, pairs and schedules
//!
//! This crate provides the data model of the round planner:
//! - Plan input (groups of teams, game stations, number of rounds)
//! - Team registry with dense zero-based team ids
//! - Catalog of admissible cross-group pairs
//! - Rounds, fixtures and schedules
//! - Matchup / game / game-per-team statistics
//! - Named result tables for presentation and export layers

pub mod error;
pub mod pairs;
pub mod plan;
pub mod registry;
pub mod report;
pub mod schedule;
pub mod stats;

// Re-exports for convenient access
pub use error::PlanError;
pub use pairs::{Pair, PairCatalog};
pub use plan::{GroupSpec, Plan};
pub use registry::{GroupId, Team, TeamId, TeamRegistry};
pub use report::{Cell, Report, Table, TableRow};
pub use schedule::{Fixture, GameSlot, Round, Schedule};
pub use stats::{GameCounts, GameTeamCounts, MatchupCounts, ScheduleStats};
