//! Rotaplan Search - schedule construction and fairness optimization
//!
//! This crate turns a validated plan into the fairest schedule it can find:
//! - Round-robin pair selection with a repeat fallback
//! - Random assignment of pairs to game stations
//! - Cost evaluation (variance or range policy)
//! - Randomized restart search keeping the best candidate
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: Scheduler::run (orchestration)
//! - Level 2: ScheduleBuilder::build, CostEvaluator::evaluate (phases)
//! - Level 3: RoundBuilder::next_round, GameAssigner::assign (steps)
//! - Level 4: configuration, progress and cancellation utilities

mod builder;
mod config;
mod cost;
mod error;
mod games;
mod progress;
mod round_robin;
mod search;

pub use builder::ScheduleBuilder;
pub use config::{CostPolicy, MatchupUniverse, SearchConfig};
pub use cost::{CostEvaluator, Evaluation};
pub use error::SearchError;
pub use games::GameAssigner;
pub use progress::{CancelToken, NoProgress, ProgressError, ProgressSink};
pub use round_robin::RoundBuilder;
pub use search::{Improvement, Scheduler, SearchOutcome, Termination};
