//! Input validation errors

/// Reasons a plan cannot be scheduled
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("plan has no groups")]
    NoGroups,

    #[error("plan needs at least two teams, found {0}")]
    TooFewTeams(usize),

    #[error("teams must come from at least two different groups, found {0} non-empty group(s)")]
    TooFewGroups(usize),

    #[error("plan needs at least one game")]
    NoGames,

    #[error("plan needs at least one round")]
    NoRounds,

    #[error("group name must not be empty (group #{0})")]
    EmptyGroupName(usize),

    #[error("duplicate group name: {0}")]
    DuplicateGroup(String),

    #[error("duplicate team name {team:?} in group {group:?}")]
    DuplicateTeam { group: String, team: String },

    #[error("game name must not be empty (game #{0})")]
    EmptyGameName(usize),

    #[error("duplicate game name: {0}")]
    DuplicateGame(String),
}
