//! Plan - what needs to be scheduled

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PlanError;
use crate::registry::TeamRegistry;

/// A top-level group and the names of its teams, in input order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    #[serde(default)]
    pub teams: Vec<String>,
}

impl GroupSpec {
    pub fn new(name: impl Into<String>, teams: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            teams: teams.into_iter().map(Into::into).collect(),
        }
    }

    /// Group whose teams are simply numbered `0..n_teams`
    pub fn numbered(name: impl Into<String>, n_teams: usize) -> Self {
        Self {
            name: name.into(),
            teams: (0..n_teams).map(|i| i.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Complete input for one scheduling session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub groups: Vec<GroupSpec>,
    /// Display names of the game stations; its length is the number of games
    pub games: Vec<String>,
    pub rounds: usize,
}

impl Plan {
    pub fn new(groups: Vec<GroupSpec>, games: Vec<String>, rounds: usize) -> Self {
        Self { groups, games, rounds }
    }

    /// Plan with `n_games` stations named by their index
    pub fn with_game_count(groups: Vec<GroupSpec>, n_games: usize, rounds: usize) -> Self {
        Self::new(groups, Self::default_game_names(n_games), rounds)
    }

    pub fn default_game_names(n_games: usize) -> Vec<String> {
        (0..n_games).map(|i| i.to_string()).collect()
    }

    pub fn n_games(&self) -> usize {
        self.games.len()
    }

    pub fn n_teams(&self) -> usize {
        self.groups.iter().map(GroupSpec::len).sum()
    }

    /// Check everything that must hold before a search may start
    pub fn validate(&self) -> Result<(), PlanError> {
        TeamRegistry::build(&self.groups)?;
        if self.games.is_empty() {
            return Err(PlanError::NoGames);
        }
        // game names key the report tables
        let mut seen = FxHashSet::default();
        for (i, game) in self.games.iter().enumerate() {
            if game.is_empty() {
                return Err(PlanError::EmptyGameName(i));
            }
            if !seen.insert(game.as_str()) {
                return Err(PlanError::DuplicateGame(game.clone()));
            }
        }
        if self.rounds == 0 {
            return Err(PlanError::NoRounds);
        }
        Ok(())
    }

    /// Load from JSON file and validate
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let plan: Plan = serde_json::from_str(&content)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_groups() -> Vec<GroupSpec> {
        vec![GroupSpec::numbered("A", 2), GroupSpec::numbered("B", 2)]
    }

    #[test]
    fn test_numbered_group() {
        let group = GroupSpec::numbered("7", 3);
        assert_eq!(group.name, "7");
        assert_eq!(group.teams, vec!["0", "1", "2"]);
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn test_with_game_count_names_games_by_index() {
        let plan = Plan::with_game_count(two_groups(), 3, 4);
        assert_eq!(plan.games, vec!["0", "1", "2"]);
        assert_eq!(plan.n_games(), 3);
        assert_eq!(plan.n_teams(), 4);
    }

    #[test]
    fn test_validate_accepts_valid_plan() {
        let plan = Plan::with_game_count(two_groups(), 2, 4);
        assert_eq!(plan.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_zero_games_and_rounds() {
        let plan = Plan::with_game_count(two_groups(), 0, 4);
        assert_eq!(plan.validate(), Err(PlanError::NoGames));

        let plan = Plan::with_game_count(two_groups(), 2, 0);
        assert_eq!(plan.validate(), Err(PlanError::NoRounds));
    }

    #[test]
    fn test_validate_rejects_unusable_game_names() {
        let games = vec!["Relay".to_string(), "Relay".to_string()];
        let plan = Plan::new(two_groups(), games, 4);
        assert_eq!(plan.validate(), Err(PlanError::DuplicateGame("Relay".to_string())));

        let games = vec!["Relay".to_string(), String::new()];
        let plan = Plan::new(two_groups(), games, 4);
        assert_eq!(plan.validate(), Err(PlanError::EmptyGameName(1)));
    }

    #[test]
    fn test_validate_rejects_single_group() {
        let plan = Plan::with_game_count(vec![GroupSpec::numbered("A", 4)], 2, 4);
        assert_eq!(plan.validate(), Err(PlanError::TooFewGroups(1)));
    }

    #[test]
    fn test_plan_json_roundtrip_through_file() {
        let plan = Plan::new(
            vec![GroupSpec::new("Eagles", ["Red", "Blue"]), GroupSpec::new("Owls", ["Green"])],
            vec!["Relay".to_string(), "Tug of war".to_string()],
            5,
        );
        let path = std::env::temp_dir().join(format!("rotaplan-plan-{}.json", std::process::id()));

        plan.save(&path).unwrap();
        let loaded = Plan::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, plan);
    }

    #[test]
    fn test_missing_teams_field_defaults_to_empty() {
        let plan: Plan =
            serde_json::from_str(r#"{"groups":[{"name":"A"}],"games":["x"],"rounds":1}"#).unwrap();
        assert!(plan.groups[0].is_empty());
        assert_eq!(plan.validate(), Err(PlanError::TooFewTeams(0)));
    }
}
