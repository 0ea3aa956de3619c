//! Team registry - flattens the group hierarchy into dense team ids
//!
//! The registry is rebuilt from scratch whenever the group list changes;
//! it is never edited in place, so a `TeamId` is only meaningful for the
//! registry that issued it.

use rustc_hash::FxHashSet;

use crate::error::PlanError;
use crate::pairs::Pair;
use crate::plan::GroupSpec;

/// Dense, zero-based team index
pub type TeamId = usize;

/// Index of a group in the input order
pub type GroupId = usize;

/// A schedulable team
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    pub group: GroupId,
    pub group_name: String,
    pub name: String,
}

impl Team {
    /// `"<group>.<team>"`
    pub fn display_name(&self) -> String {
        format!("{}.{}", self.group_name, self.name)
    }
}

/// All teams of a plan, numbered in input order
#[derive(Clone, Debug)]
pub struct TeamRegistry {
    teams: Vec<Team>,
    group_names: Vec<String>,
    /// Team ids per group, indexed by `GroupId`
    members: Vec<Vec<TeamId>>,
}

impl TeamRegistry {
    /// Build the registry, numbering teams group by group
    pub fn build(groups: &[GroupSpec]) -> Result<Self, PlanError> {
        validate_groups(groups)?;

        let mut teams = Vec::new();
        let mut members = Vec::with_capacity(groups.len());

        for (group_id, group) in groups.iter().enumerate() {
            let mut ids = Vec::with_capacity(group.teams.len());
            for team_name in &group.teams {
                let id = teams.len();
                teams.push(Team {
                    id,
                    group: group_id,
                    group_name: group.name.clone(),
                    name: team_name.clone(),
                });
                ids.push(id);
            }
            members.push(ids);
        }

        Ok(Self {
            teams,
            group_names: groups.iter().map(|g| g.name.clone()).collect(),
            members,
        })
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn n_groups(&self) -> usize {
        self.members.len()
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id)
    }

    pub fn group_name(&self, group: GroupId) -> Option<&str> {
        self.group_names.get(group).map(String::as_str)
    }

    /// Team ids of every group, in group order
    pub fn groups(&self) -> &[Vec<TeamId>] {
        &self.members
    }

    /// Team ids belonging to the named group (empty if unknown)
    pub fn teams_in_group(&self, group_name: &str) -> &[TeamId] {
        self.group_names
            .iter()
            .position(|name| name == group_name)
            .map(|g| self.members[g].as_slice())
            .unwrap_or(&[])
    }

    pub fn group_of(&self, id: TeamId) -> Option<GroupId> {
        self.teams.get(id).map(|t| t.group)
    }

    /// Display name of a team; ids this registry never issued render as `Team <id>`
    pub fn display_name(&self, id: TeamId) -> String {
        self.teams
            .get(id)
            .map(Team::display_name)
            .unwrap_or_else(|| format!("Team {}", id))
    }

    /// Whether two teams may be paired (different groups)
    pub fn is_admissible(&self, a: TeamId, b: TeamId) -> bool {
        match (self.group_of(a), self.group_of(b)) {
            (Some(ga), Some(gb)) => ga != gb,
            _ => false,
        }
    }

    /// Every unordered pair of distinct teams, same-group pairs included
    pub fn all_pairs(&self) -> Vec<Pair> {
        let n = self.teams.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for a in 0..n {
            for b in (a + 1)..n {
                pairs.push(Pair::new(a, b));
            }
        }
        pairs
    }
}

fn validate_groups(groups: &[GroupSpec]) -> Result<(), PlanError> {
    if groups.is_empty() {
        return Err(PlanError::NoGroups);
    }

    let mut seen_groups = FxHashSet::default();
    for (i, group) in groups.iter().enumerate() {
        if group.name.is_empty() {
            return Err(PlanError::EmptyGroupName(i));
        }
        if !seen_groups.insert(group.name.as_str()) {
            return Err(PlanError::DuplicateGroup(group.name.clone()));
        }
        let mut seen_teams = FxHashSet::default();
        for team in &group.teams {
            if !seen_teams.insert(team.as_str()) {
                return Err(PlanError::DuplicateTeam {
                    group: group.name.clone(),
                    team: team.clone(),
                });
            }
        }
    }

    let total: usize = groups.iter().map(GroupSpec::len).sum();
    if total < 2 {
        return Err(PlanError::TooFewTeams(total));
    }

    let non_empty = groups.iter().filter(|g| !g.is_empty()).count();
    if non_empty < 2 {
        return Err(PlanError::TooFewGroups(non_empty));
    }

    Ok(())
}
