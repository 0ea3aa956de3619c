//! Configuration types for the schedule search
//!
//! Level 4 - Utilities and configuration

/// How the imbalance of a schedule is turned into a single cost
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CostPolicy {
    /// Sum of population variances, game/team matrix weighted x20
    Variance,
    /// Sum of max-min spreads, game/team matrix weighted x40
    Range,
}

impl Default for CostPolicy {
    fn default() -> Self {
        CostPolicy::Variance
    }
}

impl CostPolicy {
    /// Weight of the game x team statistic relative to the other three
    pub fn game_team_weight(&self) -> f64 {
        match self {
            CostPolicy::Variance => 20.0,
            CostPolicy::Range => 40.0,
        }
    }

    /// Attempt budget this policy is normally run with
    pub fn default_iterations(&self) -> u64 {
        match self {
            CostPolicy::Variance => 1_000_000,
            CostPolicy::Range => 10_000,
        }
    }
}

impl std::str::FromStr for CostPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "variance" | "var" => Ok(CostPolicy::Variance),
            "range" => Ok(CostPolicy::Range),
            other => Err(format!("unknown cost policy: {}", other)),
        }
    }
}

impl std::fmt::Display for CostPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostPolicy::Variance => write!(f, "variance"),
            CostPolicy::Range => write!(f, "range"),
        }
    }
}

/// Which pairs the matchup statistic is computed over
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchupUniverse {
    /// Only cross-group pairs, i.e. pairs that can actually be scheduled
    Admissible,
    /// Every pair of distinct teams; same-group pairs stay at zero
    AllPairs,
}

impl Default for MatchupUniverse {
    fn default() -> Self {
        MatchupUniverse::Admissible
    }
}

/// Search configuration
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Number of candidates generated after the initial one
    pub iterations: u64,
    /// Cost policy
    pub policy: CostPolicy,
    /// Costs at or below this end the search early
    pub epsilon: f64,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// Attempts between progress reports and cancellation checks
    pub progress_interval: u64,
    /// Whether to spread attempts over a rayon thread pool
    pub parallel: bool,
    /// Number of chunks per progress interval in parallel mode; 0 uses the
    /// rayon pool size
    pub workers: usize,
    /// Pairs covered by the matchup statistic
    pub matchups: MatchupUniverse,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::for_policy(CostPolicy::default())
    }
}

impl SearchConfig {
    /// Config using the policy's default budget
    pub fn for_policy(policy: CostPolicy) -> Self {
        Self {
            iterations: policy.default_iterations(),
            policy,
            epsilon: 0.01,
            seed: None,
            progress_interval: 1000,
            parallel: false,
            workers: 0,
            matchups: MatchupUniverse::default(),
        }
    }

    /// Set the attempt budget
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable parallel search with the given worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.parallel = true;
        self.workers = workers;
        self
    }

    /// Set the matchup universe
    pub fn with_matchups(mut self, matchups: MatchupUniverse) -> Self {
        self.matchups = matchups;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_config_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.policy, CostPolicy::Variance);
        assert_eq!(config.iterations, 1_000_000);
        assert_eq!(config.progress_interval, 1000);
        assert_eq!(config.matchups, MatchupUniverse::Admissible);
        assert!(!config.parallel);
        assert_eq!(config.workers, 0);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_range_policy_budget() {
        let config = SearchConfig::for_policy(CostPolicy::Range);
        assert_eq!(config.iterations, 10_000);
        assert_eq!(config.policy.game_team_weight(), 40.0);
    }

    #[test]
    fn test_builders() {
        let config = SearchConfig::default()
            .with_iterations(50)
            .with_seed(7)
            .with_workers(3)
            .with_matchups(MatchupUniverse::AllPairs);
        assert_eq!(config.iterations, 50);
        assert_eq!(config.seed, Some(7));
        assert!(config.parallel);
        assert_eq!(config.workers, 3);
        assert_eq!(config.matchups, MatchupUniverse::AllPairs);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Variance".parse::<CostPolicy>(), Ok(CostPolicy::Variance));
        assert_eq!("range".parse::<CostPolicy>(), Ok(CostPolicy::Range));
        assert!("median".parse::<CostPolicy>().is_err());
        assert_eq!(CostPolicy::Range.to_string(), "range");
    }
}
