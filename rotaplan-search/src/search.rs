//! Schedule search - randomized restarts keeping the best candidate
//!
//! Level 1 - Orchestration and Level 2 - Phases
//!
//! The loop moves through three phases: `Init` builds and scores a first
//! candidate, `Searching` generates further independent candidates in
//! batches of `progress_interval`, and `Done` hands back the best one.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use rotaplan_core::{PairCatalog, Plan, Report, Schedule, ScheduleStats, TeamRegistry};

use crate::builder::ScheduleBuilder;
use crate::config::{MatchupUniverse, SearchConfig};
use crate::cost::{CostEvaluator, Evaluation};
use crate::error::SearchError;
use crate::progress::{CancelToken, NoProgress, ProgressError, ProgressReporter, ProgressSink};

/// Why the search stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Best cost dropped to epsilon or below
    Perfect,
    /// Attempt budget used up
    Exhausted,
    /// Cancel token was set
    Cancelled,
}

/// A new best candidate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Improvement {
    /// Attempt that found it; 0 is the initial candidate
    pub attempt: u64,
    pub cost: f64,
}

/// Result of a search
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Best schedule found, never merely the last one tried
    pub schedule: Schedule,
    pub stats: ScheduleStats,
    pub cost: f64,
    /// Cost of the initial candidate
    pub initial_cost: f64,
    /// Candidates generated after the initial one
    pub attempts: u64,
    /// Every improvement in order, starting with the initial candidate
    pub improvements: Vec<Improvement>,
    pub termination: Termination,
    /// First failure of the progress sink, if any
    pub progress_error: Option<ProgressError>,
}

impl SearchOutcome {
    pub fn is_perfect(&self) -> bool {
        self.termination == Termination::Perfect
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Init,
    Searching,
    Done(Termination),
}

#[derive(Clone, Debug)]
struct Candidate {
    schedule: Schedule,
    evaluation: Evaluation,
}

impl Candidate {
    fn cost(&self) -> f64 {
        self.evaluation.cost
    }
}

/// Best-so-far slot plus bookkeeping; owned by the loop thread only
struct SearchState {
    best: Candidate,
    initial_cost: f64,
    attempts: u64,
    improvements: Vec<Improvement>,
}

impl SearchState {
    fn new(first: Candidate) -> Self {
        let cost = first.cost();
        Self {
            best: first,
            initial_cost: cost,
            attempts: 0,
            improvements: vec![Improvement { attempt: 0, cost }],
        }
    }

    /// Keep `candidate` if strictly better; returns whether it was kept
    fn offer(&mut self, candidate: Candidate, attempt: u64) -> bool {
        if candidate.cost() < self.best.cost() {
            tracing::debug!(
                "New best schedule found after {} attempts with cost {:.4}",
                attempt,
                candidate.cost()
            );
            self.improvements.push(Improvement { attempt, cost: candidate.cost() });
            self.best = candidate;
            true
        } else {
            false
        }
    }

    fn into_outcome(self, termination: Termination, progress_error: Option<ProgressError>) -> SearchOutcome {
        SearchOutcome {
            schedule: self.best.schedule,
            stats: self.best.evaluation.stats,
            cost: self.best.evaluation.cost,
            initial_cost: self.initial_cost,
            attempts: self.attempts,
            improvements: self.improvements,
            termination,
            progress_error,
        }
    }
}

/// Best candidate of one parallel chunk
struct ChunkResult {
    attempts: u64,
    /// Candidate and its attempt number within the chunk
    best: Option<(Candidate, u64)>,
}

/// Everything needed to search schedules for one plan
#[derive(Debug)]
pub struct Scheduler {
    registry: TeamRegistry,
    catalog: PairCatalog,
    game_names: Vec<String>,
    n_rounds: usize,
    evaluator: CostEvaluator,
    config: SearchConfig,
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

impl Scheduler {
    /// Validate the plan and configuration and prepare the session
    pub fn new(plan: &Plan, config: SearchConfig) -> Result<Self, SearchError> {
        plan.validate()?;
        validate_config(&config)?;

        let registry = TeamRegistry::build(&plan.groups)?;
        let catalog = PairCatalog::build(&registry);
        let universe = match config.matchups {
            MatchupUniverse::Admissible => catalog.pairs().to_vec(),
            MatchupUniverse::AllPairs => registry.all_pairs(),
        };
        let evaluator = CostEvaluator::new(config.policy, universe, plan.n_games(), registry.len());

        Ok(Self {
            registry,
            catalog,
            game_names: plan.games.clone(),
            n_rounds: plan.rounds,
            evaluator,
            config,
        })
    }

    pub fn registry(&self) -> &TeamRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &PairCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &CostEvaluator {
        &self.evaluator
    }

    pub fn builder(&self) -> ScheduleBuilder<'_> {
        ScheduleBuilder::new(&self.catalog, self.registry.len(), self.game_names.len(), self.n_rounds)
    }

    /// Run without progress reporting or cancellation
    pub fn run(&self) -> SearchOutcome {
        self.run_with(&mut NoProgress, &CancelToken::new())
    }

    /// Run the search
    ///
    /// The sink receives 0 at the start, `floor(100 * attempts / budget)`
    /// after every `progress_interval` attempts and 100 at the end. The
    /// cancel token is polled at the same cadence; a cancelled search
    /// still returns the best candidate found so far.
    pub fn run_with<P: ProgressSink + ?Sized>(&self, progress: &mut P, cancel: &CancelToken) -> SearchOutcome {
        let mut rng = create_rng(self.config.seed);
        let mut reporter = ProgressReporter::new(progress);

        tracing::info!(
            "Starting search: teams={}, pairs={}, games={}, rounds={}, budget={}, policy={}",
            self.registry.len(),
            self.catalog.len(),
            self.game_names.len(),
            self.n_rounds,
            self.config.iterations,
            self.config.policy
        );

        reporter.report(0);
        let mut state = SearchState::new(self.attempt(&mut rng));
        let mut phase = Phase::Init;

        let termination = loop {
            phase = match phase {
                Phase::Init => {
                    if state.best.cost() <= self.config.epsilon {
                        Phase::Done(Termination::Perfect)
                    } else {
                        Phase::Searching
                    }
                }
                Phase::Searching => {
                    let next = self.run_batch(&mut state, &mut rng, cancel);
                    if next == Phase::Searching {
                        reporter.report(percent(state.attempts, self.config.iterations));
                    }
                    next
                }
                Phase::Done(termination) => break termination,
            };
        };

        reporter.report(100);

        self.log_finish(&state, termination);
        state.into_outcome(termination, reporter.into_error())
    }

    /// Build the named result tables for an outcome
    pub fn report(&self, outcome: &SearchOutcome) -> Report {
        Report::build(&self.registry, &self.game_names, &outcome.schedule, &outcome.stats)
    }
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

impl Scheduler {
    /// Run up to one progress interval of attempts
    fn run_batch(&self, state: &mut SearchState, rng: &mut ChaCha8Rng, cancel: &CancelToken) -> Phase {
        if cancel.is_cancelled() {
            return Phase::Done(Termination::Cancelled);
        }

        let remaining = self.config.iterations.saturating_sub(state.attempts);
        if remaining == 0 {
            return Phase::Done(Termination::Exhausted);
        }
        let batch = remaining.min(self.config.progress_interval);

        let perfect = if self.config.parallel {
            self.parallel_batch(state, rng, batch)
        } else {
            self.sequential_batch(state, rng, batch)
        };

        if perfect {
            tracing::info!("Found a perfect schedule after {} attempts", state.attempts);
            Phase::Done(Termination::Perfect)
        } else if state.attempts >= self.config.iterations {
            Phase::Done(Termination::Exhausted)
        } else {
            Phase::Searching
        }
    }

    /// Returns whether a perfect candidate was found
    fn sequential_batch(&self, state: &mut SearchState, rng: &mut ChaCha8Rng, batch: u64) -> bool {
        for _ in 0..batch {
            let candidate = self.attempt(rng);
            state.attempts += 1;
            let attempt = state.attempts;
            if state.offer(candidate, attempt) && state.best.cost() <= self.config.epsilon {
                return true;
            }
        }
        false
    }

    /// Split the batch into chunks, run them on the rayon pool and merge the
    /// chunk winners in chunk order
    fn parallel_batch(&self, state: &mut SearchState, rng: &mut ChaCha8Rng, batch: u64) -> bool {
        let workers = self.worker_count() as u64;
        let base = batch / workers;
        let extra = batch % workers;

        let chunks: Vec<(u64, u64)> = (0..workers)
            .map(|i| (rng.gen::<u64>(), base + u64::from(i < extra)))
            .filter(|&(_, size)| size > 0)
            .collect();

        let results: Vec<ChunkResult> = chunks
            .par_iter()
            .map(|&(seed, size)| self.run_chunk(seed, size))
            .collect();

        let mut perfect = false;
        for result in results {
            let offset = state.attempts;
            state.attempts += result.attempts;
            if perfect {
                continue;
            }
            if let Some((candidate, found_at)) = result.best {
                perfect = state.offer(candidate, offset + found_at) && state.best.cost() <= self.config.epsilon;
            }
        }
        perfect
    }
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

impl Scheduler {
    /// Build and score one independent candidate
    fn attempt<R: Rng + ?Sized>(&self, rng: &mut R) -> Candidate {
        let schedule = self.builder().build(rng);
        let evaluation = self.evaluator.evaluate(&schedule);
        Candidate { schedule, evaluation }
    }

    /// Configured chunk count, or the rayon pool size when unset
    fn worker_count(&self) -> usize {
        match self.config.workers {
            0 => rayon::current_num_threads().max(1),
            n => n,
        }
    }

    /// Sequential attempts with a private generator
    fn run_chunk(&self, seed: u64, size: u64) -> ChunkResult {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut best: Option<(Candidate, u64)> = None;
        let mut attempts = 0;

        for n in 1..=size {
            let candidate = self.attempt(&mut rng);
            attempts = n;
            let improved = best.as_ref().map_or(true, |(b, _)| candidate.cost() < b.cost());
            if improved {
                let perfect = candidate.cost() <= self.config.epsilon;
                best = Some((candidate, n));
                if perfect {
                    break;
                }
            }
        }

        ChunkResult { attempts, best }
    }

    fn log_finish(&self, state: &SearchState, termination: Termination) {
        match termination {
            Termination::Cancelled => tracing::info!(
                "Search cancelled after {} attempts, best cost {:.4}",
                state.attempts,
                state.best.cost()
            ),
            _ => tracing::info!(
                "Search finished ({:?}) after {} attempts, best cost {:.4}",
                termination,
                state.attempts,
                state.best.cost()
            ),
        }

        let stats = &state.best.evaluation.stats;
        for (pair, count) in stats.matchups.iter() {
            tracing::debug!(
                "Teams {} and {}: {} times",
                self.registry.display_name(pair.a()),
                self.registry.display_name(pair.b()),
                count
            );
        }
        for (game, count) in stats.games.counts().iter().enumerate() {
            tracing::debug!("Game {}: {} times", self.game_names[game], count);
        }
        for game in 0..stats.game_teams.n_games() {
            tracing::debug!("Game {} per team: {:?}", self.game_names[game], stats.game_teams.row(game));
        }
    }
}

// ============================================================================
// Level 4 - Utilities
// ============================================================================

fn validate_config(config: &SearchConfig) -> Result<(), SearchError> {
    if config.iterations == 0 {
        return Err(SearchError::ZeroIterations);
    }
    if config.progress_interval == 0 {
        return Err(SearchError::ZeroProgressInterval);
    }
    if config.epsilon.is_nan() || config.epsilon < 0.0 {
        return Err(SearchError::InvalidEpsilon(config.epsilon.to_string()));
    }
    Ok(())
}

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(done: u64, budget: u64) -> u8 {
    if budget == 0 {
        return 100;
    }
    (done.min(budget) * 100 / budget) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostPolicy;
    use rotaplan_core::GroupSpec;

    fn plan(sizes: &[usize], n_games: usize, rounds: usize) -> Plan {
        let groups = sizes
            .iter()
            .enumerate()
            .map(|(i, &n)| GroupSpec::numbered(format!("G{}", i), n))
            .collect();
        Plan::with_game_count(groups, n_games, rounds)
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 1000), 0);
        assert_eq!(percent(999, 1000), 99);
        assert_eq!(percent(1000, 1000), 100);
        assert_eq!(percent(5, 0), 100);
    }

    #[test]
    fn test_rejects_bad_config() {
        let p = plan(&[2, 2], 1, 2);
        let err = Scheduler::new(&p, SearchConfig::default().with_iterations(0)).unwrap_err();
        assert_eq!(err, SearchError::ZeroIterations);

        let mut config = SearchConfig::default();
        config.progress_interval = 0;
        assert_eq!(Scheduler::new(&p, config).unwrap_err(), SearchError::ZeroProgressInterval);

        let mut config = SearchConfig::default();
        config.epsilon = f64::NAN;
        assert!(matches!(Scheduler::new(&p, config), Err(SearchError::InvalidEpsilon(_))));
    }

    #[test]
    fn test_rejects_invalid_plan() {
        let p = plan(&[4], 2, 2);
        let err = Scheduler::new(&p, SearchConfig::default()).unwrap_err();
        assert_eq!(err, SearchError::Plan(rotaplan_core::PlanError::TooFewGroups(1)));
    }

    #[test]
    fn test_single_pair_is_perfect_immediately() {
        // 2 teams, 1 game: every candidate is the same perfect schedule
        let p = plan(&[1, 1], 1, 3);
        let scheduler = Scheduler::new(&p, SearchConfig::default().with_seed(1)).unwrap();

        let outcome = scheduler.run();

        assert_eq!(outcome.termination, Termination::Perfect);
        assert_eq!(outcome.attempts, 0);
        assert_eq!(outcome.cost, 0.0);
        assert_eq!(outcome.improvements.len(), 1);
    }

    #[test]
    fn test_state_keeps_strictly_better_only() {
        let p = plan(&[2, 2], 1, 2);
        let scheduler = Scheduler::new(&p, SearchConfig::default().with_seed(5)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let first = scheduler.attempt(&mut rng);
        let mut state = SearchState::new(first.clone());

        assert!(!state.offer(first.clone(), 1));
        assert_eq!(state.improvements.len(), 1);

        let mut better = first;
        better.evaluation.cost -= 0.5;
        assert!(state.offer(better, 2));
        assert_eq!(state.improvements.last().map(|i| i.attempt), Some(2));
    }

    #[test]
    fn test_worker_count_defaults_to_pool_size() {
        let p = plan(&[2, 2], 2, 4);

        let scheduler = Scheduler::new(&p, SearchConfig::default()).unwrap();
        assert_eq!(scheduler.worker_count(), rayon::current_num_threads().max(1));

        let scheduler = Scheduler::new(&p, SearchConfig::default().with_workers(3)).unwrap();
        assert_eq!(scheduler.worker_count(), 3);
    }

    #[test]
    fn test_parallel_without_worker_count_uses_pool() {
        let p = plan(&[3, 3, 2], 3, 6);
        let mut config = SearchConfig::default().with_iterations(50).with_seed(2);
        config.parallel = true;

        let outcome = Scheduler::new(&p, config).unwrap().run();
        assert_eq!(outcome.termination, Termination::Exhausted);
        assert_eq!(outcome.attempts, 50);
    }

    #[test]
    fn test_range_policy_runs() {
        let p = plan(&[2, 2], 2, 4);
        let config = SearchConfig::for_policy(CostPolicy::Range).with_seed(3);
        let outcome = Scheduler::new(&p, config).unwrap().run();
        assert_eq!(outcome.termination, Termination::Perfect);
        assert_eq!(outcome.cost, 0.0);
    }
}
