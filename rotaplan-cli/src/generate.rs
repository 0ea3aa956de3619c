//! Generate command - search a plan for its fairest schedule
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_plan(), build_config(), search(), report_results()
//! - Level 3: write_output(), BarSink
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use rotaplan_core::{Plan, Report, Table};
use rotaplan_search::{
    CancelToken, CostPolicy, MatchupUniverse, ProgressError, ProgressSink, Scheduler, SearchConfig,
    SearchOutcome, Termination,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct GenerateArgs {
    /// Plan JSON file (groups, games, rounds)
    #[arg(long, value_name = "FILE")]
    pub plan: PathBuf,

    /// Override the number of rounds in the plan
    #[arg(long)]
    pub rounds: Option<usize>,

    /// Attempt budget (default depends on the policy)
    #[arg(long)]
    pub iterations: Option<u64>,

    /// Cost policy: variance or range
    #[arg(long, default_value = "variance")]
    pub policy: CostPolicy,

    /// Spread attempts over all cores
    #[arg(long)]
    pub parallel: bool,

    /// Worker chunks per batch (implies --parallel)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Also count same-group pairs in the matchup balance
    #[arg(long)]
    pub all_pairs: bool,

    /// Write the full report as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run generate command
///
/// 1. Load the plan and apply overrides
/// 2. Search with progress bar and Ctrl-C cancellation
/// 3. Report results and optionally write the export file
pub fn run(args: GenerateArgs, seed: Option<u64>) -> Result<()> {
    let plan = load_plan(&args)?;
    let config = build_config(&args, seed);

    tracing::info!(
        "Scheduling {} teams in {} groups on {} games over {} rounds",
        plan.n_teams(),
        plan.groups.len(),
        plan.n_games(),
        plan.rounds
    );

    let scheduler = Scheduler::new(&plan, config).context("Cannot schedule this plan")?;
    let outcome = search(&scheduler)?;
    let report = scheduler.report(&outcome);

    report_results(&outcome, &report, &args);

    if let Some(path) = &args.output {
        write_output(path, &args.plan, &scheduler, &outcome, &report)?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_plan(args: &GenerateArgs) -> Result<Plan> {
    let mut plan = Plan::load(&args.plan)
        .with_context(|| format!("Failed to load plan: {}", args.plan.display()))?;

    if let Some(rounds) = args.rounds {
        plan.rounds = rounds;
        plan.validate()
            .with_context(|| format!("Invalid round override: {}", rounds))?;
    }

    Ok(plan)
}

fn build_config(args: &GenerateArgs, seed: Option<u64>) -> SearchConfig {
    let mut config = SearchConfig::for_policy(args.policy);

    if let Some(iterations) = args.iterations {
        config = config.with_iterations(iterations);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    if args.parallel {
        config.parallel = true;
    }
    if args.all_pairs {
        config = config.with_matchups(MatchupUniverse::AllPairs);
    }

    config
}

/// Run the search with a progress bar; Ctrl-C stops it early
fn search(scheduler: &Scheduler) -> Result<SearchOutcome> {
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        tracing::info!("Received SIGINT, keeping best schedule so far...");
        handler_token.cancel();
    })
    .context("Failed to install Ctrl-C handler")?;

    let mut sink = BarSink::new()?;
    let outcome = scheduler.run_with(&mut sink, &cancel);
    sink.finish();

    if let Some(err) = &outcome.progress_error {
        tracing::warn!("Progress display stopped early: {}", err);
    }
    if outcome.termination == Termination::Cancelled {
        tracing::warn!("Search cancelled after {} attempts", outcome.attempts);
    }

    Ok(outcome)
}

fn report_results(outcome: &SearchOutcome, report: &Report, args: &GenerateArgs) {
    if args.json {
        print_json_results(outcome, report);
    } else {
        print_text_results(outcome, report);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Progress sink drawing an indicatif bar on stderr
struct BarSink {
    bar: ProgressBar,
}

impl BarSink {
    fn new() -> Result<Self> {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} Searching [{bar:40.cyan/blue}] {pos:>3}% ({elapsed})")
                .context("Invalid progress template")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for BarSink {
    fn update(&mut self, percent: u8) -> Result<(), ProgressError> {
        if self.bar.is_finished() {
            return Err(ProgressError("progress bar already closed".to_string()));
        }
        self.bar.set_position(u64::from(percent));
        Ok(())
    }
}

/// Write the export file: metadata plus all four tables
fn write_output(
    path: &Path,
    plan_path: &Path,
    scheduler: &Scheduler,
    outcome: &SearchOutcome,
    report: &Report,
) -> Result<()> {
    #[derive(serde::Serialize)]
    struct Export<'a> {
        generated_at: String,
        plan: String,
        policy: String,
        seed: Option<u64>,
        cost: f64,
        attempts: u64,
        termination: String,
        schedule: &'a rotaplan_core::Schedule,
        tables: &'a Report,
    }

    let config = scheduler.config();
    let export = Export {
        generated_at: chrono::Local::now().to_rfc3339(),
        plan: plan_path.display().to_string(),
        policy: config.policy.to_string(),
        seed: config.seed,
        cost: outcome.cost,
        attempts: outcome.attempts,
        termination: format!("{:?}", outcome.termination),
        schedule: &outcome.schedule,
        tables: report,
    };

    let content = serde_json::to_string_pretty(&export)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Print results as JSON
fn print_json_results(outcome: &SearchOutcome, report: &Report) {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        cost: f64,
        initial_cost: f64,
        attempts: u64,
        improvements: usize,
        termination: String,
        tables: &'a Report,
    }

    let output = JsonOutput {
        cost: outcome.cost,
        initial_cost: outcome.initial_cost,
        attempts: outcome.attempts,
        improvements: outcome.improvements.len(),
        termination: format!("{:?}", outcome.termination),
        tables: report,
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(outcome: &SearchOutcome, report: &Report) {
    for table in report.tables() {
        print_table(table);
    }

    println!("\n=== Search ===");
    println!("Attempts:     {}", outcome.attempts);
    println!("Initial cost: {:.4}", outcome.initial_cost);
    println!("Best cost:    {:.4}", outcome.cost);
    println!("Improvements: {}", outcome.improvements.len());
    println!("Stopped:      {:?}", outcome.termination);
}

fn print_table(table: &Table) {
    let label_width = table
        .rows
        .iter()
        .map(|r| r.label.len())
        .chain(std::iter::once(table.label_header.len()))
        .max()
        .unwrap_or(0);

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            table
                .rows
                .iter()
                .filter_map(|r| r.cells.get(i))
                .map(|c| c.to_string().len())
                .chain(std::iter::once(name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    println!("\n=== {} ===", table.name);

    let mut header = format!("{:<w$}", table.label_header, w = label_width);
    for (name, w) in table.columns.iter().zip(&widths) {
        header.push_str(&format!(" | {:<w$}", name, w = *w));
    }
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));

    for row in &table.rows {
        let mut line = format!("{:<w$}", row.label, w = label_width);
        for (cell, w) in row.cells.iter().zip(&widths) {
            line.push_str(&format!(" | {:<w$}", cell, w = *w));
        }
        println!("{}", line);
    }
}
