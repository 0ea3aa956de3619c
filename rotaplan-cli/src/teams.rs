//! Teams command - overview of groups, teams and admissible pairs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rotaplan_core::{PairCatalog, Plan, TeamRegistry};

#[derive(Args)]
pub struct TeamsArgs {
    /// Plan JSON file
    #[arg(long, value_name = "FILE")]
    pub plan: PathBuf,
}

pub fn run(args: TeamsArgs) -> Result<()> {
    let plan = Plan::load(&args.plan)
        .with_context(|| format!("Failed to load plan: {}", args.plan.display()))?;
    let registry = TeamRegistry::build(&plan.groups)?;
    let catalog = PairCatalog::build(&registry);

    println!("=== Teams ===");
    for (group, members) in registry.groups().iter().enumerate() {
        let names: Vec<String> = members.iter().map(|&id| registry.display_name(id)).collect();
        println!(
            "{:<12} {:>2} teams: {}",
            registry.group_name(group).unwrap_or("?"),
            members.len(),
            names.join(", ")
        );
    }

    // a round holds at most one fixture per game and per two teams
    let capacity = plan.n_games().min(registry.len() / 2);
    let rounds_per_cycle = if capacity == 0 { 0 } else { catalog.len().div_ceil(capacity) };

    println!("\n=== Plan ===");
    println!("Teams:            {}", registry.len());
    println!("Games:            {}", plan.games.join(", "));
    println!("Rounds:           {}", plan.rounds);
    println!("Admissible pairs: {}", catalog.len());
    println!("Fixtures/round:   {}", capacity);
    println!("Rounds to meet everyone once: at least {}", rounds_per_cycle);

    Ok(())
}
