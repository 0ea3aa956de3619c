//! Integration tests for the rotaplan scheduler
//!
//! Tests the full stack: plan files, team registry, schedule search and report tables

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rotaplan_core::{Cell, GroupSpec, PairCatalog, Plan, Report, TeamRegistry};
use rotaplan_search::{CostPolicy, Scheduler, SearchConfig, Termination};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn camp_plan() -> Plan {
    Plan::new(
        vec![
            GroupSpec::new("Foxes", ["1", "2", "3", "4"]),
            GroupSpec::new("Owls", ["1", "2", "3"]),
            GroupSpec::new("Otters", ["1", "2", "3"]),
        ],
        vec![
            "Tug of War".to_string(),
            "Relay".to_string(),
            "Sack Race".to_string(),
            "Treasure Hunt".to_string(),
        ],
        9,
    )
}

fn temp_plan_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("rotaplan_it_{}_{}.json", name, std::process::id()))
}

// ============================================================================
// PLAN FILES
// ============================================================================

#[test]
fn test_plan_file_roundtrip_and_search() {
    let path = temp_plan_path("camp");
    camp_plan().save(&path).unwrap();

    let plan = Plan::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(plan, camp_plan());

    let config = SearchConfig::default().with_iterations(200).with_seed(42);
    let scheduler = Scheduler::new(&plan, config).unwrap();
    let outcome = scheduler.run();

    assert_eq!(outcome.schedule.len(), 9);
    assert!(outcome.cost <= outcome.initial_cost);
}

#[test]
fn test_plan_file_with_numbered_groups() {
    let path = temp_plan_path("numbered");
    std::fs::write(
        &path,
        r#"{"groups":[{"name":"A","teams":["0","1"]},{"name":"B","teams":["0","1"]}],"games":["0","1"],"rounds":4}"#,
    )
    .unwrap();

    let plan = Plan::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(plan.groups[0], GroupSpec::numbered("A", 2));
    assert_eq!(plan.n_games(), 2);
}

#[test]
fn test_invalid_plan_file_is_rejected() {
    let path = temp_plan_path("invalid");
    std::fs::write(&path, r#"{"groups":[{"name":"A","teams":["0","1"]}],"games":["0"],"rounds":2}"#).unwrap();

    let result = Plan::load(&path);
    std::fs::remove_file(&path).ok();

    assert!(result.is_err());
}

// ============================================================================
// FULL PIPELINE
// ============================================================================

#[test]
fn test_report_uses_display_names() {
    let plan = camp_plan();
    let config = SearchConfig::for_policy(CostPolicy::Range).with_iterations(100).with_seed(3);
    let scheduler = Scheduler::new(&plan, config).unwrap();
    let outcome = scheduler.run();
    let report = scheduler.report(&outcome);

    assert_eq!(report.schedule.columns, plan.games);
    assert_eq!(report.schedule.rows[0].label, "Round 1");
    for row in &report.schedule.rows {
        for cell in &row.cells {
            if let Cell::Text(text) = cell {
                if !text.is_empty() {
                    assert!(text.contains(" vs "), "unexpected cell {:?}", text);
                    assert!(text.contains("Foxes.") || text.contains("Owls.") || text.contains("Otters."));
                }
            }
        }
    }
    assert!(report.game_team_counts.columns.contains(&"Owls.2".to_string()));

    let json = serde_json::to_string(&report).unwrap();
    let back: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn test_game_counts_table_matches_stats() {
    let plan = camp_plan();
    let config = SearchConfig::default().with_iterations(100).with_seed(9);
    let scheduler = Scheduler::new(&plan, config).unwrap();
    let outcome = scheduler.run();
    let report = scheduler.report(&outcome);

    for (game, name) in plan.games.iter().enumerate() {
        let row = report.game_counts.row(name).unwrap();
        assert_eq!(row.cells, vec![Cell::Count(outcome.stats.games.get(game))]);
    }
}

#[test]
fn test_builder_candidate_matches_search_shape() {
    let plan = camp_plan();
    let registry = TeamRegistry::build(&plan.groups).unwrap();
    let catalog = PairCatalog::build(&registry);
    let scheduler = Scheduler::new(&plan, SearchConfig::default().with_seed(1)).unwrap();

    assert_eq!(scheduler.catalog().pairs(), catalog.pairs());

    let builder = scheduler.builder();
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let schedule = builder.build(&mut rng);

    // 10 teams on 4 games
    assert_eq!(builder.capacity(), 4);
    assert_eq!(schedule.len(), 9);
    for round in schedule.rounds() {
        assert!(!round.is_empty() && round.len() <= 4);
        for f in round.fixtures() {
            assert!(registry.is_admissible(f.team_a, f.team_b));
        }
    }
}

#[test]
fn test_parallel_and_sequential_both_finish() {
    let plan = camp_plan();
    let seq = Scheduler::new(&plan, SearchConfig::default().with_iterations(400).with_seed(2))
        .unwrap()
        .run();
    let par = Scheduler::new(
        &plan,
        SearchConfig::default().with_iterations(400).with_seed(2).with_workers(4),
    )
    .unwrap()
    .run();

    assert_eq!(seq.termination, Termination::Exhausted);
    assert_eq!(par.termination, Termination::Exhausted);
    assert_eq!(seq.attempts, 400);
    assert_eq!(par.attempts, 400);
}
