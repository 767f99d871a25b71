//! The `stabilize` subcommand: before-report, plan, apply, after-report.
//!
//! The before and after reports come from two separate snapshots; the plan
//! is computed from the first one, so the actions are justified by exactly
//! the state the before-report shows.

use std::path::Path;

use anyhow::Context;

use callgrid_metrics::{ObservationWindow, take_snapshot};
use callgrid_stabilize::{apply, plan};
use callgrid_state::CallStore;

use super::report::print_metrics;

pub fn run(db: &Path, window_hours: f64, sla_threshold: f64, dry_run: bool) -> anyhow::Result<()> {
    super::check_window_hours(window_hours)?;
    let store = CallStore::open(db).with_context(|| format!("opening {}", db.display()))?;
    let window = ObservationWindow::whole_log(window_hours);

    let before = take_snapshot(&store, &window).context("capturing load snapshot")?;
    if before.classes.is_empty() {
        println!("No configured skill classes. Run `callgrid seed` first.");
        return Ok(());
    }

    println!("=== Metrics before stabilization ===");
    print_metrics(&before, sla_threshold);

    let actions = plan(&before);
    if actions.is_empty() {
        println!("\nAll skill classes are stable; nothing to do.");
        return Ok(());
    }

    println!("\n=== Stabilization plan ===");
    for action in &actions {
        let skill_name = before
            .classes
            .iter()
            .find(|c| c.skill_id == action.skill_id)
            .map(|c| c.skill_name.as_str())
            .unwrap_or("?");
        println!(
            "  hire '{}' (id {}) for {}",
            action.agent_name, action.agent_id, skill_name
        );
    }

    if dry_run {
        println!("\nDry run: {} hires not applied.", actions.len());
        return Ok(());
    }

    let hired = apply(&store, &actions).context("applying stabilization plan")?;
    println!("\nHired {hired} relief agents.");

    let after = take_snapshot(&store, &window).context("capturing post-apply snapshot")?;
    println!("\n=== Metrics after stabilization ===");
    print_metrics(&after, sla_threshold);
    Ok(())
}
