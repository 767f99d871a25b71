//! The `report` subcommand: one snapshot, one metrics table.

use std::path::Path;

use anyhow::Context;
use tracing::warn;

use callgrid_metrics::{LoadSnapshot, ObservationWindow, compute_metrics, take_snapshot};
use callgrid_state::CallStore;

pub fn run(db: &Path, window_hours: f64, sla_threshold: f64) -> anyhow::Result<()> {
    super::check_window_hours(window_hours)?;
    let store = CallStore::open(db).with_context(|| format!("opening {}", db.display()))?;
    let snapshot = take_snapshot(&store, &ObservationWindow::whole_log(window_hours))
        .context("capturing load snapshot")?;

    if snapshot.classes.is_empty() {
        println!("No configured skill classes. Run `callgrid seed` first.");
        return Ok(());
    }

    print_metrics(&snapshot, sla_threshold);
    Ok(())
}

/// Print per-class metrics for a snapshot.
///
/// Rates are per hour, so the engine's waits come back in hours; they are
/// shown in minutes. All rounding happens here, never in the engine, so
/// chained quantities (Wq from Lq, L from W) stay consistent. Infinite
/// sentinels format as `inf`.
pub fn print_metrics(snapshot: &LoadSnapshot, sla_threshold_minutes: f64) {
    for class in &snapshot.classes {
        let metrics = match compute_metrics(
            class.lambda,
            class.mu,
            class.servers,
            sla_threshold_minutes / 60.0,
        ) {
            Ok(m) => m,
            Err(e) => {
                // A bad parameter row only loses this class's report.
                warn!(skill_id = class.skill_id, error = %e, "metrics skipped");
                println!("\n--- {} ---\n  <invalid parameters: {e}>", class.skill_name);
                continue;
            }
        };

        println!("\n--- {} ---", class.skill_name);
        println!("  λ (observed/h): {:.2}", class.lambda);
        println!("  μ (per agent/h): {:.2}", class.mu);
        println!("  agents: {}", class.servers);
        println!("  ρ (utilization): {:.4}", metrics.utilization);
        println!("  P0 (idle prob.): {:.4}", metrics.idle_probability);
        println!("  Lq (in queue): {:.2}", metrics.queue_length);
        println!("  Wq (min): {:.2}", metrics.queue_wait * 60.0);
        println!("  W (min): {:.2}", metrics.total_wait * 60.0);
        println!("  L (in system): {:.2}", metrics.system_length);
        println!(
            "  SLA breached: {}",
            if metrics.sla_breached { "yes" } else { "no" }
        );
    }
}
