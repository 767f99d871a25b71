//! The `seed` subcommand.

use std::path::Path;

use anyhow::Context;

use callgrid_seed::{SeedConfig, seed_store};
use callgrid_state::CallStore;

pub fn run(
    db: &Path,
    seed: u64,
    days: u32,
    hours: u32,
    calls_per_minute: u32,
) -> anyhow::Result<()> {
    let store = CallStore::open(db).with_context(|| format!("opening {}", db.display()))?;
    let config = SeedConfig {
        seed,
        days,
        hours_per_day: hours,
        calls_per_minute,
        ..SeedConfig::default()
    };
    let summary = seed_store(&store, &config).context("seeding store")?;

    println!(
        "Seeded {} skills, {} agents, {} calls over {} business hours (seed {}).",
        summary.skills,
        summary.agents,
        summary.calls,
        config.business_hours(),
        seed,
    );
    println!(
        "Report with: callgrid report --db {} --window-hours {}",
        db.display(),
        config.business_hours(),
    );
    Ok(())
}
