//! Deterministic call-log generator.

use std::collections::HashMap;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use callgrid_state::{
    Agent, CallRecord, CallStore, SkillClass, SkillId, StoreResult, SystemParameters,
};

/// 2025-01-01 09:00:00 UTC — the first working day starts here.
const DEFAULT_START_EPOCH: u64 = 1_735_722_000;

/// Generator parameters. Defaults reproduce the reference dataset:
/// two working weeks of 09:00–17:00 traffic at 5 calls per minute.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Seed for the RNG; same seed, same call log.
    pub seed: u64,
    pub days: u32,
    pub hours_per_day: u32,
    pub calls_per_minute: u32,
    /// Epoch second of the first working day's opening.
    pub start_epoch: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            days: 14,
            hours_per_day: 8,
            calls_per_minute: 5,
            start_epoch: DEFAULT_START_EPOCH,
        }
    }
}

impl SeedConfig {
    /// Total business hours covered by the generated log — the divisor the
    /// aggregator should use for the observed arrival rate.
    pub fn business_hours(&self) -> f64 {
        (self.days * self.hours_per_day) as f64
    }
}

/// What a seeding run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub skills: u32,
    pub agents: u32,
    pub calls: u64,
}

/// Skill matrix from the reference dataset: Sales has 2 qualified agents,
/// Tech Support 3, General Inquiries 3.
const SKILLS: [(SkillId, &str); 3] = [(1, "Sales"), (2, "Tech Support"), (3, "General Inquiries")];
const AGENTS: [(u32, &str); 4] = [
    (1, "Agent A"),
    (2, "Agent B"),
    (3, "Agent C"),
    (4, "Agent D"),
];
const AGENT_SKILLS: [(u32, SkillId); 8] = [
    (1, 1),
    (1, 2),
    (2, 2),
    (2, 3),
    (3, 1),
    (3, 2),
    (3, 3),
    (4, 3),
];

/// Configured rates per skill: (skill, planned λ/h, μ/h). Sales is
/// deliberately overloaded against its 2 agents (ρ = 1.5); the other two
/// classes are stable (ρ = 0.8 and ρ ≈ 0.56).
const PARAMETERS: [(SkillId, f64, f64); 3] = [(1, 60.0, 20.0), (2, 60.0, 25.0), (3, 60.0, 36.0)];

/// Reset the call log and populate the store with reference data and a
/// fresh synthetic call log.
pub fn seed_store(store: &CallStore, config: &SeedConfig) -> StoreResult<SeedSummary> {
    store.clear_calls()?;

    for (id, name) in SKILLS {
        store.put_skill(&SkillClass {
            id,
            name: name.to_string(),
        })?;
    }
    for (id, name) in AGENTS {
        store.put_agent(&Agent {
            id,
            name: name.to_string(),
        })?;
    }
    for (agent_id, skill_id) in AGENT_SKILLS {
        store.assign_skill(agent_id, skill_id)?;
    }
    for (skill_id, arrival_rate, service_rate) in PARAMETERS {
        store.put_parameters(&SystemParameters {
            skill_id,
            arrival_rate,
            service_rate,
        })?;
    }

    // Qualified-agent pools read back from the store, one lookup per skill,
    // so calls are assigned against what was actually persisted.
    let mut qualified: HashMap<SkillId, Vec<u32>> = HashMap::new();
    for (skill_id, _) in SKILLS {
        qualified.insert(skill_id, store.agents_for_skill(skill_id)?);
    }

    let mut rng = SmallRng::seed_from_u64(config.seed);
    // Skill mix from the reference dataset: 33% / 34% / 33%.
    let skill_weights =
        WeightedIndex::new([33u32, 34, 33]).expect("static weights are non-zero");

    let mut calls = Vec::new();
    let mut call_id = 1u64;
    for day in 0..config.days {
        let day_start = config.start_epoch + day as u64 * 86_400;
        for hour in 0..config.hours_per_day {
            for minute in 0..60u64 {
                for _ in 0..config.calls_per_minute {
                    let skill_id = SKILLS[skill_weights.sample(&mut rng)].0;
                    let arrived_at = day_start
                        + hour as u64 * 3_600
                        + minute * 60
                        + rng.gen_range(0..60);

                    // Pickup after 3–6 minutes on hold, then an
                    // exponentially distributed service time with mean
                    // 60/μ minutes (inverse CDF of a uniform draw).
                    let mu = PARAMETERS
                        .iter()
                        .find(|(id, _, _)| *id == skill_id)
                        .map(|(_, _, mu)| *mu)
                        .expect("skill always present in PARAMETERS");
                    let hold_secs = rng.gen_range(180.0..360.0);
                    let mean_service_secs = 3_600.0 / mu;
                    let u: f64 = rng.r#gen();
                    let service_secs = -mean_service_secs * (1.0 - u).ln();

                    let agent_id = *qualified[&skill_id]
                        .choose(&mut rng)
                        .expect("every skill has a qualified agent");

                    let service_started_at = arrived_at + hold_secs as u64;
                    calls.push(CallRecord {
                        id: call_id,
                        skill_id,
                        arrived_at,
                        service_started_at,
                        service_ended_at: service_started_at + service_secs as u64,
                        agent_id,
                    });
                    call_id += 1;
                }
            }
        }
    }

    store.put_calls(&calls)?;

    let summary = SeedSummary {
        skills: SKILLS.len() as u32,
        agents: AGENTS.len() as u32,
        calls: calls.len() as u64,
    };
    info!(
        seed = config.seed,
        days = config.days,
        calls = summary.calls,
        "store seeded"
    );
    Ok(summary)
}
