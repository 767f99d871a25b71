//! Per-pass load snapshots.
//!
//! A [`LoadSnapshot`] is captured once per pass and never re-queried: the
//! "before" report, the stabilization plan, and the "after" report each work
//! from their own non-interleaved capture, so the metrics they produce are
//! comparable. The snapshot also carries the global maximum agent id, which
//! makes the planner a pure function of the snapshot alone.

use serde::{Deserialize, Serialize};
use tracing::debug;

use callgrid_state::{AgentId, CallStore, SkillId, StoreResult};

/// The call-counting window for one pass.
///
/// `start`/`end` bound arrivals in epoch seconds; `hours` is the divisor for
/// the empirical arrival rate. The divisor is carried separately because the
/// observed span is a working calendar (e.g. 14 days × 8 business hours),
/// not the wall-clock distance between the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationWindow {
    pub start: u64,
    pub end: u64,
    pub hours: f64,
}

impl ObservationWindow {
    /// Window over an explicit epoch range with an explicit hour divisor.
    pub fn new(start: u64, end: u64, hours: f64) -> Self {
        Self { start, end, hours }
    }

    /// Window covering the entire call log, divided by `hours`.
    pub fn whole_log(hours: f64) -> Self {
        Self {
            start: 0,
            end: u64::MAX,
            hours,
        }
    }
}

/// One snapshot entry: observed and configured load for a single skill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassLoad {
    pub skill_id: SkillId,
    pub skill_name: String,
    /// Empirical arrival rate: calls in the window / window hours.
    pub lambda: f64,
    /// Configured service rate per agent.
    pub mu: f64,
    /// Agents currently qualified for this skill.
    pub servers: u32,
}

/// Immutable per-pass capture of every configured skill class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadSnapshot {
    /// Entries ordered by skill id.
    pub classes: Vec<ClassLoad>,
    /// Highest agent id in the store at capture time.
    pub max_agent_id: AgentId,
}

/// Capture a snapshot of every skill class with configured parameters.
///
/// Classes with no calls in the window appear with `lambda = 0`; classes
/// with no qualified agents appear with `servers = 0`. A skill without a
/// parameter row is skipped — there is no μ to evaluate it against.
pub fn take_snapshot(store: &CallStore, window: &ObservationWindow) -> StoreResult<LoadSnapshot> {
    let call_counts = store.count_calls_by_skill(window.start, window.end)?;
    let parameters = store.list_parameters()?;
    let agent_counts = store.count_agents_by_skill()?;
    let max_agent_id = store.max_agent_id()?;

    let mut classes = Vec::with_capacity(parameters.len());
    for skill in store.list_skills()? {
        let Some(params) = parameters.get(&skill.id) else {
            debug!(skill_id = skill.id, "skill has no parameters, skipped");
            continue;
        };
        let calls = call_counts.get(&skill.id).copied().unwrap_or(0);
        classes.push(ClassLoad {
            skill_id: skill.id,
            skill_name: skill.name,
            lambda: calls as f64 / window.hours,
            mu: params.service_rate,
            servers: agent_counts.get(&skill.id).copied().unwrap_or(0),
        });
    }

    debug!(
        classes = classes.len(),
        max_agent_id, "load snapshot captured"
    );
    Ok(LoadSnapshot {
        classes,
        max_agent_id,
    })
}
