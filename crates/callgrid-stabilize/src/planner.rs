//! Stabilization planner — minimal capacity increase per overloaded class.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use callgrid_metrics::LoadSnapshot;
use callgrid_state::{AgentId, SkillId};

/// One planned hire: a new agent and the skill it is qualified for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StabilizationAction {
    pub agent_id: AgentId,
    pub agent_name: String,
    pub skill_id: SkillId,
}

/// Smallest capacity with `c·μ > λ` strictly, i.e. `floor(λ/μ) + 1`.
///
/// Strict rather than ≥: when λ/μ is exactly integral, `ceil` would return
/// a capacity with ρ = 1, which still diverges. Saturates at `u32::MAX`
/// for offered loads beyond any representable capacity.
pub fn required_capacity(lambda: f64, mu: f64) -> u32 {
    // The cast saturates for λ/μ ≥ u32::MAX; the increment must not wrap.
    ((lambda / mu).floor() as u32).saturating_add(1)
}

/// Plan the minimal hiring actions that bring every class in the snapshot
/// under ρ < 1.
///
/// Pure over the snapshot: stable classes produce nothing (re-planning a
/// stabilized snapshot yields an empty list), and agent ids advance
/// monotonically from `snapshot.max_agent_id + 1` across all classes.
pub fn plan(snapshot: &LoadSnapshot) -> Vec<StabilizationAction> {
    let mut actions = Vec::new();
    let mut next_agent_id = snapshot.max_agent_id + 1;
    let mut relief_counter = 1u32;

    for class in &snapshot.classes {
        if class.mu <= 0.0 {
            // Parameter invariant violated upstream; nothing sane to plan.
            warn!(
                skill_id = class.skill_id,
                mu = class.mu,
                "non-positive service rate in snapshot, class skipped"
            );
            continue;
        }
        if !class.lambda.is_finite() {
            // Same guard the metrics engine applies: a non-finite observed
            // rate (e.g. from a zero-hour window) has no finite remedy.
            warn!(
                skill_id = class.skill_id,
                lambda = class.lambda,
                "non-finite arrival rate in snapshot, class skipped"
            );
            continue;
        }

        // Same degenerate rules as the metrics engine: an idle class is
        // stable regardless of capacity; offered load with c = 0 is not.
        let unstable = if class.lambda == 0.0 {
            false
        } else if class.servers == 0 {
            true
        } else {
            class.lambda / (class.servers as f64 * class.mu) >= 1.0
        };
        if !unstable {
            continue;
        }

        let target = required_capacity(class.lambda, class.mu);
        let Some(additional) = target.checked_sub(class.servers).filter(|n| *n > 0) else {
            // Cannot happen when ρ ≥ 1, but a plan must never fire anyway.
            continue;
        };

        debug!(
            skill_id = class.skill_id,
            skill = %class.skill_name,
            servers = class.servers,
            target,
            additional,
            "class unstable, planning hires"
        );

        for _ in 0..additional {
            actions.push(StabilizationAction {
                agent_id: next_agent_id,
                agent_name: format!("Relief Agent {relief_counter}"),
                skill_id: class.skill_id,
            });
            next_agent_id += 1;
            relief_counter += 1;
        }
    }

    actions
}
