//! Applies a stabilization plan to the store.

use tracing::info;

use callgrid_state::{Agent, CallStore, StoreResult};

use crate::planner::StabilizationAction;

/// Execute every action from one plan against the store.
///
/// All actions run in a single store transaction: either the whole plan
/// commits or none of it does, so the capacity state can never end up
/// halfway between the snapshot that justified the plan and its target.
/// Returns the number of agents added.
pub fn apply(store: &CallStore, actions: &[StabilizationAction]) -> StoreResult<usize> {
    if actions.is_empty() {
        return Ok(0);
    }

    let batch: Vec<(Agent, u32)> = actions
        .iter()
        .map(|a| {
            (
                Agent {
                    id: a.agent_id,
                    name: a.agent_name.clone(),
                },
                a.skill_id,
            )
        })
        .collect();
    store.create_agents_with_skills(&batch)?;

    for action in actions {
        info!(
            agent_id = action.agent_id,
            agent = %action.agent_name,
            skill_id = action.skill_id,
            "agent hired"
        );
    }
    Ok(actions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::plan;
    use callgrid_metrics::{ObservationWindow, compute_metrics, take_snapshot};
    use callgrid_state::{CallRecord, SkillClass, SystemParameters};

    /// Store with one overloaded skill: 120 calls over 2 hours (λ = 60),
    /// μ = 20, and 2 qualified agents → ρ = 1.5.
    fn overloaded_store() -> CallStore {
        let store = CallStore::open_in_memory().unwrap();
        store
            .put_skill(&SkillClass {
                id: 1,
                name: "Sales".to_string(),
            })
            .unwrap();
        store
            .put_parameters(&SystemParameters {
                skill_id: 1,
                arrival_rate: 60.0,
                service_rate: 20.0,
            })
            .unwrap();
        for id in 1..=2 {
            store
                .put_agent(&Agent {
                    id,
                    name: format!("Agent {id}"),
                })
                .unwrap();
            store.assign_skill(id, 1).unwrap();
        }
        let calls: Vec<CallRecord> = (0..120)
            .map(|i| CallRecord {
                id: i + 1,
                skill_id: 1,
                arrived_at: 1_000 + i * 60,
                service_started_at: 1_000 + i * 60 + 240,
                service_ended_at: 1_000 + i * 60 + 420,
                agent_id: 1 + (i as u32 % 2),
            })
            .collect();
        store.put_calls(&calls).unwrap();
        store
    }

    #[test]
    fn empty_plan_is_a_no_op() {
        let store = CallStore::open_in_memory().unwrap();
        assert_eq!(apply(&store, &[]).unwrap(), 0);
        assert_eq!(store.max_agent_id().unwrap(), 0);
    }

    #[test]
    fn full_pass_stabilizes_the_store() {
        let store = overloaded_store();
        let window = ObservationWindow::whole_log(2.0);

        // Before: ρ = 1.5, metrics saturated.
        let before = take_snapshot(&store, &window).unwrap();
        let sales = &before.classes[0];
        assert_eq!(sales.lambda, 60.0);
        let m = compute_metrics(sales.lambda, sales.mu, sales.servers, 10.0).unwrap();
        assert!(!m.is_stable());

        // Plan and apply: c* = 4, two hires.
        let actions = plan(&before);
        assert_eq!(apply(&store, &actions).unwrap(), 2);
        assert_eq!(store.max_agent_id().unwrap(), 4);
        assert_eq!(store.count_agents_by_skill().unwrap()[&1], 4);
        assert_eq!(
            store.get_agent(3).unwrap().unwrap().name,
            "Relief Agent 1"
        );

        // After: a fresh snapshot is stable and plans nothing further.
        let after = take_snapshot(&store, &window).unwrap();
        let sales = &after.classes[0];
        assert_eq!(sales.servers, 4);
        let m = compute_metrics(sales.lambda, sales.mu, sales.servers, 10.0).unwrap();
        assert!(m.is_stable());
        assert!(m.total_wait.is_finite());
        assert!(plan(&after).is_empty());
    }
}
