//! CallStore — redb-backed persistence for CallGrid.
//!
//! Provides typed operations over skill classes, agents, skill assignments,
//! queueing parameters, and the call log. All values are JSON-serialized
//! into redb's `&[u8]` value columns. The store supports both on-disk and
//! in-memory backends (the latter for testing).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StoreError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StoreError::$variant(e.to_string())
    };
}

/// Thread-safe call-center store backed by redb.
#[derive(Clone)]
pub struct CallStore {
    db: Arc<Database>,
}

impl CallStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "call store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory call store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(SKILLS).map_err(map_err!(Table))?;
        txn.open_table(AGENTS).map_err(map_err!(Table))?;
        txn.open_table(AGENT_SKILLS).map_err(map_err!(Table))?;
        txn.open_table(PARAMETERS).map_err(map_err!(Table))?;
        txn.open_table(CALLS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    // ── Skills ─────────────────────────────────────────────────────

    /// Insert or update a skill class.
    pub fn put_skill(&self, skill: &SkillClass) -> StoreResult<()> {
        let value = serde_json::to_vec(skill).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(SKILLS).map_err(map_err!(Table))?;
            table
                .insert(skill.id, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(skill_id = skill.id, "skill stored");
        Ok(())
    }

    /// Get a skill class by id.
    pub fn get_skill(&self, skill_id: SkillId) -> StoreResult<Option<SkillClass>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SKILLS).map_err(map_err!(Table))?;
        match table.get(skill_id).map_err(map_err!(Read))? {
            Some(guard) => {
                let skill: SkillClass =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(skill))
            }
            None => Ok(None),
        }
    }

    /// List all skill classes, ordered by id.
    pub fn list_skills(&self) -> StoreResult<Vec<SkillClass>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SKILLS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let skill: SkillClass =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(skill);
        }
        Ok(results)
    }

    // ── Agents ─────────────────────────────────────────────────────

    /// Insert or update an agent.
    pub fn put_agent(&self, agent: &Agent) -> StoreResult<()> {
        let value = serde_json::to_vec(agent).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(AGENTS).map_err(map_err!(Table))?;
            table
                .insert(agent.id, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(agent_id = agent.id, "agent stored");
        Ok(())
    }

    /// Get an agent by id.
    pub fn get_agent(&self, agent_id: AgentId) -> StoreResult<Option<Agent>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(AGENTS).map_err(map_err!(Table))?;
        match table.get(agent_id).map_err(map_err!(Read))? {
            Some(guard) => {
                let agent: Agent =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(agent))
            }
            None => Ok(None),
        }
    }

    /// List all agents, ordered by id.
    pub fn list_agents(&self) -> StoreResult<Vec<Agent>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(AGENTS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let agent: Agent =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(agent);
        }
        Ok(results)
    }

    /// Highest agent id currently in the store, or 0 when empty.
    ///
    /// redb orders integer keys numerically, so this is a `last()` lookup.
    pub fn max_agent_id(&self) -> StoreResult<AgentId> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(AGENTS).map_err(map_err!(Table))?;
        let last = table.last().map_err(map_err!(Read))?;
        Ok(last.map(|(key, _)| key.value()).unwrap_or(0))
    }

    // ── Skill assignments ──────────────────────────────────────────

    /// Qualify an agent for a skill. Idempotent.
    pub fn assign_skill(&self, agent_id: AgentId, skill_id: SkillId) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(AGENT_SKILLS).map_err(map_err!(Table))?;
            table
                .insert((agent_id, skill_id), ())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(agent_id, skill_id, "skill assigned");
        Ok(())
    }

    /// Count qualified agents per skill. Skills with no agents are absent.
    pub fn count_agents_by_skill(&self) -> StoreResult<HashMap<SkillId, u32>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(AGENT_SKILLS).map_err(map_err!(Table))?;
        let mut counts: HashMap<SkillId, u32> = HashMap::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, _) = entry.map_err(map_err!(Read))?;
            let (_, skill_id) = key.value();
            *counts.entry(skill_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// List agent ids qualified for a skill, ordered by id.
    pub fn agents_for_skill(&self, skill_id: SkillId) -> StoreResult<Vec<AgentId>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(AGENT_SKILLS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, _) = entry.map_err(map_err!(Read))?;
            let (agent_id, sid) = key.value();
            if sid == skill_id {
                results.push(agent_id);
            }
        }
        Ok(results)
    }

    /// Create a batch of agents and their skill assignments in a single
    /// write transaction: either every agent lands or none does.
    pub fn create_agents_with_skills(&self, batch: &[(Agent, SkillId)]) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut agents = txn.open_table(AGENTS).map_err(map_err!(Table))?;
            let mut assignments = txn.open_table(AGENT_SKILLS).map_err(map_err!(Table))?;
            for (agent, skill_id) in batch {
                let value = serde_json::to_vec(agent).map_err(map_err!(Serialize))?;
                agents
                    .insert(agent.id, value.as_slice())
                    .map_err(map_err!(Write))?;
                assignments
                    .insert((agent.id, *skill_id), ())
                    .map_err(map_err!(Write))?;
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(agents = batch.len(), "agent batch committed");
        Ok(())
    }

    // ── Parameters ─────────────────────────────────────────────────

    /// Insert or update the queueing parameters for a skill.
    pub fn put_parameters(&self, params: &SystemParameters) -> StoreResult<()> {
        let value = serde_json::to_vec(params).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(PARAMETERS).map_err(map_err!(Table))?;
            table
                .insert(params.skill_id, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(skill_id = params.skill_id, "parameters stored");
        Ok(())
    }

    /// All configured parameters, keyed by skill id.
    pub fn list_parameters(&self) -> StoreResult<HashMap<SkillId, SystemParameters>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(PARAMETERS).map_err(map_err!(Table))?;
        let mut results = HashMap::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let params: SystemParameters =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.insert(params.skill_id, params);
        }
        Ok(results)
    }

    // ── Call log ───────────────────────────────────────────────────

    /// Append a call record.
    pub fn put_call(&self, call: &CallRecord) -> StoreResult<()> {
        let value = serde_json::to_vec(call).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(CALLS).map_err(map_err!(Table))?;
            table
                .insert(call.id, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Append a batch of call records in one write transaction.
    ///
    /// Seeding writes hundreds of thousands of calls; per-record
    /// transactions would take minutes.
    pub fn put_calls(&self, calls: &[CallRecord]) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(CALLS).map_err(map_err!(Table))?;
            for call in calls {
                let value = serde_json::to_vec(call).map_err(map_err!(Serialize))?;
                table
                    .insert(call.id, value.as_slice())
                    .map_err(map_err!(Write))?;
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(calls = calls.len(), "call batch committed");
        Ok(())
    }

    /// Total number of logged calls.
    pub fn count_calls(&self) -> StoreResult<u64> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(CALLS).map_err(map_err!(Table))?;
        table.len().map_err(map_err!(Read))
    }

    /// Count calls per skill whose arrival falls in `[start, end)` epoch
    /// seconds. Skills with no calls in the window are absent from the map.
    pub fn count_calls_by_skill(&self, start: u64, end: u64) -> StoreResult<HashMap<SkillId, u64>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(CALLS).map_err(map_err!(Table))?;
        let mut counts: HashMap<SkillId, u64> = HashMap::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let call: CallRecord =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            if call.arrived_at >= start && call.arrived_at < end {
                *counts.entry(call.skill_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    /// Earliest and latest call arrival, or None when the log is empty.
    pub fn call_arrival_bounds(&self) -> StoreResult<Option<(u64, u64)>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(CALLS).map_err(map_err!(Table))?;
        let mut bounds: Option<(u64, u64)> = None;
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let call: CallRecord =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(call.arrived_at), hi.max(call.arrived_at)),
                None => (call.arrived_at, call.arrived_at),
            });
        }
        Ok(bounds)
    }

    /// Delete every call record (re-seed support). Returns number deleted.
    pub fn clear_calls(&self) -> StoreResult<u64> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let count;
        {
            let mut table = txn.open_table(CALLS).map_err(map_err!(Table))?;
            count = table.len().map_err(map_err!(Read))?;
            table
                .retain(|_, _| false)
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(deleted = count, "call log cleared");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_call(id: CallId, skill_id: SkillId, arrived_at: u64) -> CallRecord {
        CallRecord {
            id,
            skill_id,
            arrived_at,
            service_started_at: arrived_at + 240,
            service_ended_at: arrived_at + 420,
            agent_id: 1,
        }
    }

    // ── Skill CRUD ─────────────────────────────────────────────────

    #[test]
    fn skill_put_and_get() {
        let store = CallStore::open_in_memory().unwrap();
        let skill = SkillClass {
            id: 1,
            name: "Sales".to_string(),
        };

        store.put_skill(&skill).unwrap();
        assert_eq!(store.get_skill(1).unwrap(), Some(skill));
        assert!(store.get_skill(2).unwrap().is_none());
    }

    #[test]
    fn skill_list_ordered_by_id() {
        let store = CallStore::open_in_memory().unwrap();
        for (id, name) in [(3, "c"), (1, "a"), (2, "b")] {
            store
                .put_skill(&SkillClass {
                    id,
                    name: name.to_string(),
                })
                .unwrap();
        }

        let ids: Vec<u32> = store.list_skills().unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    // ── Agent CRUD ─────────────────────────────────────────────────

    #[test]
    fn agent_put_and_get() {
        let store = CallStore::open_in_memory().unwrap();
        let agent = Agent {
            id: 7,
            name: "Agent G".to_string(),
        };

        store.put_agent(&agent).unwrap();
        assert_eq!(store.get_agent(7).unwrap(), Some(agent));
    }

    #[test]
    fn max_agent_id_empty_store_is_zero() {
        let store = CallStore::open_in_memory().unwrap();
        assert_eq!(store.max_agent_id().unwrap(), 0);
    }

    #[test]
    fn max_agent_id_tracks_highest_key() {
        let store = CallStore::open_in_memory().unwrap();
        for id in [4, 12, 9] {
            store
                .put_agent(&Agent {
                    id,
                    name: format!("Agent {id}"),
                })
                .unwrap();
        }
        assert_eq!(store.max_agent_id().unwrap(), 12);
    }

    // ── Skill assignments ──────────────────────────────────────────

    #[test]
    fn assign_skill_counts_per_skill() {
        let store = CallStore::open_in_memory().unwrap();
        store.assign_skill(1, 1).unwrap();
        store.assign_skill(1, 2).unwrap();
        store.assign_skill(2, 2).unwrap();
        store.assign_skill(3, 2).unwrap();

        let counts = store.count_agents_by_skill().unwrap();
        assert_eq!(counts.get(&1), Some(&1));
        assert_eq!(counts.get(&2), Some(&3));
        assert_eq!(counts.get(&3), None);
    }

    #[test]
    fn assign_skill_is_idempotent() {
        let store = CallStore::open_in_memory().unwrap();
        store.assign_skill(1, 1).unwrap();
        store.assign_skill(1, 1).unwrap();

        let counts = store.count_agents_by_skill().unwrap();
        assert_eq!(counts.get(&1), Some(&1));
    }

    #[test]
    fn agents_for_skill_filters_and_orders() {
        let store = CallStore::open_in_memory().unwrap();
        store.assign_skill(3, 1).unwrap();
        store.assign_skill(1, 1).unwrap();
        store.assign_skill(2, 2).unwrap();

        assert_eq!(store.agents_for_skill(1).unwrap(), vec![1, 3]);
        assert_eq!(store.agents_for_skill(2).unwrap(), vec![2]);
        assert!(store.agents_for_skill(9).unwrap().is_empty());
    }

    #[test]
    fn agent_batch_creates_agents_and_assignments() {
        let store = CallStore::open_in_memory().unwrap();
        let batch = vec![
            (
                Agent {
                    id: 5,
                    name: "Relief Agent 1".to_string(),
                },
                1,
            ),
            (
                Agent {
                    id: 6,
                    name: "Relief Agent 2".to_string(),
                },
                1,
            ),
        ];

        store.create_agents_with_skills(&batch).unwrap();

        assert_eq!(store.max_agent_id().unwrap(), 6);
        assert_eq!(store.count_agents_by_skill().unwrap().get(&1), Some(&2));
        assert!(store.get_agent(5).unwrap().is_some());
    }

    // ── Parameters ─────────────────────────────────────────────────

    #[test]
    fn parameters_put_and_list() {
        let store = CallStore::open_in_memory().unwrap();
        store
            .put_parameters(&SystemParameters {
                skill_id: 1,
                arrival_rate: 60.0,
                service_rate: 20.0,
            })
            .unwrap();
        store
            .put_parameters(&SystemParameters {
                skill_id: 2,
                arrival_rate: 60.0,
                service_rate: 25.0,
            })
            .unwrap();

        let params = store.list_parameters().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[&1].service_rate, 20.0);
        assert_eq!(params[&2].service_rate, 25.0);
    }

    // ── Call log ───────────────────────────────────────────────────

    #[test]
    fn call_counting_respects_window() {
        let store = CallStore::open_in_memory().unwrap();
        store.put_call(&test_call(1, 1, 100)).unwrap();
        store.put_call(&test_call(2, 1, 200)).unwrap();
        store.put_call(&test_call(3, 2, 300)).unwrap();

        // Window [100, 300) excludes the last call.
        let counts = store.count_calls_by_skill(100, 300).unwrap();
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), None);

        // Full window sees everything.
        let counts = store.count_calls_by_skill(0, u64::MAX).unwrap();
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&1));
    }

    #[test]
    fn call_batch_and_count() {
        let store = CallStore::open_in_memory().unwrap();
        let calls: Vec<CallRecord> = (1..=50).map(|i| test_call(i, 1, 1000 + i)).collect();
        store.put_calls(&calls).unwrap();

        assert_eq!(store.count_calls().unwrap(), 50);
    }

    #[test]
    fn call_arrival_bounds_span_log() {
        let store = CallStore::open_in_memory().unwrap();
        assert!(store.call_arrival_bounds().unwrap().is_none());

        store.put_call(&test_call(1, 1, 500)).unwrap();
        store.put_call(&test_call(2, 2, 100)).unwrap();
        store.put_call(&test_call(3, 3, 900)).unwrap();

        assert_eq!(store.call_arrival_bounds().unwrap(), Some((100, 900)));
    }

    #[test]
    fn clear_calls_empties_log() {
        let store = CallStore::open_in_memory().unwrap();
        store.put_call(&test_call(1, 1, 100)).unwrap();
        store.put_call(&test_call(2, 1, 200)).unwrap();

        assert_eq!(store.clear_calls().unwrap(), 2);
        assert_eq!(store.count_calls().unwrap(), 0);
        // Clearing an empty log is fine.
        assert_eq!(store.clear_calls().unwrap(), 0);
    }

    // ── Persistence (on-disk) ──────────────────────────────────────

    #[test]
    fn persistence_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.redb");

        {
            let store = CallStore::open(&db_path).unwrap();
            store
                .put_skill(&SkillClass {
                    id: 1,
                    name: "Sales".to_string(),
                })
                .unwrap();
            store
                .put_agent(&Agent {
                    id: 3,
                    name: "Agent C".to_string(),
                })
                .unwrap();
        }

        // Reopen the same database file.
        let store = CallStore::open(&db_path).unwrap();
        assert_eq!(store.get_skill(1).unwrap().unwrap().name, "Sales");
        assert_eq!(store.max_agent_id().unwrap(), 3);
    }

    // ── Edge cases ─────────────────────────────────────────────────

    #[test]
    fn empty_store_operations() {
        let store = CallStore::open_in_memory().unwrap();

        assert!(store.list_skills().unwrap().is_empty());
        assert!(store.list_agents().unwrap().is_empty());
        assert!(store.list_parameters().unwrap().is_empty());
        assert!(store.count_agents_by_skill().unwrap().is_empty());
        assert!(store.count_calls_by_skill(0, u64::MAX).unwrap().is_empty());
        assert_eq!(store.count_calls().unwrap(), 0);
    }
}
