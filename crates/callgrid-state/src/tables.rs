//! redb table definitions for the CallGrid store.
//!
//! Reference data and the call log use numeric primary keys; values are
//! JSON-serialized domain types. Skill assignments are a pure key table —
//! the `(agent_id, skill_id)` pair is the whole fact.

use redb::TableDefinition;

/// Skill classes keyed by `skill_id`.
pub const SKILLS: TableDefinition<u32, &[u8]> = TableDefinition::new("skills");

/// Agents keyed by `agent_id`.
pub const AGENTS: TableDefinition<u32, &[u8]> = TableDefinition::new("agents");

/// Skill assignments keyed by `(agent_id, skill_id)`.
pub const AGENT_SKILLS: TableDefinition<(u32, u32), ()> = TableDefinition::new("agent_skills");

/// Queueing parameters keyed by `skill_id`.
pub const PARAMETERS: TableDefinition<u32, &[u8]> = TableDefinition::new("parameters");

/// Call log keyed by `call_id`.
pub const CALLS: TableDefinition<u64, &[u8]> = TableDefinition::new("calls");
