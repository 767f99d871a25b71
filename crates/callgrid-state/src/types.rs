//! Domain types for the CallGrid store.
//!
//! These types represent the persisted call-center state: skill classes,
//! agents, configured queueing parameters, and the call log. All types are
//! serializable to/from JSON for storage in redb tables.

use serde::{Deserialize, Serialize};

/// Unique identifier for a skill class (service class).
pub type SkillId = u32;

/// Unique identifier for an agent (server).
pub type AgentId = u32;

/// Unique identifier for a logged call.
pub type CallId = u64;

/// A service class callers are routed to. Immutable reference data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillClass {
    pub id: SkillId,
    pub name: String,
}

/// An agent (one server in the queueing model). Qualification for a skill
/// is a separate `(agent_id, skill_id)` assignment record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
}

/// Configured queueing parameters for one skill class.
///
/// `arrival_rate` is the planned λ; the stabilizer works from the *observed*
/// λ instead, so this field is reference data only. Both rates must be > 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemParameters {
    pub skill_id: SkillId,
    /// Planned arrivals per hour.
    pub arrival_rate: f64,
    /// Completions per hour, per single agent.
    pub service_rate: f64,
}

/// One logged call. Timestamps are epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallRecord {
    pub id: CallId,
    pub skill_id: SkillId,
    pub arrived_at: u64,
    pub service_started_at: u64,
    pub service_ended_at: u64,
    /// Agent the call was assigned to.
    pub agent_id: AgentId,
}
