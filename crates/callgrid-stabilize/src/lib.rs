//! callgrid-stabilize — load-driven agent capacity planning.
//!
//! Reads a [`LoadSnapshot`](callgrid_metrics::LoadSnapshot), decides the
//! minimal number of agents each overloaded skill class needs, and emits
//! hiring actions. Applying the actions is a separate, store-facing step.
//!
//! # Planning rule
//!
//! ```text
//! ρ = λ/(c·μ)
//!
//! if ρ < 1:
//!     nothing — the class is already in steady state
//!
//! if ρ ≥ 1:
//!     c* = floor(λ/μ) + 1     // smallest c with c·μ > λ strictly
//!     emit (c* − c) new agents qualified for this class
//! ```
//!
//! The strict inequality matters at the boundary: when λ/μ is exactly
//! integral, a plain ceiling would land on ρ = 1, which is still unstable.
//!
//! The planner is pure: agent ids are allocated from the snapshot's
//! `max_agent_id`, monotonically across every class in the pass, and no
//! store mutation happens until [`apply`](applier::apply).

pub mod applier;
pub mod planner;

pub use applier::apply;
pub use planner::{StabilizationAction, plan, required_capacity};
