//! callgrid-seed — synthetic call-center data for CallGrid.
//!
//! Populates a store with reference data (skills, agents, qualifications,
//! queueing parameters) and a randomized-but-reproducible call log over a
//! working calendar. All randomness flows from one explicit `u64` seed:
//! the same seed always produces the same call log.
//!
//! The default dataset is deliberately unstable: the Sales class is
//! configured with λ = 60/h against 2 agents at μ = 20/h (ρ = 1.5), so a
//! stabilization pass always has work to do.

pub mod generator;

pub use generator::{SeedConfig, SeedSummary, seed_store};
