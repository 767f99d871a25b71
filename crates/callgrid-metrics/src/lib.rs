//! callgrid-metrics — steady-state M/M/c evaluation for CallGrid.
//!
//! Two pieces:
//!
//! - [`mmc`]: the pure engine. Given (λ, μ, c) and an SLA threshold it
//!   returns the closed-form Erlang-C metrics {ρ, P0, Lq, Wq, W, L} plus an
//!   SLA flag. No I/O, no shared state.
//! - [`aggregator`]: captures one immutable [`LoadSnapshot`] per pass from
//!   the store — observed λ from the call log, configured μ and current
//!   agent count per skill.
//!
//! # Stability classification
//!
//! ```text
//! λ = 0          → idle: everything 0, P0 = 1
//! c = 0, λ > 0   → no capacity: ρ = ∞, all queue metrics ∞
//! ρ = λ/(c·μ) ≥ 1 → unstable: queue grows without bound, metrics ∞
//! ρ < 1          → Erlang C applies, all metrics finite
//! ```
//!
//! Infinite results use `f64::INFINITY`, never NaN, so callers branch
//! deterministically with `is_infinite()`.

pub mod aggregator;
pub mod mmc;

pub use aggregator::{ClassLoad, LoadSnapshot, ObservationWindow, take_snapshot};
pub use mmc::{ClassMetrics, MetricsError, compute_metrics};
