//! Closed-form M/M/c (Erlang C) metrics.
//!
//! The Erlang-C series is accumulated term-by-term with the recurrence
//! `term[n] = term[n-1] · (λ/μ) / n` instead of evaluating `(λ/μ)^n / n!`
//! directly. The direct form overflows f64 somewhere around c ≈ 170 and
//! loses precision long before that; the recurrence stays well-conditioned
//! for any realistic agent count.

use thiserror::Error;

/// Errors for invalid engine inputs. Degenerate-but-valid inputs (λ = 0,
/// c = 0) are not errors; they produce well-defined sentinel metrics.
#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("service rate must be > 0, got {0}")]
    NonPositiveServiceRate(f64),

    #[error("arrival rate must be finite and >= 0, got {0}")]
    InvalidArrivalRate(f64),
}

/// Steady-state metrics for one skill class.
///
/// For an unstable class (ρ ≥ 1) the queue metrics are `f64::INFINITY` and
/// `idle_probability` is 0. Values are never rounded here; formatting for
/// display is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMetrics {
    /// ρ = λ/(c·μ). `INFINITY` when c = 0 with offered load.
    pub utilization: f64,
    /// P0, probability of an empty system.
    pub idle_probability: f64,
    /// Lq, expected number waiting in queue.
    pub queue_length: f64,
    /// Wq, expected wait before service begins.
    pub queue_wait: f64,
    /// W = Wq + 1/μ, expected total time in system.
    pub total_wait: f64,
    /// L = λ·W, expected total number in system.
    pub system_length: f64,
    /// True when the expected total time exceeds the SLA threshold
    /// (always true for an unstable class, never for an idle one).
    pub sla_breached: bool,
}

impl ClassMetrics {
    /// The all-zero snapshot for a class receiving no traffic.
    fn idle() -> Self {
        Self {
            utilization: 0.0,
            idle_probability: 1.0,
            queue_length: 0.0,
            queue_wait: 0.0,
            total_wait: 0.0,
            system_length: 0.0,
            sla_breached: false,
        }
    }

    /// The saturated snapshot for a class whose queue grows without bound.
    fn unstable(utilization: f64) -> Self {
        Self {
            utilization,
            idle_probability: 0.0,
            queue_length: f64::INFINITY,
            queue_wait: f64::INFINITY,
            total_wait: f64::INFINITY,
            system_length: f64::INFINITY,
            sla_breached: true,
        }
    }

    /// True when the class is in steady state (finite queue).
    pub fn is_stable(&self) -> bool {
        self.utilization < 1.0
    }
}

/// Evaluate the M/M/c model for one skill class.
///
/// `lambda` and `mu` are rates in the same time unit (the CLI uses per-hour);
/// `servers` is the current agent count; `sla_threshold` is the acceptable
/// total time in system, in the unit `1/mu` is expressed in.
pub fn compute_metrics(
    lambda: f64,
    mu: f64,
    servers: u32,
    sla_threshold: f64,
) -> Result<ClassMetrics, MetricsError> {
    if !(mu > 0.0) || !mu.is_finite() {
        return Err(MetricsError::NonPositiveServiceRate(mu));
    }
    if !(lambda >= 0.0) || !lambda.is_finite() {
        return Err(MetricsError::InvalidArrivalRate(lambda));
    }

    // An idle class is a distinct branch: the general formula would divide
    // by λ when deriving Wq.
    if lambda == 0.0 {
        return Ok(ClassMetrics::idle());
    }

    // Offered load with no capacity at all.
    if servers == 0 {
        return Ok(ClassMetrics::unstable(f64::INFINITY));
    }

    let c = servers as f64;
    let rho = lambda / (c * mu);
    if rho >= 1.0 {
        return Ok(ClassMetrics::unstable(rho));
    }

    // Erlang C. Accumulate Σ_{n=0}^{c-1} a^n/n! and the final term a^c/c!
    // (a = λ/μ) via the ratio recurrence.
    let a = lambda / mu;
    let mut term = 1.0; // a^0 / 0!
    let mut partial_sum = 0.0;
    for n in 1..=servers {
        partial_sum += term;
        term *= a / n as f64; // now a^n / n!
    }
    // term is a^c/c!; partial_sum covers n = 0..c-1.
    let p0 = 1.0 / (partial_sum + term / (1.0 - rho));
    let lq = p0 * term * rho / ((1.0 - rho) * (1.0 - rho));
    let wq = lq / lambda;
    let w = wq + 1.0 / mu;
    let l = lambda * w;

    Ok(ClassMetrics {
        utilization: rho,
        idle_probability: p0,
        queue_length: lq,
        queue_wait: wq,
        total_wait: w,
        system_length: l,
        sla_breached: w > sla_threshold,
    })
}
