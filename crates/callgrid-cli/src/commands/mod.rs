pub mod report;
pub mod seed;
pub mod stabilize;

/// Reject a window divisor before it can turn call counts into a
/// non-finite observed rate.
fn check_window_hours(window_hours: f64) -> anyhow::Result<()> {
    if !window_hours.is_finite() || window_hours <= 0.0 {
        anyhow::bail!("--window-hours must be finite and > 0, got {window_hours}");
    }
    Ok(())
}
