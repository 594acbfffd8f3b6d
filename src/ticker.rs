use std::time::Duration;

/// Display refresh interval in milliseconds
///
/// The tick only redraws the elapsed display; durations are always derived
/// from wall-clock deltas in [`crate::timer::Timer`], so a late or throttled
/// tick never skews a committed log. The presentation layer should run the
/// tick only while the timer is running and cancel it on teardown.
pub const DEFAULT_TICK_MS: u64 = 1000;

/// The refresh interval as a [`std::time::Duration`], ready to hand to a
/// scheduler or event loop
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}
