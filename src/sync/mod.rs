//! Host-side state synchronization: poll scheduling and the tick pipeline.

mod engine;
mod poll;

pub use engine::SyncEngine;
pub use poll::PollTimer;

/// Default polling cadence in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 500;

/// Fastest cadence the view may request.
pub const MIN_INTERVAL_MS: u64 = 100;

/// Slowest cadence the view may request.
pub const MAX_INTERVAL_MS: u64 = 10_000;

/// Step size for interactive cadence changes.
pub const INTERVAL_STEP_MS: u64 = 100;

/// Clamps a requested cadence into the supported range.
pub fn clamp_interval_ms(ms: u64) -> u64 {
    ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_interval_ms() {
        assert_eq!(clamp_interval_ms(5), MIN_INTERVAL_MS);
        assert_eq!(clamp_interval_ms(500), 500);
        assert_eq!(clamp_interval_ms(60_000), MAX_INTERVAL_MS);
    }
}
