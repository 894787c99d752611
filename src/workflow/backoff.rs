use rand::Rng;
use std::time::Duration;

/// Randomized retry delay used to desynchronize competing actors.
///
/// Each delay is drawn uniformly from `[base, min(cap, base << attempt))`.
/// The upper bound doubles per attempt until it hits the cap; the window is
/// never empty, so two actors that read the same snapshot and collided at
/// commit will almost never sleep the same amount and re-collide in
/// lockstep.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    base: Duration,
    cap: Duration,
}

impl BackoffPolicy {
    /// Creates a policy with the given base delay and cap.
    ///
    /// The base is clamped to at least one millisecond and the cap to at
    /// least twice the base, keeping the sampling window non-degenerate at
    /// every attempt.
    pub fn new(base: Duration, cap: Duration) -> Self {
        let base = base.max(Duration::from_millis(1));
        let cap = cap.max(base * 2);
        Self { base, cap }
    }

    /// Returns the delay to sleep before retrying `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let base = self.base.as_millis() as u64;
        let cap = self.cap.as_millis() as u64;

        let exponent = attempt.clamp(1, 16);
        let upper = base.saturating_mul(1u64 << exponent).min(cap);

        let millis = rand::rng().random_range(base..upper.max(base + 1));
        Duration::from_millis(millis)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(5), Duration::from_millis(100))
    }
}
