//! Rate limit budget attached to throttling errors.
//!
//! When GitHub throttles a query, the gateway asks the `/rate_limit` endpoint
//! for the current window and attaches it to
//! [`IntakeError::RateLimitExceeded`](super::IntakeError::RateLimitExceeded)
//! so that the binary can tell the user when to retry.

use chrono::{DateTime, Utc};

/// Snapshot of a rate limit window.
///
/// # Example
///
/// ```
/// use queryloom::github::rate_limit::RateLimitInfo;
///
/// let info = RateLimitInfo::new(5000, 0, 1_700_000_000);
/// assert!(info.is_exhausted());
/// assert_eq!(info.reset_time().map(|at| at.timestamp()), Some(1_700_000_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    limit: u32,
    remaining: u32,
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a snapshot; `reset_at` is a Unix timestamp in seconds.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Points available per window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Points left in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Unix timestamp at which the window resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Returns true when no points remain.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Reset instant, or `None` when the timestamp is out of range.
    #[must_use]
    pub fn reset_time(&self) -> Option<DateTime<Utc>> {
        let seconds = i64::try_from(self.reset_at).ok()?;
        DateTime::from_timestamp(seconds, 0)
    }

    /// Whole seconds from `now` until the window resets, saturating at zero.
    #[must_use]
    pub fn seconds_until_reset(&self, now: DateTime<Utc>) -> u64 {
        let elapsed = u64::try_from(now.timestamp()).unwrap_or(0);
        self.reset_at.saturating_sub(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::RateLimitInfo;

    #[rstest]
    #[case::already_reset(1_699_999_000, 0)]
    #[case::one_minute_left(1_700_000_060, 60)]
    fn seconds_until_reset_saturates(#[case] reset_at: u64, #[case] expected: u64) {
        let now = Utc
            .timestamp_opt(1_700_000_000, 0)
            .single()
            .expect("timestamp should be valid");
        let info = RateLimitInfo::new(5000, 0, reset_at);

        assert_eq!(info.seconds_until_reset(now), expected);
    }

    #[rstest]
    fn reset_time_rejects_out_of_range_timestamps() {
        let info = RateLimitInfo::new(5000, 10, u64::MAX);

        assert!(info.reset_time().is_none());
        assert!(!info.is_exhausted());
    }
}
