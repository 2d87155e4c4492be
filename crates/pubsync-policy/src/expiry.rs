//! Freshness/eviction predicate.

use pubsync_core::{Publication, Timestamp};
use std::time::Duration;

use crate::config::PolicyConfig;

/// Whether `candidate` is expired at `now`.
///
/// The timestamp comes from the last name component; a missing or
/// malformed timestamp decodes as zero, which makes the publication look
/// enormously old and therefore expired.
///
/// Expired iff `elapsed >= max_pub_lifetime + max_clock_skew` (too old) or
/// `elapsed <= -max_clock_skew` (implausibly far in the future), where
/// `elapsed = now - timestamp` is signed.
pub fn is_expired(candidate: &Publication, now: Timestamp, config: &PolicyConfig) -> bool {
    let timestamp = candidate.timestamp_or_zero();
    let elapsed = now.signed_micros_since(timestamp);

    let lifetime = micros(config.max_pub_lifetime);
    let skew = micros(config.max_clock_skew);

    let expired = elapsed >= lifetime + skew || elapsed <= -skew;
    tracing::trace!(
        name = %candidate.name(),
        %timestamp,
        %now,
        expired,
        "expiry check"
    );
    expired
}

fn micros(d: Duration) -> i128 {
    i128::try_from(d.as_micros()).unwrap_or(i128::MAX / 4)
}
