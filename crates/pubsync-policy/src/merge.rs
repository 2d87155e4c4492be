//! Merge/ordering policy for competing publication sets.

use pubsync_core::Publication;
use std::cmp::Reverse;

/// Merge locally known publications (`ours`) with newly learned ones
/// (`others`).
///
/// - `ours` empty: returns `ours` (empty), dropping `others`. The engine
///   reads this as "nothing to offer without local context".
/// - otherwise: each set is stable-sorted newest first on its own, then
///   `others` is appended after `ours`. The sets are never interleaved.
///
/// Works over anything that borrows as a [`Publication`]: `&Publication`,
/// `Arc<Publication>`, or owned values.
pub fn merge<P: AsRef<Publication>>(mut ours: Vec<P>, mut others: Vec<P>) -> Vec<P> {
    if ours.is_empty() {
        return ours;
    }

    sort_newest_first(&mut ours);
    sort_newest_first(&mut others);
    ours.append(&mut others);
    ours
}

/// Stable sort by descending timestamp.
///
/// Unparseable timestamps count as zero and sink to the end. Ties keep
/// their input order.
pub fn sort_newest_first<P: AsRef<Publication>>(set: &mut [P]) {
    set.sort_by_key(|p| Reverse(p.as_ref().timestamp_or_zero()));
}
