//! Reconciliation summary.

use pubsync_core::PublicationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The set of publication ids a participant is actively offering.
///
/// Sent to a peer so it can answer with what this side is missing, and
/// inspected by the publisher to confirm its own publications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    ids: BTreeSet<PublicationId>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the id was not already present.
    pub fn insert(&mut self, id: PublicationId) -> bool {
        self.ids.insert(id)
    }

    /// Returns `true` if the id was present.
    pub fn remove(&mut self, id: &PublicationId) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &PublicationId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PublicationId> {
        self.ids.iter()
    }

    /// Ids present here but absent from `peer`.
    pub fn missing_from<'a>(
        &'a self,
        peer: &'a SyncState,
    ) -> impl Iterator<Item = &'a PublicationId> + 'a {
        self.ids.difference(&peer.ids)
    }
}

impl FromIterator<PublicationId> for SyncState {
    fn from_iter<I: IntoIterator<Item = PublicationId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
