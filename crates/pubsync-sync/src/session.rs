//! Pub/sub session: publication table, timers, and reconciliation.
//!
//! The session owns every publication it knows about and consults its
//! [`SyncPolicy`] at two points:
//! - on ingest, to refuse publications outside the freshness window
//! - on respond, to order the publications a peer is missing

use bytes::Bytes;
use pubsync_core::{Name, Publication, PublicationId, Timestamp};
use pubsync_policy::{LifecyclePolicy, SyncPolicy};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::{Result, SyncError};
use crate::state::SyncState;
use crate::subscription::{Subscription, SubscriptionTable};

/// Invoked once per own publication: `true` when a peer's summary shows
/// it (confirmed), `false` when it expires first (lost).
pub type PublishCallback = Box<dyn FnOnce(&Publication, bool) + Send>;

/// Result of [`PubsubSession::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Stored and offered to peers.
    Published(PublicationId),
    /// Identical publication already known; nothing changed.
    Duplicate(PublicationId),
}

impl PublishOutcome {
    pub fn id(&self) -> PublicationId {
        match self {
            PublishOutcome::Published(id) | PublishOutcome::Duplicate(id) => *id,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, PublishOutcome::Duplicate(_))
    }
}

/// Result of [`PubsubSession::ingest`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Accepted and handed to at least one subscriber.
    pub delivered: usize,
    /// Accepted, but no subscription matched.
    pub no_subscriber: usize,
    /// Already known.
    pub ignored_known: usize,
    /// Refused by the policy's freshness window.
    pub ignored_expired: usize,
}

impl IngestReport {
    /// Publications added to the table.
    pub fn accepted(&self) -> usize {
        self.delivered + self.no_subscriber
    }
}

/// Timer transitions applied by [`PubsubSession::tick`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Reached `max_pub_lifetime`; no longer offered.
    pub expired: Vec<PublicationId>,
    /// Removed from the summary.
    pub unpublished: Vec<PublicationId>,
    /// Dropped from the table.
    pub forgotten: Vec<PublicationId>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.expired.is_empty() && self.unpublished.is_empty() && self.forgotten.is_empty()
    }
}

struct PublicationEntry {
    publication: Arc<Publication>,
    /// Published locally.
    own: bool,
    /// Past `max_pub_lifetime`.
    expired: bool,
    /// Present in the summary.
    active: bool,
    /// Local arrival time; timers run from here.
    arrived_at: Timestamp,
    callback: Option<PublishCallback>,
}

/// A syncps-style publish/subscribe participant.
pub struct PubsubSession<P: SyncPolicy = LifecyclePolicy> {
    describe: String,
    config: SessionConfig,
    policy: P,
    entries: HashMap<PublicationId, PublicationEntry>,
    state: SyncState,
    subscriptions: SubscriptionTable,
    closed: bool,
}

impl PubsubSession<LifecyclePolicy> {
    /// Create a session using the default lifecycle policy built from
    /// `config.policy`.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let policy = LifecyclePolicy::new(config.policy);
        Self::with_policy(config, policy)
    }
}

impl<P: SyncPolicy> PubsubSession<P> {
    /// Create a session with an application-supplied policy.
    ///
    /// Timers still run from `config.policy`.
    pub fn with_policy(config: SessionConfig, policy: P) -> Result<Self> {
        config.validate()?;
        let describe = config
            .describe
            .clone()
            .unwrap_or_else(|| "PubsubSession".to_string());

        Ok(Self {
            describe,
            config,
            policy,
            entries: HashMap::new(),
            state: SyncState::new(),
            subscriptions: SubscriptionTable::default(),
            closed: false,
        })
    }

    pub fn describe(&self) -> &str {
        &self.describe
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Snapshot of the ids this session is actively offering.
    pub fn summary(&self) -> SyncState {
        self.state.clone()
    }

    /// Number of publications in the table, including expired ones not yet
    /// forgotten.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &PublicationId) -> bool {
        self.entries.contains_key(id)
    }

    /// Whether `id` is currently in the summary.
    pub fn is_active(&self, id: &PublicationId) -> bool {
        self.state.contains(id)
    }

    pub fn get(&self, id: &PublicationId) -> Option<&Arc<Publication>> {
        self.entries.get(id).map(|e| &e.publication)
    }

    /// Own publications still in the table.
    pub fn own_count(&self) -> usize {
        self.entries.values().filter(|e| e.own).count()
    }

    /// Live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Publish `payload` under `name`.
    ///
    /// A timestamp component for `now` is appended to the name. If the
    /// resulting publication is already known the call is a no-op and
    /// `callback` is dropped without being invoked.
    pub fn publish(
        &mut self,
        name: Name,
        payload: impl Into<Bytes>,
        now: Timestamp,
        callback: Option<PublishCallback>,
    ) -> Result<PublishOutcome> {
        if self.closed {
            return Err(SyncError::Closed);
        }

        let publication = Publication::new(name.append_timestamp(now), payload);
        let id = publication.compute_id();
        if self.entries.contains_key(&id) {
            debug!(session = %self.describe, %id, name = %publication.name(), "d-dup");
            return Ok(PublishOutcome::Duplicate(id));
        }

        debug!(session = %self.describe, %id, name = %publication.name(), "d-pub");
        self.insert(id, Arc::new(publication), true, now, callback);
        Ok(PublishOutcome::Published(id))
    }

    /// Subscribe to publications under `topic`.
    ///
    /// Each ingested publication goes to the subscriptions with the
    /// longest topic that prefixes its name.
    pub fn subscribe(&mut self, topic: Name) -> Subscription {
        self.subscriptions.subscribe(topic)
    }

    /// Subscribe to a topic given in URI form, such as `/chat/room`.
    pub fn subscribe_uri(&mut self, topic: &str) -> Result<Subscription> {
        let topic: Name = topic.parse()?;
        Ok(self.subscribe(topic))
    }

    /// Accept publications learned from a peer.
    ///
    /// Publications already known, or outside the policy's freshness window
    /// at `now`, are ignored.
    pub fn ingest<I>(&mut self, publications: I, now: Timestamp) -> Result<IngestReport>
    where
        I: IntoIterator<Item = Publication>,
    {
        if self.closed {
            return Err(SyncError::Closed);
        }

        let mut report = IngestReport::default();
        for publication in publications {
            let id = publication.compute_id();
            if self.entries.contains_key(&id) {
                debug!(session = %self.describe, %id, name = %publication.name(), "c-ignore known");
                report.ignored_known += 1;
                continue;
            }
            if !self.policy.is_still_valid(&publication, now) {
                debug!(session = %self.describe, %id, name = %publication.name(), "c-ignore expired");
                report.ignored_expired += 1;
                continue;
            }

            let publication = Arc::new(publication);
            self.insert(id, Arc::clone(&publication), false, now, None);
            if self.subscriptions.deliver(&publication) > 0 {
                debug!(session = %self.describe, %id, name = %publication.name(), "c-deliver");
                report.delivered += 1;
            } else {
                debug!(session = %self.describe, %id, name = %publication.name(), "c-nosub");
                report.no_subscriber += 1;
            }
        }
        Ok(report)
    }

    /// Answer a peer's summary with the publications it is missing.
    ///
    /// Timers are advanced to `now` first. Own publications whose ids appear
    /// in `peer` are confirmed. The remaining candidates (active, unexpired,
    /// absent from `peer`) are split into own and others and ordered by the
    /// policy; the reply keeps that order and stops before exceeding
    /// `sync_data_pub_size`, always including the first publication.
    ///
    /// Returns `None` when there is nothing to send.
    pub fn respond(&mut self, peer: &SyncState, now: Timestamp) -> Option<Vec<Arc<Publication>>> {
        if self.closed {
            return None;
        }
        self.tick(now);
        self.confirm(peer);

        let mut ours = Vec::new();
        let mut others = Vec::new();
        for id in self.state.missing_from(peer) {
            let Some(entry) = self.entries.get(id) else {
                continue;
            };
            if entry.expired {
                continue;
            }
            if entry.own {
                ours.push(Arc::clone(&entry.publication));
            } else {
                others.push(Arc::clone(&entry.publication));
            }
        }

        let merged = self.policy.on_reconciled(ours, others);
        if merged.is_empty() {
            return None;
        }

        let available = merged.len();
        let budget = self.config.sync_data_pub_size;
        let mut used = 0;
        let mut reply = Vec::with_capacity(available);
        for publication in merged {
            let size = publication.encoded_len();
            if !reply.is_empty() && used + size > budget {
                break;
            }
            used += size;
            reply.push(publication);
        }

        debug!(
            session = %self.describe,
            included = reply.len(),
            available,
            bytes = used,
            "p-satisfy"
        );
        Some(reply)
    }

    /// Advance publication timers to `now`.
    pub fn tick(&mut self, now: Timestamp) -> TickReport {
        let lifetime = self.config.policy.max_pub_lifetime;
        let horizon = self.config.policy.expiry_horizon();
        let forget_after = lifetime.saturating_mul(2);

        let mut ids: Vec<PublicationId> = self.entries.keys().copied().collect();
        ids.sort();

        let mut report = TickReport::default();
        let mut lost = Vec::new();
        for id in ids {
            let Some(entry) = self.entries.get_mut(&id) else {
                continue;
            };
            let arrived = entry.arrived_at;

            if !entry.expired && now >= arrived.saturating_add(lifetime) {
                debug!(session = %self.describe, %id, "d-expire");
                entry.expired = true;
                report.expired.push(id);
                if let Some(cb) = entry.callback.take() {
                    lost.push((cb, Arc::clone(&entry.publication)));
                }
            }

            // forgetting also unpublishes, in case skew exceeds lifetime
            let forget = now >= arrived.saturating_add(forget_after);
            if entry.active && (forget || now >= arrived.saturating_add(horizon)) {
                debug!(session = %self.describe, %id, "d-unpublish");
                entry.active = false;
                self.state.remove(&id);
                report.unpublished.push(id);
            }

            if forget {
                debug!(session = %self.describe, %id, "d-forget");
                self.entries.remove(&id);
                report.forgotten.push(id);
            }
        }

        for (cb, publication) in lost {
            debug!(session = %self.describe, name = %publication.name(), "d-unconfirm");
            cb(&publication, false);
        }
        report
    }

    /// Stop the session.
    ///
    /// Pending publish callbacks are dropped without being invoked and all
    /// subscriptions end. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        for entry in self.entries.values_mut() {
            entry.callback = None;
        }
        self.subscriptions.clear();
        debug!(session = %self.describe, "closed");
    }

    fn confirm(&mut self, peer: &SyncState) {
        let mut confirmed: Vec<(PublicationId, PublishCallback, Arc<Publication>)> = self
            .entries
            .iter_mut()
            .filter(|(id, e)| e.own && !e.expired && e.callback.is_some() && peer.contains(id))
            .filter_map(|(id, e)| {
                e.callback
                    .take()
                    .map(|cb| (*id, cb, Arc::clone(&e.publication)))
            })
            .collect();
        confirmed.sort_by_key(|(id, _, _)| *id);

        for (id, cb, publication) in confirmed {
            debug!(session = %self.describe, %id, name = %publication.name(), "d-confirm");
            cb(&publication, true);
        }
    }

    fn insert(
        &mut self,
        id: PublicationId,
        publication: Arc<Publication>,
        own: bool,
        now: Timestamp,
        callback: Option<PublishCallback>,
    ) {
        self.state.insert(id);
        self.entries.insert(
            id,
            PublicationEntry {
                publication,
                own,
                expired: false,
                active: true,
                arrived_at: now,
                callback,
            },
        );
    }
}
