//! The policy capability handed to a sync engine.

use pubsync_core::{Publication, Timestamp};
use std::sync::Arc;

use crate::config::PolicyConfig;
use crate::expiry::is_expired;
use crate::merge::merge;

/// Decisions a sync engine delegates to the application.
///
/// Implementations must not block and must not hold shared mutable state;
/// the engine calls them on its dispatch path.
pub trait SyncPolicy: Send + Sync {
    /// Whether `publication` should still be offered for reconciliation.
    fn is_still_valid(&self, publication: &Publication, now: Timestamp) -> bool;

    /// Order the publications the local side holds (`ours`) and those a
    /// reconciliation round revealed (`others`) into a single sequence.
    fn on_reconciled(
        &self,
        ours: Vec<Arc<Publication>>,
        others: Vec<Arc<Publication>>,
    ) -> Vec<Arc<Publication>>;
}

/// Default policy: two-sided freshness window plus local-first merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecyclePolicy {
    config: PolicyConfig,
}

impl LifecyclePolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn is_expired(&self, publication: &Publication, now: Timestamp) -> bool {
        is_expired(publication, now, &self.config)
    }
}

impl SyncPolicy for LifecyclePolicy {
    fn is_still_valid(&self, publication: &Publication, now: Timestamp) -> bool {
        !self.is_expired(publication, now)
    }

    fn on_reconciled(
        &self,
        ours: Vec<Arc<Publication>>,
        others: Vec<Arc<Publication>>,
    ) -> Vec<Arc<Publication>> {
        merge(ours, others)
    }
}

impl<P: SyncPolicy + ?Sized> SyncPolicy for Arc<P> {
    fn is_still_valid(&self, publication: &Publication, now: Timestamp) -> bool {
        (**self).is_still_valid(publication, now)
    }

    fn on_reconciled(
        &self,
        ours: Vec<Arc<Publication>>,
        others: Vec<Arc<Publication>>,
    ) -> Vec<Arc<Publication>> {
        (**self).on_reconciled(ours, others)
    }
}

impl<P: SyncPolicy + ?Sized> SyncPolicy for Box<P> {
    fn is_still_valid(&self, publication: &Publication, now: Timestamp) -> bool {
        (**self).is_still_valid(publication, now)
    }

    fn on_reconciled(
        &self,
        ours: Vec<Arc<Publication>>,
        others: Vec<Arc<Publication>>,
    ) -> Vec<Arc<Publication>> {
        (**self).on_reconciled(ours, others)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubsync_core::Name;
    use std::time::Duration;

    fn stamped(label: &'static str, ts: u64) -> Arc<Publication> {
        Arc::new(Publication::new(
            Name::new().append_generic(label).append_timestamp(Timestamp(ts)),
            &b""[..],
        ))
    }

    #[test]
    fn test_validity_is_negated_expiry() {
        let policy = LifecyclePolicy::new(PolicyConfig::new(
            Duration::from_micros(100),
            Duration::from_micros(10),
        ));
        let p = stamped("a", 1_000);

        assert!(policy.is_still_valid(&p, Timestamp(1_000)));
        assert!(policy.is_still_valid(&p, Timestamp(1_109)));
        assert!(!policy.is_still_valid(&p, Timestamp(1_110)));
        assert!(!policy.is_still_valid(&p, Timestamp(990)));
    }

    #[test]
    fn test_on_reconciled_is_merge() {
        let policy = LifecyclePolicy::default();
        let a = stamped("A", 5);
        let b = stamped("B", 10);
        let c = stamped("C", 7);

        let merged = policy.on_reconciled(vec![a.clone(), b.clone()], vec![c.clone()]);
        let names: Vec<String> = merged.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["/B/t=10", "/A/t=5", "/C/t=7"]);

        assert!(policy.on_reconciled(vec![], vec![a, b, c]).is_empty());
    }

    #[test]
    fn test_dyn_policy() {
        let policy: Box<dyn SyncPolicy> = Box::new(LifecyclePolicy::default());
        let p = stamped("a", 1_000_000);
        assert!(policy.is_still_valid(&p, Timestamp(1_000_000)));

        let shared: Arc<dyn SyncPolicy> = Arc::new(LifecyclePolicy::default());
        assert!(!shared.is_still_valid(&p, Timestamp(4_000_000)));
    }
}
