//! Topic subscriptions with longest-prefix delivery.

use pubsync_core::{Name, Publication};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// A subscription to every publication under a topic prefix.
///
/// Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    topic: Name,
    receiver: mpsc::UnboundedReceiver<Arc<Publication>>,
}

impl Subscription {
    pub fn topic(&self) -> &Name {
        &self.topic
    }

    /// Wait for the next delivered publication.
    ///
    /// Returns `None` once the session is dropped and the queue is drained.
    pub async fn recv(&mut self) -> Option<Arc<Publication>> {
        self.receiver.recv().await
    }

    /// Take the next delivered publication without waiting.
    pub fn try_recv(&mut self) -> Option<Arc<Publication>> {
        self.receiver.try_recv().ok()
    }
}

#[derive(Debug, Default)]
pub(crate) struct SubscriptionTable {
    entries: Vec<(Name, mpsc::UnboundedSender<Arc<Publication>>)>,
}

impl SubscriptionTable {
    pub(crate) fn subscribe(&mut self, topic: Name) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.entries.push((topic.clone(), tx));
        Subscription {
            topic,
            receiver: rx,
        }
    }

    /// Deliver to every live subscriber of the longest topic that prefixes
    /// the publication name.
    ///
    /// Returns the number of subscribers reached.
    pub(crate) fn deliver(&mut self, publication: &Arc<Publication>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, tx)| !tx.is_closed());
        let dropped = before - self.entries.len();
        if dropped > 0 {
            warn!(dropped, "dropped closed subscriptions");
        }

        let name = publication.name();
        let Some(longest) = self
            .entries
            .iter()
            .filter(|(topic, _)| topic.is_prefix_of(name))
            .map(|(topic, _)| topic.len())
            .max()
        else {
            return 0;
        };

        let mut reached = 0;
        for (topic, tx) in &self.entries {
            if topic.len() == longest
                && topic.is_prefix_of(name)
                && tx.send(Arc::clone(publication)).is_ok()
            {
                reached += 1;
            }
        }
        reached
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.iter().filter(|(_, tx)| !tx.is_closed()).count()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubsync_core::Timestamp;

    fn publication(uri: &str) -> Arc<Publication> {
        let name: Name = uri.parse().unwrap();
        Arc::new(Publication::new(
            name.append_timestamp(Timestamp(1)),
            &b""[..],
        ))
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut table = SubscriptionTable::default();
        let mut short = table.subscribe("/a".parse().unwrap());
        let mut long = table.subscribe("/a/b".parse().unwrap());

        assert_eq!(table.deliver(&publication("/a/b/c")), 1);
        assert!(long.try_recv().is_some());
        assert!(short.try_recv().is_none());

        assert_eq!(table.deliver(&publication("/a/x")), 1);
        assert!(short.try_recv().is_some());
    }

    #[test]
    fn test_same_topic_fans_out() {
        let mut table = SubscriptionTable::default();
        let mut s1 = table.subscribe("/t".parse().unwrap());
        let mut s2 = table.subscribe("/t".parse().unwrap());

        assert_eq!(table.deliver(&publication("/t/1")), 2);
        assert!(s1.try_recv().is_some());
        assert!(s2.try_recv().is_some());
    }

    #[test]
    fn test_dropped_subscription_is_skipped() {
        let mut table = SubscriptionTable::default();
        let mut short = table.subscribe("/a".parse().unwrap());
        let long = table.subscribe("/a/b".parse().unwrap());
        drop(long);

        assert_eq!(table.deliver(&publication("/a/b/c")), 1);
        assert!(short.try_recv().is_some());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_no_match() {
        let mut table = SubscriptionTable::default();
        let _sub = table.subscribe("/a".parse().unwrap());
        assert_eq!(table.deliver(&publication("/b")), 0);
    }

    #[tokio::test]
    async fn test_recv_waits_for_delivery() {
        let mut table = SubscriptionTable::default();
        let mut sub = table.subscribe("/a".parse().unwrap());
        let p = publication("/a/1");
        table.deliver(&p);
        let got = sub.recv().await.unwrap();
        assert_eq!(got.name(), p.name());
    }
}
