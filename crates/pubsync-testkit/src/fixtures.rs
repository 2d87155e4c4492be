//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

use pubsync_core::{Name, Publication, PublicationId, Timestamp};
use pubsync_policy::{Clock, ManualClock};
use pubsync_sync::{PublishCallback, PubsubSession, SessionConfig};

/// Epoch used by fixtures: far enough from zero that skew math never
/// touches it.
pub const FIXTURE_EPOCH: Timestamp = Timestamp(1_700_000_000_000_000);

/// Publication named `/<label>/t=<ts>` with an empty payload.
pub fn stamped(label: &str, ts: u64) -> Publication {
    Publication::new(
        Name::new()
            .append_generic(label.as_bytes().to_vec())
            .append_timestamp(Timestamp(ts)),
        Bytes::new(),
    )
}

/// Builds numbered publications under a prefix: `<prefix>/<seq>/t=<ts>`.
#[derive(Debug, Clone)]
pub struct PublicationFactory {
    prefix: Name,
    seq: u64,
}

impl PublicationFactory {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.parse().expect("valid fixture prefix"),
            seq: 0,
        }
    }

    /// Next sequence-numbered name, without a timestamp.
    pub fn next_name(&mut self) -> Name {
        self.seq += 1;
        self.prefix
            .clone()
            .append_generic(self.seq.to_string().into_bytes())
    }

    /// Next publication stamped with `ts`.
    pub fn next_at(&mut self, ts: Timestamp, payload: &[u8]) -> Publication {
        Publication::new(self.next_name().append_timestamp(ts), payload.to_vec())
    }
}

/// Publications moved by one [`SessionPair::exchange`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeReport {
    pub left_to_right: usize,
    pub right_to_left: usize,
}

/// Two sessions sharing a manual clock.
pub struct SessionPair {
    pub clock: Arc<ManualClock>,
    pub left: PubsubSession,
    pub right: PubsubSession,
}

impl SessionPair {
    /// Pair with default configuration.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            clock: Arc::new(ManualClock::new(FIXTURE_EPOCH)),
            left: PubsubSession::new(config.clone().with_describe("left"))
                .expect("valid fixture config"),
            right: PubsubSession::new(config.with_describe("right"))
                .expect("valid fixture config"),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn advance(&self, by: Duration) -> Timestamp {
        self.clock.advance(by)
    }

    pub fn publish_left(&mut self, name: &str, payload: &[u8]) -> PublicationId {
        let now = self.now();
        self.left
            .publish(parse(name), payload.to_vec(), now, None)
            .expect("left session open")
            .id()
    }

    pub fn publish_right(&mut self, name: &str, payload: &[u8]) -> PublicationId {
        let now = self.now();
        self.right
            .publish(parse(name), payload.to_vec(), now, None)
            .expect("right session open")
            .id()
    }

    pub fn publish_left_with(
        &mut self,
        name: &str,
        payload: &[u8],
        callback: PublishCallback,
    ) -> PublicationId {
        let now = self.now();
        self.left
            .publish(parse(name), payload.to_vec(), now, Some(callback))
            .expect("left session open")
            .id()
    }

    /// One round in each direction: each side answers the other's summary
    /// and the other ingests the reply.
    pub fn exchange(&mut self) -> ExchangeReport {
        let now = self.now();
        let mut report = ExchangeReport::default();

        if let Some(reply) = self.left.respond(&self.right.summary(), now) {
            let accepted = self
                .right
                .ingest(reply.iter().map(|p| (**p).clone()), now)
                .expect("right session open");
            report.left_to_right = accepted.accepted();
        }
        if let Some(reply) = self.right.respond(&self.left.summary(), now) {
            let accepted = self
                .left
                .ingest(reply.iter().map(|p| (**p).clone()), now)
                .expect("left session open");
            report.right_to_left = accepted.accepted();
        }
        report
    }
}

impl Default for SessionPair {
    fn default() -> Self {
        Self::new()
    }
}

fn parse(name: &str) -> Name {
    name.parse().expect("valid fixture name")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_numbers_names() {
        let mut f = PublicationFactory::new("/app");
        let p1 = f.next_at(Timestamp(5), b"a");
        let p2 = f.next_at(Timestamp(5), b"a");
        assert_eq!(p1.name().to_string(), "/app/1/t=5");
        assert_eq!(p2.name().to_string(), "/app/2/t=5");
    }

    #[test]
    fn test_pair_exchange() {
        let mut pair = SessionPair::new();
        pair.publish_left("/l/1", b"x");
        pair.publish_right("/r/1", b"y");

        let report = pair.exchange();
        assert_eq!(report.left_to_right, 1);
        assert_eq!(report.right_to_left, 1);
        assert_eq!(pair.left.len(), 2);
        assert_eq!(pair.right.len(), 2);

        assert_eq!(pair.exchange(), ExchangeReport::default());
    }
}
