//! # pubsync
//!
//! Publication lifecycle policy for syncps-style publish/subscribe sync.
//!
//! ## Overview
//!
//! Participants exchange small named publications. Each publication name
//! ends in a timestamp component (TLV type `0x24`) recording when it was
//! created. The policy decides two things:
//!
//! - **Freshness**: a publication is accepted only while its age is inside
//!   `(-max_clock_skew, max_pub_lifetime + max_clock_skew)`
//! - **Order**: after reconciliation, own publications go first, newest
//!   first, then everyone else's, newest first
//!
//! The session engine consumes the policy through the [`SyncPolicy`] trait
//! and drives publication timers, confirmations and subscriptions.
//!
//! ## Usage
//!
//! ```rust
//! use pubsync::{Name, PubsubSession, SessionConfig, Timestamp};
//!
//! let mut alice = PubsubSession::new(SessionConfig::default()).unwrap();
//! let mut bob = PubsubSession::new(SessionConfig::default()).unwrap();
//! let now = Timestamp(5_000_000);
//!
//! let mut updates = bob.subscribe("/chat".parse().unwrap());
//! let name: Name = "/chat/alice".parse().unwrap();
//! alice.publish(name, &b"hello"[..], now, None).unwrap();
//!
//! if let Some(reply) = alice.respond(&bob.summary(), now) {
//!     bob.ingest(reply.iter().map(|p| (**p).clone()), now).unwrap();
//! }
//! assert_eq!(&updates.try_recv().unwrap().payload()[..], b"hello");
//! ```
//!
//! ## Re-exports
//!
//! - `pubsync::core` - Names, components, timestamps and publications
//! - `pubsync::policy` - Expiry predicate, merge ordering, clocks
//! - `pubsync::sync` - The pub/sub session

pub mod error;

pub use pubsync_core as core;
pub use pubsync_policy as policy;
pub use pubsync_sync as sync;

pub use error::{PubsyncError, Result};

pub use pubsync_core::{
    Component, ComponentKind, Name, Publication, PublicationId, Timestamp, TimestampConvention,
};
pub use pubsync_policy::{
    is_expired, merge, Clock, LifecyclePolicy, ManualClock, PolicyConfig, SyncPolicy,
    SystemClock,
};
pub use pubsync_sync::{
    IngestReport, PublishCallback, PublishOutcome, PubsubSession, SessionConfig, Subscription,
    SyncState, TickReport,
};
