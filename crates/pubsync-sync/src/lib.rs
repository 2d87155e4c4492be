//! # pubsync Sync
//!
//! A syncps-style publish/subscribe session that consumes the lifecycle
//! policy.
//!
//! ## Overview
//!
//! Each participant keeps a table of publications. Own publications are
//! stamped with a timestamp component when published; remote ones arrive
//! through reconciliation. A [`SyncState`] summary of active publication ids
//! stands in for the set-reconciliation digest a real transport would carry.
//!
//! ## Publication Timers
//!
//! Relative to the local arrival time of a publication:
//!
//! ```text
//!   arrival + max_pub_lifetime                   expired (LOST if unconfirmed)
//!   arrival + max_pub_lifetime + max_clock_skew  removed from the summary
//!   arrival + 2 * max_pub_lifetime               forgotten
//! ```
//!
//! Timers are driven explicitly through [`PubsubSession::tick`].
//!
//! ## Message Flow
//!
//! ```text
//! Node A                                   Node B
//!   |-- summary() ------------------------->|
//!   |                                       | respond(summary_a)
//!   |<-------------------- publications ----|
//!   | ingest(publications)                  |
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pubsync_core::{Name, Timestamp};
//! use pubsync_sync::{PubsubSession, SessionConfig};
//!
//! let mut a = PubsubSession::new(SessionConfig::default()).unwrap();
//! let mut b = PubsubSession::new(SessionConfig::default()).unwrap();
//! let now = Timestamp(1_000_000);
//!
//! let topic: Name = "/chat".parse().unwrap();
//! let mut sub = b.subscribe(topic.clone());
//!
//! a.publish(topic.append_generic("hello"), &b"hi"[..], now, None).unwrap();
//!
//! let reply = a.respond(&b.summary(), now).unwrap();
//! let report = b.ingest(reply.iter().map(|p| (**p).clone()), now).unwrap();
//! assert_eq!(report.delivered, 1);
//! assert!(sub.try_recv().is_some());
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod state;
pub mod subscription;

pub use config::SessionConfig;
pub use error::{Result, SyncError};
pub use session::{IngestReport, PublishCallback, PublishOutcome, PubsubSession, TickReport};
pub use state::SyncState;
pub use subscription::Subscription;
