//! # pubsync Policy
//!
//! The publication lifecycle policy a sync application hands to its sync
//! engine.
//!
//! ## Overview
//!
//! Two pure decision functions:
//!
//! - [`is_expired`]: whether a publication has fallen outside the
//!   two-sided freshness window and should stop being offered
//! - [`merge`]: deterministic ordering of locally known ("ours") and newly
//!   learned ("others") publications
//!
//! Both are stateless, never block, and never fail. The engine reaches them
//! through the [`SyncPolicy`] capability trait; [`LifecyclePolicy`] is the
//! default implementation.
//!
//! ## Freshness Window
//!
//! ```text
//!        expired      |          live           |     expired
//!   ------------------+-------------------------+----------------> elapsed
//!               -max_clock_skew     max_pub_lifetime + max_clock_skew
//! ```
//!
//! Both bounds are inclusive on the expired side.
//!
//! ## Usage
//!
//! ```rust
//! use pubsync_core::{Name, Publication, Timestamp};
//! use pubsync_policy::{LifecyclePolicy, PolicyConfig, SyncPolicy};
//!
//! let policy = LifecyclePolicy::new(PolicyConfig::default());
//! let name = Name::new().append_generic("app").append_timestamp(Timestamp(5_000_000));
//! let publication = Publication::new(name, &b"hello"[..]);
//!
//! assert!(policy.is_still_valid(&publication, Timestamp(5_000_000)));
//! assert!(!policy.is_still_valid(&publication, Timestamp(7_000_000)));
//! ```

pub mod clock;
pub mod config;
pub mod expiry;
pub mod merge;
pub mod policy;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::PolicyConfig;
pub use expiry::is_expired;
pub use merge::{merge, sort_newest_first};
pub use policy::{LifecyclePolicy, SyncPolicy};
