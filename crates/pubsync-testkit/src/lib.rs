//! # pubsync Testkit
//!
//! Testing utilities for pubsync.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Generators**: Proptest strategies for names and timestamped publications
//! - **Fixtures**: Helpers for building publications and driving two sessions
//!   against each other on a manual clock
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use pubsync_testkit::generators::{publication_from_params, PublicationParams};
//!
//! proptest! {
//!     #[test]
//!     fn id_is_deterministic(params: PublicationParams) {
//!         let p1 = publication_from_params(&params);
//!         let p2 = publication_from_params(&params);
//!         prop_assert_eq!(p1.compute_id(), p2.compute_id());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use pubsync_testkit::fixtures::SessionPair;
//!
//! let mut pair = SessionPair::new();
//! pair.publish_left("/chat/hello", b"hi");
//! let moved = pair.exchange();
//! assert_eq!(moved.left_to_right, 1);
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{stamped, ExchangeReport, PublicationFactory, SessionPair};
pub use generators::{publication_from_params, PublicationParams};
