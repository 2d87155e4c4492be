//! # pubsync Core
//!
//! Pure primitives for pubsync: names, typed name components, the
//! timestamp naming convention, and publications.
//!
//! This crate contains no I/O, no clocks beyond [`Timestamp::now`], and no
//! networking.
//!
//! ## Key Types
//!
//! - [`Name`] - Hierarchical name, a sequence of [`Component`]s
//! - [`ComponentKind`] - Tagged view of a component (timestamp or other)
//! - [`Timestamp`] - Microseconds since an arbitrary epoch
//! - [`Publication`] - Immutable named record with a payload
//! - [`PublicationId`] - Content-addressed identifier (Blake3 hash)
//!
//! ## Timestamp Convention
//!
//! Publications carry their creation time in the last name component,
//! encoded as a NonNegativeInteger under TLV-TYPE `0x24`. See [`timestamp`].

pub mod error;
pub mod name;
pub mod publication;
pub mod timestamp;
pub mod tlv;

pub use error::{CoreError, Result};
pub use name::{tt, Component, ComponentKind, Name};
pub use publication::{Publication, PublicationId};
pub use timestamp::{Timestamp, TimestampConvention};
