//! Publications and their content-addressed identifiers.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::name::Name;
use crate::timestamp::{Timestamp, TimestampConvention};

/// Domain separator for publication ids.
const ID_DOMAIN: &[u8] = b"pubsync-pub-v0:";

/// An immutable named record.
///
/// The last name component is expected to be a timestamp component; see
/// [`TimestampConvention`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Publication {
    name: Name,
    payload: Bytes,
}

impl Publication {
    pub fn new(name: Name, payload: impl Into<Bytes>) -> Self {
        Self {
            name,
            payload: payload.into(),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Timestamp from the last name component.
    ///
    /// `None` when the name is empty or the last component is not a
    /// well-formed timestamp component.
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.name.last().and_then(TimestampConvention::parse)
    }

    /// Timestamp from the last name component, with [`Timestamp::ZERO`]
    /// standing in for "unparseable".
    pub fn timestamp_or_zero(&self) -> Timestamp {
        self.timestamp().unwrap_or(Timestamp::ZERO)
    }

    /// Size counted against a response budget: name TLV plus payload.
    pub fn encoded_len(&self) -> usize {
        self.name.encoded_len() + self.payload.len()
    }

    /// Compute the content-addressed identifier.
    ///
    /// Blake3(domain || name TLV || payload length || payload).
    pub fn compute_id(&self) -> PublicationId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(ID_DOMAIN);
        hasher.update(&self.name.encode());
        hasher.update(&(self.payload.len() as u64).to_be_bytes());
        hasher.update(&self.payload);
        PublicationId(*hasher.finalize().as_bytes())
    }
}

impl AsRef<Publication> for Publication {
    fn as_ref(&self) -> &Publication {
        self
    }
}

/// A 32-byte publication identifier.
///
/// Two publications with the same name and payload share an id; the sync
/// engine uses it as the dedup key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublicationId(pub [u8; 32]);

impl PublicationId {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for PublicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicationId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for PublicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for PublicationId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for PublicationId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::Component;

    fn publication(uri: &str, payload: &'static [u8]) -> Publication {
        Publication::new(uri.parse().unwrap(), payload)
    }

    #[test]
    fn test_timestamp_from_last_component() {
        let p = publication("/app/1/t=1234", b"");
        assert_eq!(p.timestamp(), Some(Timestamp(1234)));
        assert_eq!(p.timestamp_or_zero(), Timestamp(1234));
    }

    #[test]
    fn test_timestamp_not_last_is_ignored() {
        let p = publication("/app/t=1234/1", b"");
        assert_eq!(p.timestamp(), None);
        assert_eq!(p.timestamp_or_zero(), Timestamp::ZERO);
    }

    #[test]
    fn test_empty_name_has_no_timestamp() {
        let p = Publication::new(Name::new(), Bytes::new());
        assert_eq!(p.timestamp(), None);
    }

    #[test]
    fn test_id_depends_on_name_and_payload() {
        let a = publication("/app/1/t=1", b"x");
        let b = publication("/app/1/t=1", b"x");
        let c = publication("/app/1/t=2", b"x");
        let d = publication("/app/1/t=1", b"y");

        assert_eq!(a.compute_id(), b.compute_id());
        assert_ne!(a.compute_id(), c.compute_id());
        assert_ne!(a.compute_id(), d.compute_id());
    }

    #[test]
    fn test_id_separates_name_from_payload() {
        let a = Publication::new(
            Name::new().append(Component::generic("ab")),
            Bytes::from_static(b"c"),
        );
        let b = Publication::new(
            Name::new().append(Component::generic("a")),
            Bytes::from_static(b"bc"),
        );
        assert_ne!(a.compute_id(), b.compute_id());
    }

    #[test]
    fn test_id_hex_roundtrip() {
        let id = publication("/app/t=9", b"z").compute_id();
        assert_eq!(PublicationId::from_hex(&id.to_hex()).unwrap(), id);
        assert_eq!(id.to_string().len(), 16);
        assert!(format!("{:?}", id).starts_with("PublicationId("));
        assert!(PublicationId::from_hex("abcd").is_err());
    }

    #[test]
    fn test_encoded_len() {
        let p = publication("/a/t=1", b"hello");
        assert_eq!(p.encoded_len(), 8 + 5);
    }
}
