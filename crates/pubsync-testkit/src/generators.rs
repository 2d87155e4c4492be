//! Proptest generators for property-based testing.

use proptest::prelude::*;

use pubsync_core::{Component, Name, Publication, Timestamp};

/// Generate a generic component with a short value.
pub fn generic_component() -> impl Strategy<Value = Component> {
    prop::collection::vec(any::<u8>(), 0..16).prop_map(Component::generic)
}

/// Generate a component of any valid TLV-TYPE.
pub fn component() -> impl Strategy<Value = Component> {
    (1u16..=0xffff, prop::collection::vec(any::<u8>(), 0..16))
        .prop_map(|(t, v)| Component::new(t, v).expect("type is non-zero"))
}

/// Generate a name of generic components.
pub fn name(max_len: usize) -> impl Strategy<Value = Name> {
    prop::collection::vec(generic_component(), 0..=max_len).prop_map(Name::from_components)
}

/// Generate a timestamp well clear of the epoch.
pub fn timestamp() -> impl Strategy<Value = Timestamp> {
    (1_000_000_000u64..=1u64 << 56).prop_map(Timestamp)
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Parameters for generating a publication.
#[derive(Debug, Clone)]
pub struct PublicationParams {
    pub prefix: Name,
    pub timestamp: Timestamp,
    pub payload: Vec<u8>,
}

impl Arbitrary for PublicationParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (name(4), timestamp(), payload(64))
            .prop_map(|(prefix, timestamp, payload)| PublicationParams {
                prefix,
                timestamp,
                payload,
            })
            .boxed()
    }
}

/// Build a publication whose last component is the timestamp.
pub fn publication_from_params(params: &PublicationParams) -> Publication {
    Publication::new(
        params.prefix.clone().append_timestamp(params.timestamp),
        params.payload.clone(),
    )
}

/// Generate a set of publications with distinct names and timestamps
/// drawn from a narrow range, so ties are common.
pub fn publication_set(max_len: usize) -> impl Strategy<Value = Vec<Publication>> {
    prop::collection::vec(0u64..8, 0..=max_len).prop_map(|timestamps| {
        timestamps
            .into_iter()
            .enumerate()
            .map(|(i, ts)| {
                Publication::new(
                    Name::new()
                        .append_generic(i.to_string().into_bytes())
                        .append_timestamp(Timestamp(ts)),
                    Vec::<u8>::new(),
                )
            })
            .collect()
    })
}
