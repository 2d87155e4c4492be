//! Names and name components.
//!
//! A [`Name`] is an ordered sequence of [`Component`]s. Each component is a
//! TLV element: a TLV-TYPE in `1..=0xFFFF` and an opaque value.
//!
//! URI form follows the usual conventions:
//! - generic components (type 8) print as their escaped value
//! - timestamp components print as `t=<micros>`
//! - other typed components print as `<type>=<escaped value>`
//! - a value made only of periods gets three extra periods appended

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};
use crate::timestamp::{Timestamp, TimestampConvention};
use crate::tlv::{encode_nni, read_tlv, tlv_len, var_number_len, write_tlv, write_var_number};

/// TLV-TYPE numbers used by names.
pub mod tt {
    pub const NAME: u64 = 0x07;
    pub const GENERIC: u16 = 0x08;
    pub const TIMESTAMP: u16 = 0x24;
}

/// A single name component.
///
/// Immutable. Ordered by TLV-TYPE, then value length, then value bytes.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Component {
    tlv_type: u16,
    value: Bytes,
}

/// Tagged view of a component.
///
/// Produced by [`Component::kind`], which checks the TLV-TYPE before
/// interpreting the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind<'a> {
    Timestamp(Timestamp),
    Other { tlv_type: u16, value: &'a [u8] },
}

impl Component {
    /// Create a component with an explicit TLV-TYPE.
    pub fn new(tlv_type: u16, value: impl Into<Bytes>) -> Result<Self> {
        if tlv_type == 0 {
            return Err(CoreError::InvalidComponentType(0));
        }
        Ok(Self::from_parts(tlv_type, value))
    }

    /// Create a generic component.
    pub fn generic(value: impl Into<Bytes>) -> Self {
        Self::from_parts(tt::GENERIC, value)
    }

    pub(crate) fn from_parts(tlv_type: u16, value: impl Into<Bytes>) -> Self {
        Self {
            tlv_type,
            value: value.into(),
        }
    }

    pub fn tlv_type(&self) -> u16 {
        self.tlv_type
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn kind(&self) -> ComponentKind<'_> {
        match TimestampConvention::parse(self) {
            Some(ts) => ComponentKind::Timestamp(ts),
            None => ComponentKind::Other {
                tlv_type: self.tlv_type,
                value: &self.value,
            },
        }
    }

    /// Encoded TLV size.
    pub fn encoded_len(&self) -> usize {
        tlv_len(u64::from(self.tlv_type), self.value.len())
    }

    /// Append the TLV encoding to `buf`.
    pub fn encode_to(&self, buf: &mut Vec<u8>) {
        write_tlv(buf, u64::from(self.tlv_type), &self.value);
    }

    /// Decode a component from exactly one TLV element.
    pub fn decode(input: &[u8]) -> Result<Self> {
        let (comp, consumed) = Self::decode_prefix(input)?;
        if consumed != input.len() {
            return Err(CoreError::TrailingBytes(input.len() - consumed));
        }
        Ok(comp)
    }

    fn decode_prefix(input: &[u8]) -> Result<(Self, usize)> {
        let (tlv_type, value, consumed) = read_tlv(input)?;
        let tlv_type = match u16::try_from(tlv_type) {
            Ok(t) if t != 0 => t,
            _ => return Err(CoreError::InvalidComponentType(tlv_type)),
        };
        Ok((
            Self::from_parts(tlv_type, Bytes::copy_from_slice(value)),
            consumed,
        ))
    }

    /// Parse the URI form of a single component.
    pub fn from_uri(input: &str) -> Result<Self> {
        if let Some(digits) = input.strip_prefix("t=") {
            let micros = digits
                .parse::<u64>()
                .map_err(|_| CoreError::InvalidUri(format!("bad timestamp: {input}")))?;
            return Ok(TimestampConvention::create(Timestamp(micros)));
        }

        let (tlv_type, escaped) = match input.split_once('=') {
            Some((prefix, rest))
                if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) =>
            {
                match prefix.parse::<u16>() {
                    Ok(t) if t != 0 => (t, rest),
                    _ => return Err(CoreError::InvalidUri(format!("bad type: {input}"))),
                }
            }
            _ => (tt::GENERIC, input),
        };

        let mut value = percent_decode(escaped)?;
        if value.iter().all(|b| *b == b'.') {
            if value.len() < 3 {
                return Err(CoreError::InvalidUri(format!(
                    "reserved component: {input}"
                )));
            }
            value.truncate(value.len() - 3);
        }
        Ok(Self::from_parts(tlv_type, value))
    }
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tlv_type
            .cmp(&other.tlv_type)
            .then_with(|| self.value.len().cmp(&other.value.len()))
            .then_with(|| self.value.as_ref().cmp(other.value.as_ref()))
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            // only the shortest NNI form survives a trip through `t=`
            ComponentKind::Timestamp(ts) if encode_nni(ts.as_micros()) == &self.value[..] => {
                return write!(f, "t={}", ts);
            }
            ComponentKind::Other { tlv_type, .. } if tlv_type == tt::GENERIC => {}
            _ => write!(f, "{}=", self.tlv_type)?,
        }
        for b in self.value.iter() {
            if is_unreserved(*b) {
                write!(f, "{}", *b as char)?;
            } else {
                write!(f, "%{:02X}", b)?;
            }
        }
        if self.value.iter().all(|b| *b == b'.') {
            f.write_str("...")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({})", self)
    }
}

impl FromStr for Component {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_uri(s)
    }
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

fn percent_decode(input: &str) -> Result<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| CoreError::InvalidUri(format!("bad escape in {input}")))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// A hierarchical name.
///
/// Ordered component-wise; a proper prefix sorts before its extensions.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Name(Vec<Component>);

impl Name {
    /// The empty name `/`.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_components(components: Vec<Component>) -> Self {
        Self(components)
    }

    /// Return this name with `component` appended.
    pub fn append(mut self, component: Component) -> Self {
        self.0.push(component);
        self
    }

    /// Return this name with a generic component appended.
    pub fn append_generic(self, value: impl Into<Bytes>) -> Self {
        self.append(Component::generic(value))
    }

    /// Return this name with a timestamp component appended.
    pub fn append_timestamp(self, timestamp: Timestamp) -> Self {
        self.append(TimestampConvention::create(timestamp))
    }

    pub fn push(&mut self, component: Component) {
        self.0.push(component);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn components(&self) -> &[Component] {
        &self.0
    }

    /// Component at `index`; negative indices count from the end (`-1` is last).
    pub fn get(&self, index: isize) -> Option<&Component> {
        let i = if index < 0 {
            self.0.len().checked_sub(index.unsigned_abs())?
        } else {
            index as usize
        };
        self.0.get(i)
    }

    pub fn last(&self) -> Option<&Component> {
        self.0.last()
    }

    /// First `n` components (all of them if `n` exceeds the length).
    pub fn prefix(&self, n: usize) -> Name {
        Self(self.0[..n.min(self.0.len())].to_vec())
    }

    /// Whether `self` is a prefix of (or equal to) `other`.
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.0.len() <= other.0.len() && self.0[..] == other.0[..self.0.len()]
    }

    fn value_len(&self) -> usize {
        self.0.iter().map(Component::encoded_len).sum()
    }

    /// Encoded TLV size.
    pub fn encoded_len(&self) -> usize {
        tlv_len(tt::NAME, self.value_len())
    }

    /// Encode as a Name TLV (type `0x07`).
    pub fn encode(&self) -> Vec<u8> {
        let value_len = self.value_len();
        let mut buf = Vec::with_capacity(
            var_number_len(tt::NAME) + var_number_len(value_len as u64) + value_len,
        );
        write_var_number(&mut buf, tt::NAME);
        write_var_number(&mut buf, value_len as u64);
        for comp in &self.0 {
            comp.encode_to(&mut buf);
        }
        buf
    }

    /// Decode a Name TLV.
    pub fn decode(input: &[u8]) -> Result<Self> {
        let (tlv_type, mut value, consumed) = read_tlv(input)?;
        if tlv_type != tt::NAME {
            return Err(CoreError::UnexpectedType {
                expected: tt::NAME,
                got: tlv_type,
            });
        }
        if consumed != input.len() {
            return Err(CoreError::TrailingBytes(input.len() - consumed));
        }

        let mut components = Vec::new();
        while !value.is_empty() {
            let (comp, used) = Component::decode_prefix(value)?;
            components.push(comp);
            value = &value[used..];
        }
        Ok(Self(components))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for comp in &self.0 {
            write!(f, "/{}", comp)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self)
    }
}

impl FromStr for Name {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let path = s.strip_prefix("ndn:").unwrap_or(s);
        path.split('/')
            .filter(|seg| !seg.is_empty())
            .map(Component::from_uri)
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

impl From<Vec<Component>> for Name {
    fn from(components: Vec<Component>) -> Self {
        Self(components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn name(uri: &str) -> Name {
        uri.parse().unwrap()
    }

    #[test]
    fn test_uri_display_parse_agree() {
        let n = Name::new()
            .append_generic("demo")
            .append(Component::new(0x21, vec![0x01u8]).unwrap())
            .append_generic(b"a b".to_vec())
            .append_timestamp(Timestamp(1_700_000_000_123_456));

        let uri = n.to_string();
        assert_eq!(uri, "/demo/33=%01/a%20b/t=1700000000123456");
        assert_eq!(name(&uri), n);
    }

    #[test]
    fn test_non_minimal_timestamp_keeps_wire_form() {
        let padded = Component::from_parts(tt::TIMESTAMP, vec![0x00u8, 0x01]);
        assert_eq!(padded.kind(), ComponentKind::Timestamp(Timestamp(1)));
        assert_eq!(padded.to_string(), "36=%00%01");

        let n = Name::new().append_generic("a").append(padded);
        let back = name(&n.to_string());
        assert_eq!(back.encode(), n.encode());
        assert_eq!(back, n);

        let minimal = Name::new().append_generic("a").append_timestamp(Timestamp(1));
        assert_eq!(minimal.to_string(), "/a/t=1");
    }

    #[test]
    fn test_period_components() {
        let empty = Component::generic(Vec::<u8>::new());
        assert_eq!(empty.to_string(), "...");
        assert_eq!(Component::from_uri("...").unwrap(), empty);

        let dot = Component::generic(".");
        assert_eq!(dot.to_string(), "....");
        assert_eq!(Component::from_uri("....").unwrap(), dot);
    }

    #[test]
    fn test_bad_uris() {
        assert!(matches!(
            Component::from_uri("t=abc"),
            Err(CoreError::InvalidUri(_))
        ));
        assert!(matches!(
            Component::from_uri("0=x"),
            Err(CoreError::InvalidUri(_))
        ));
        assert!(matches!(
            Component::from_uri("a%zz"),
            Err(CoreError::InvalidUri(_))
        ));
        assert!(matches!(
            Component::from_uri("a%+1"),
            Err(CoreError::InvalidUri(_))
        ));
        assert!(matches!(
            Component::from_uri("a%-1"),
            Err(CoreError::InvalidUri(_))
        ));
        assert_eq!(Component::from_uri("a%2b").unwrap().value(), b"a+");
    }

    #[test]
    fn test_single_and_double_period_rejected() {
        for uri in [".", "..", "33=.", "33=..", "%2E%2E"] {
            assert!(
                matches!(Component::from_uri(uri), Err(CoreError::InvalidUri(_))),
                "{uri} should be rejected"
            );
        }
        assert!("/a/../b".parse::<Name>().is_err());
        assert_eq!(Component::from_uri(".....").unwrap().value(), b"..");
        assert_eq!(Component::from_uri(".....").unwrap().to_string(), ".....");
    }

    #[test]
    fn test_component_new_rejects_type_zero() {
        assert_eq!(
            Component::new(0, vec![1u8]),
            Err(CoreError::InvalidComponentType(0))
        );
    }

    #[test]
    fn test_kind_checks_tag_first() {
        let ts = TimestampConvention::create(Timestamp(7));
        assert_eq!(ts.kind(), ComponentKind::Timestamp(Timestamp(7)));

        let generic = Component::generic(vec![7u8]);
        assert_eq!(
            generic.kind(),
            ComponentKind::Other {
                tlv_type: tt::GENERIC,
                value: &[7]
            }
        );
    }

    #[test]
    fn test_negative_index() {
        let n = name("/a/b/c");
        assert_eq!(n.get(-1).unwrap().value(), b"c");
        assert_eq!(n.get(-3).unwrap().value(), b"a");
        assert!(n.get(-4).is_none());
        assert_eq!(n.get(1).unwrap().value(), b"b");
        assert!(n.get(3).is_none());
    }

    #[test]
    fn test_prefix_relations() {
        assert!(name("/a").is_prefix_of(&name("/a/b")));
        assert!(name("/a/b").is_prefix_of(&name("/a/b")));
        assert!(Name::new().is_prefix_of(&name("/a")));
        assert!(!name("/a/b").is_prefix_of(&name("/a")));
        assert!(!name("/b").is_prefix_of(&name("/a/b")));
        assert_eq!(name("/a/b/c").prefix(2), name("/a/b"));
    }

    #[test]
    fn test_component_order() {
        let mut comps = vec![
            Component::generic("bb"),
            Component::new(0x21, "a").unwrap(),
            Component::generic("b"),
            Component::generic("ab"),
        ];
        comps.sort();
        let uris: Vec<String> = comps.iter().map(|c| c.to_string()).collect();
        assert_eq!(uris, ["b", "ab", "bb", "33=a"]);
    }

    #[test]
    fn test_wire_encoding() {
        let n = name("/a/t=1");
        assert_eq!(
            n.encode(),
            vec![0x07, 0x06, 0x08, 0x01, b'a', 0x24, 0x01, 0x01]
        );
        assert_eq!(n.encoded_len(), 8);
        assert_eq!(Name::decode(&n.encode()).unwrap(), n);
    }

    #[test]
    fn test_decode_rejects_wrong_outer_type() {
        assert_eq!(
            Name::decode(&[0x08, 0x00]),
            Err(CoreError::UnexpectedType {
                expected: 0x07,
                got: 0x08
            })
        );
        assert_eq!(
            Name::decode(&[0x07, 0x00, 0xff]),
            Err(CoreError::TrailingBytes(1))
        );
    }

    #[test]
    fn test_serde_json_shape() {
        let n = name("/x/t=5");
        let json = serde_json::to_string(&n).unwrap();
        let back: Name = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
    }

    proptest! {
        #[test]
        fn test_uri_parse_inverts_display(
            values in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..12), 0..6),
        ) {
            let n = Name::from_components(values.into_iter().map(Component::generic).collect());
            prop_assert_eq!(name(&n.to_string()), n);
        }
    }
}
