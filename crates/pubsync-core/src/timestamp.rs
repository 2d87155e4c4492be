//! Timestamps and the timestamp naming convention.
//!
//! A publication's creation time is carried in its last name component,
//! a NonNegativeInteger of microseconds under the reserved TLV-TYPE `0x24`.
//! Decoding checks the tag before trusting the payload.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::name::{tt, Component};
use crate::tlv::{decode_nni, encode_nni};

/// Microseconds since an arbitrary epoch.
///
/// Wraparound is not handled.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// The epoch. Also what an unparseable timestamp decodes to.
    pub const ZERO: Self = Self(0);

    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Current wall-clock time, in microseconds since the Unix epoch.
    pub fn now() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros())
            .unwrap_or(0);
        Self(u64::try_from(micros).unwrap_or(u64::MAX))
    }

    /// Add a duration, clamping at `u64::MAX` microseconds.
    pub fn saturating_add(self, duration: Duration) -> Self {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(micros))
    }

    /// Signed microseconds elapsed from `earlier` to `self`.
    ///
    /// Negative when `earlier` is actually later than `self`.
    pub fn signed_micros_since(&self, earlier: Timestamp) -> i128 {
        i128::from(self.0) - i128::from(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Timestamp {
    fn from(micros: u64) -> Self {
        Self(micros)
    }
}

/// The timestamp naming convention (TLV-TYPE `0x24`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampConvention;

impl TimestampConvention {
    /// Reserved TLV-TYPE of timestamp components.
    pub const TLV_TYPE: u16 = tt::TIMESTAMP;

    /// Build a timestamp component.
    pub fn create(timestamp: Timestamp) -> Component {
        Component::from_parts(Self::TLV_TYPE, encode_nni(timestamp.0))
    }

    /// Whether `component` is a well-formed timestamp component.
    pub fn matches(component: &Component) -> bool {
        Self::parse(component).is_some()
    }

    /// Decode a timestamp component.
    ///
    /// Returns `None` when the TLV-TYPE is not `0x24` or the value is not a
    /// valid NonNegativeInteger.
    pub fn parse(component: &Component) -> Option<Timestamp> {
        if component.tlv_type() != Self::TLV_TYPE {
            return None;
        }
        decode_nni(component.value()).ok().map(Timestamp)
    }

    /// Decode a timestamp component, mapping failure to [`Timestamp::ZERO`].
    ///
    /// Zero means "unparseable", not "earliest".
    pub fn parse_or_zero(component: &Component) -> Timestamp {
        Self::parse(component).unwrap_or(Timestamp::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_uses_reserved_type() {
        let comp = TimestampConvention::create(Timestamp(1_700_000_000_000_000));
        assert_eq!(comp.tlv_type(), 0x24);
        assert_eq!(comp.value().len(), 8);
        assert_eq!(
            TimestampConvention::parse(&comp),
            Some(Timestamp(1_700_000_000_000_000))
        );
    }

    #[test]
    fn test_parse_rejects_wrong_tag() {
        let comp = Component::from_parts(tt::GENERIC, encode_nni(42));
        assert_eq!(TimestampConvention::parse(&comp), None);
        assert_eq!(TimestampConvention::parse_or_zero(&comp), Timestamp::ZERO);
    }

    #[test]
    fn test_parse_rejects_bad_nni_length() {
        let comp = Component::from_parts(tt::TIMESTAMP, vec![1u8, 2, 3]);
        assert!(!TimestampConvention::matches(&comp));
        assert_eq!(TimestampConvention::parse_or_zero(&comp), Timestamp::ZERO);
    }

    #[test]
    fn test_signed_elapsed() {
        let t = Timestamp(1_000);
        assert_eq!(Timestamp(1_500).signed_micros_since(t), 500);
        assert_eq!(Timestamp(400).signed_micros_since(t), -600);
        assert_eq!(
            Timestamp(0).signed_micros_since(Timestamp(u64::MAX)),
            -i128::from(u64::MAX)
        );
    }

    #[test]
    fn test_saturating_add() {
        assert_eq!(
            Timestamp(10).saturating_add(Duration::from_millis(2)),
            Timestamp(2_010)
        );
        assert_eq!(
            Timestamp(u64::MAX - 1).saturating_add(Duration::from_secs(1)),
            Timestamp(u64::MAX)
        );
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(Timestamp::now() > Timestamp(1_577_836_800_000_000));
    }
}
