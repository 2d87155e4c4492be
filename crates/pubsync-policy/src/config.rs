//! Policy configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The two durations the sync engine supplies at session construction.
///
/// Serialized with millisecond fields `max_pub_lifetime_ms` and
/// `max_clock_skew_ms`; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// How long a publication remains valid after creation.
    #[serde(rename = "max_pub_lifetime_ms", with = "duration_millis")]
    pub max_pub_lifetime: Duration,
    /// Tolerance for clock disagreement between participants.
    #[serde(rename = "max_clock_skew_ms", with = "duration_millis")]
    pub max_clock_skew: Duration,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_pub_lifetime: Duration::from_millis(1000),
            max_clock_skew: Duration::from_millis(1000),
        }
    }
}

impl PolicyConfig {
    pub fn new(max_pub_lifetime: Duration, max_clock_skew: Duration) -> Self {
        Self {
            max_pub_lifetime,
            max_clock_skew,
        }
    }

    /// Age at which a publication is too old to keep offering.
    pub fn expiry_horizon(&self) -> Duration {
        self.max_pub_lifetime.saturating_add(self.max_clock_skew)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PolicyConfig::default();
        assert_eq!(config.max_pub_lifetime, Duration::from_secs(1));
        assert_eq!(config.max_clock_skew, Duration::from_secs(1));
        assert_eq!(config.expiry_horizon(), Duration::from_secs(2));
    }

    #[test]
    fn test_json_uses_millis() {
        let config = PolicyConfig::new(Duration::from_millis(4000), Duration::from_millis(250));
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "max_pub_lifetime_ms": 4000, "max_clock_skew_ms": 250 })
        );
    }

    #[test]
    fn test_json_missing_fields_default() {
        let config: PolicyConfig =
            serde_json::from_str(r#"{ "max_clock_skew_ms": 50 }"#).unwrap();
        assert_eq!(config.max_pub_lifetime, Duration::from_millis(1000));
        assert_eq!(config.max_clock_skew, Duration::from_millis(50));
    }
}
