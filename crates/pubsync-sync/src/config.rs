//! Session configuration.

use pubsync_policy::PolicyConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Configuration for a [`PubsubSession`](crate::PubsubSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Lifetime and clock-skew bounds shared with the policy.
    pub policy: PolicyConfig,
    /// Advisory byte budget for publications in one response.
    pub sync_data_pub_size: usize,
    /// Label used in log events.
    pub describe: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            sync_data_pub_size: 1300,
            describe: None,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON document.
    ///
    /// ```json
    /// { "policy": { "max_pub_lifetime_ms": 1000, "max_clock_skew_ms": 1000 },
    ///   "sync_data_pub_size": 1300 }
    /// ```
    pub fn from_json(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.policy.max_pub_lifetime.is_zero() {
            return Err(SyncError::InvalidConfig(
                "max_pub_lifetime must be positive".into(),
            ));
        }
        if self.sync_data_pub_size == 0 {
            return Err(SyncError::InvalidConfig(
                "sync_data_pub_size must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn with_describe(mut self, describe: impl Into<String>) -> Self {
        self.describe = Some(describe.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_from_json() {
        let config = SessionConfig::from_json(
            r#"{ "policy": { "max_pub_lifetime_ms": 4000 }, "sync_data_pub_size": 800 }"#,
        )
        .unwrap();
        assert_eq!(config.policy.max_pub_lifetime, Duration::from_secs(4));
        assert_eq!(config.policy.max_clock_skew, Duration::from_secs(1));
        assert_eq!(config.sync_data_pub_size, 800);
        assert_eq!(config.describe, None);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(
            SessionConfig::from_json("{}").unwrap(),
            SessionConfig::default()
        );
    }

    #[test]
    fn test_rejects_zero_lifetime() {
        let err = SessionConfig::from_json(r#"{ "policy": { "max_pub_lifetime_ms": 0 } }"#)
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_zero_budget() {
        let err = SessionConfig::from_json(r#"{ "sync_data_pub_size": 0 }"#).unwrap_err();
        assert!(matches!(err, SyncError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = SessionConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, SyncError::ConfigParse(_)));
    }
}
