//! Lookup configuration with sensible defaults.
//!
//! [`LookupConfig`] controls the shared HTTP identity, the fetch timeout, and
//! each catalog's endpoint and rate-limit policy. The defaults are tuned for
//! polite scraping of the public search pages.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::LookupError;
use crate::types::SourceId;

/// Capacity policy for one source's [`crate::scheduler::RateLimitedScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitPolicy {
    /// Minimum spacing between two dispatches, in milliseconds.
    pub min_time_ms: u64,
    /// Requests allowed per refill window.
    pub reservoir: u32,
    /// Length of the refill window, in milliseconds.
    pub refresh_interval_ms: u64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            min_time_ms: 1200,
            reservoir: 30,
            refresh_interval_ms: 60_000,
        }
    }
}

/// Endpoint and throttling for a single catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Search page the adapter appends its query parameters to. Falls back
    /// to the catalog's public search page when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub rate_limit: RateLimitPolicy,
}

impl SourceConfig {
    /// Resolve the search page for `source`.
    pub fn base_url(&self, source: SourceId) -> Result<Url, LookupError> {
        let raw = self
            .base_url
            .as_deref()
            .unwrap_or_else(|| default_base_url(source));
        Url::parse(raw)
            .map_err(|e| LookupError::Config(format!("{source}: invalid base_url {raw:?}: {e}")))
    }
}

fn default_base_url(source: SourceId) -> &'static str {
    match source {
        SourceId::Jwid => "https://www2.jasrac.or.jp/eJwid/main",
        SourceId::NexTone => "https://search.nex-tone.co.jp/",
    }
}

/// Configuration for the lookup pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Identity sent with every catalog request.
    pub user_agent: String,
    /// Locale preference sent with every catalog request.
    pub accept_language: String,
    pub jwid: SourceConfig,
    pub nextone: SourceConfig,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: "Mozilla/5.0".to_owned(),
            accept_language: "ja-JP".to_owned(),
            jwid: SourceConfig::default(),
            nextone: SourceConfig::default(),
        }
    }
}

impl LookupConfig {
    /// Returns the section for `source`.
    pub fn source(&self, source: SourceId) -> &SourceConfig {
        match source {
            SourceId::Jwid => &self.jwid,
            SourceId::NexTone => &self.nextone,
        }
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - `user_agent` must not be empty
    /// - every source `base_url` must parse
    /// - every `rate_limit.reservoir` and `rate_limit.refresh_interval_ms` must be greater than 0
    pub fn validate(&self) -> Result<(), LookupError> {
        if self.timeout_seconds == 0 {
            return Err(LookupError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(LookupError::Config("user_agent must not be empty".into()));
        }
        for &source in SourceId::all() {
            let section = self.source(source);
            section.base_url(source)?;
            if section.rate_limit.reservoir == 0 {
                return Err(LookupError::Config(format!(
                    "{source}: reservoir must be greater than 0"
                )));
            }
            if section.rate_limit.refresh_interval_ms == 0 {
                return Err(LookupError::Config(format!(
                    "{source}: refresh_interval_ms must be greater than 0"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = LookupConfig::default();
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.user_agent, "Mozilla/5.0");
        assert_eq!(config.accept_language, "ja-JP");
        let jwid = config.jwid.base_url(SourceId::Jwid).expect("default url");
        let nextone = config.nextone.base_url(SourceId::NexTone).expect("default url");
        assert_eq!(jwid.host_str(), Some("www2.jasrac.or.jp"));
        assert_eq!(nextone.host_str(), Some("search.nex-tone.co.jp"));
    }

    #[test]
    fn default_rate_limit_policy() {
        let policy = RateLimitPolicy::default();
        assert_eq!(policy.min_time_ms, 1200);
        assert_eq!(policy.reservoir, 30);
        assert_eq!(policy.refresh_interval_ms, 60_000);
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(LookupConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = LookupConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn empty_user_agent_rejected() {
        let config = LookupConfig {
            user_agent: "  ".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("user_agent"));
    }

    #[test]
    fn zero_reservoir_rejected() {
        let mut config = LookupConfig::default();
        config.nextone.rate_limit.reservoir = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("NexTone"));
        assert!(err.to_string().contains("reservoir"));
    }

    #[test]
    fn zero_refresh_interval_rejected() {
        let mut config = LookupConfig::default();
        config.jwid.rate_limit.refresh_interval_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("refresh_interval_ms"));
    }

    #[test]
    fn zero_min_time_valid() {
        let mut config = LookupConfig::default();
        config.jwid.rate_limit.min_time_ms = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_base_url_rejected() {
        let mut config = LookupConfig::default();
        config.jwid.base_url = Some("not a url".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn source_section_lookup() {
        let config = LookupConfig::default();
        assert!(std::ptr::eq(config.source(SourceId::Jwid), &config.jwid));
        assert!(std::ptr::eq(config.source(SourceId::NexTone), &config.nextone));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: LookupConfig =
            serde_json::from_str(r#"{"timeout_seconds": 3, "nextone": {"rate_limit": {"reservoir": 5}}}"#)
                .expect("deserialize");
        assert_eq!(config.timeout_seconds, 3);
        assert_eq!(config.nextone.rate_limit.reservoir, 5);
        assert_eq!(config.nextone.rate_limit.min_time_ms, 1200);
        assert_eq!(config.accept_language, "ja-JP");
        let nextone = config.nextone.base_url(SourceId::NexTone).expect("default url");
        assert_eq!(nextone.host_str(), Some("search.nex-tone.co.jp"));
    }

    #[test]
    fn custom_base_url_overrides_default() {
        let mut config = LookupConfig::default();
        config.nextone.base_url = Some("http://127.0.0.1:8080/search".into());
        let url = config.nextone.base_url(SourceId::NexTone).expect("valid");
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/search");
    }
}
