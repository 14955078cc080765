//! Serializable client settings.
//!
//! [`ClientSettings`] mirrors the option block fixtures are usually
//! configured with, so a client can be described in JSON:
//!
//! ```json
//! {
//!   "baseURL": "https://localhost:3000",
//!   "extraHTTPHeaders": { "x-api-key": "secret" },
//!   "ignoreHTTPSErrors": true,
//!   "timeout": 5000
//! }
//! ```

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Client-level settings.
///
/// Turn into a client with
/// [`ClientBuilder::from_settings`](crate::ClientBuilder::from_settings).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    /// Base URL request paths are resolved against.
    #[serde(rename = "baseURL", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Headers sent with every request.
    #[serde(rename = "extraHTTPHeaders", skip_serializing_if = "IndexMap::is_empty")]
    pub extra_http_headers: IndexMap<String, String>,

    /// Skip server certificate verification.
    #[serde(rename = "ignoreHTTPSErrors")]
    pub ignore_https_errors: bool,

    /// Default request timeout in milliseconds. `0` disables it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Session connect timeout in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u64>,
}

impl ClientSettings {
    /// Parse settings from a JSON document. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub(crate) fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_millis)
    }

    pub(crate) fn connect_timeout_duration(&self) -> Option<Duration> {
        self.connect_timeout.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_json() {
        let settings = ClientSettings::from_json(
            r#"{
                "baseURL": "https://localhost:3000",
                "extraHTTPHeaders": {"x-b": "2", "x-a": "1"},
                "ignoreHTTPSErrors": true,
                "timeout": 5000,
                "connectTimeout": 250
            }"#,
        )
        .unwrap();

        assert_eq!(settings.base_url.as_deref(), Some("https://localhost:3000"));
        let names: Vec<_> = settings.extra_http_headers.keys().collect();
        assert_eq!(names, ["x-b", "x-a"]);
        assert!(settings.ignore_https_errors);
        assert_eq!(settings.timeout_duration(), Some(Duration::from_secs(5)));
        assert_eq!(
            settings.connect_timeout_duration(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_settings_defaults() {
        let settings = ClientSettings::from_json("{}").unwrap();
        assert_eq!(settings, ClientSettings::default());
        assert!(!settings.ignore_https_errors);
        assert!(settings.timeout_duration().is_none());
    }

    #[test]
    fn test_settings_serialize_uses_fixture_keys() {
        let settings = ClientSettings {
            base_url: Some("http://127.0.0.1:3000".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(
            json,
            r#"{"baseURL":"http://127.0.0.1:3000","ignoreHTTPSErrors":false}"#
        );
    }

    #[test]
    fn test_settings_reject_wrong_types() {
        assert!(ClientSettings::from_json(r#"{"timeout": "soon"}"#).is_err());
    }
}
