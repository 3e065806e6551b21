//! Persisted workspace state
//!
//! The state file records which chart a workspace was initialized from and the
//! fingerprint of the content last applied, so later runs can detect upstream
//! changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk envelope, versioned so the record can evolve
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StateFile {
    #[serde(default)]
    pub v1: State,
}

/// The persisted record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Chart reference currently in use
    #[serde(default, rename = "chartURL", skip_serializing_if = "String::is_empty")]
    pub chart_url: String,

    /// Fingerprint of the chart content last resolved for `chart_url`
    #[serde(default, rename = "contentSHA", skip_serializing_if = "String::is_empty")]
    pub content_sha: String,

    /// Operator supplied configuration values
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, serde_json::Value>,

    /// Operator edited values.yaml contents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helm_values: Option<String>,
}

impl State {
    /// The chart reference, if one has been recorded
    pub fn current_chart_url(&self) -> Option<&str> {
        Some(self.chart_url.as_str()).filter(|url| !url.is_empty())
    }

    /// The last content fingerprint, if one has been recorded
    pub fn current_sha(&self) -> Option<&str> {
        Some(self.content_sha.as_str()).filter(|sha| !sha.is_empty())
    }

    /// Record a new chart reference
    ///
    /// A fingerprint only means something for the URL it was fetched from, so
    /// changing the URL forgets the old one.
    pub fn set_chart_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        if url != self.chart_url {
            self.content_sha.clear();
        }
        self.chart_url = url;
    }

    pub fn set_content_sha(&mut self, sha: impl Into<String>) {
        self.content_sha = sha.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_file_format() {
        let mut state = State::default();
        state.set_chart_url("https://charts.example.com/nginx-1.0.0.tgz");
        state.set_content_sha("abc123");

        let json = serde_json::to_string(&StateFile { v1: state }).unwrap();
        assert_eq!(
            json,
            r#"{"v1":{"chartURL":"https://charts.example.com/nginx-1.0.0.tgz","contentSHA":"abc123"}}"#
        );
    }

    #[test]
    fn test_parse_state_with_config() {
        let json = r#"{"v1":{"chartURL":"./chart","contentSHA":"abc","config":{"app_name":"demo"},"helmValues":"replicas: 2\n"}}"#;
        let file: StateFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.v1.current_chart_url(), Some("./chart"));
        assert_eq!(file.v1.current_sha(), Some("abc"));
        assert_eq!(file.v1.config["app_name"], "demo");
        assert_eq!(file.v1.helm_values.as_deref(), Some("replicas: 2\n"));
    }

    #[test]
    fn test_empty_fields_are_absent() {
        let file: StateFile = serde_json::from_str("{}").unwrap();
        assert_eq!(file.v1.current_chart_url(), None);
        assert_eq!(file.v1.current_sha(), None);
    }

    #[test]
    fn test_changing_url_forgets_sha() {
        let mut state = State::default();
        state.set_chart_url("a");
        state.set_content_sha("sha-a");

        state.set_chart_url("a");
        assert_eq!(state.current_sha(), Some("sha-a"));

        state.set_chart_url("b");
        assert_eq!(state.current_sha(), None);
    }
}
