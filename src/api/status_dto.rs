use std::collections::HashMap;

use serde::Deserialize;

/// Raw `check_status` response. Besides `status` and `error_message` the
/// backend returns a varying set of named result links (plot paths, result
/// CSVs, convergence files); those are collected untyped and filtered into
/// the descriptor's link map at the domain boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusDto {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl JobStatusDto {
    /// Convenience constructor for scripted transports in tests.
    pub fn with_status(status: impl Into<String>) -> JobStatusDto {
        JobStatusDto { status: status.into(), error_message: None, extra: HashMap::new() }
    }

    /// The string-valued extra fields, i.e. the named result links.
    pub fn result_links(&self) -> HashMap<String, String> {
        self.extra
            .iter()
            .filter_map(|(name, value)| value.as_str().map(|url| (name.clone(), url.to_string())))
            .collect()
    }
}
