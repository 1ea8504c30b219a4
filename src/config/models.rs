use crate::humanize::HumanDuration;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

pub type HeadersMap = BTreeMap<String, String>;

/// Settings for a single handle operation
///
/// Every field has a default so that loading from partial sources never
/// fails on a missing key; the validator reports all gaps in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Builder)]
#[serde(default)]
pub struct HandleConfig {
    /// Private key (PEM) presented for mutual TLS
    #[builder(into)]
    pub key: PathBuf,
    /// Client certificate (PEM) presented for mutual TLS
    #[builder(into)]
    pub cert: PathBuf,
    /// Local handle identifier, e.g. "123456"
    #[builder(into)]
    pub handle_name: String,
    /// URL the handle resolves to
    #[builder(into)]
    pub handle_url: String,
    /// Base URL of the Handle API, e.g. "https://epic.example.org/api/handles"
    #[builder(into)]
    pub api_base_url: String,
    #[builder(into)]
    pub prefix: HandlePrefix,
    /// HS_ADMIN permission bit-string, e.g. "011111110011"
    #[builder(into)]
    pub permissions: String,
    /// "true", "false", or empty to omit the query parameter
    #[builder(into, default = String::from(DEFAULT_OVERWRITE))]
    pub overwrite: String,
    /// Verify the API server certificate
    #[builder(default)]
    pub verify_tls: bool,
    #[builder(default)]
    pub extra_headers: HeadersMap,
    /// Request timeout, left to the transport default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<HumanDuration>,
}

pub(crate) const DEFAULT_OVERWRITE: &str = "true";

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            key: PathBuf::new(),
            cert: PathBuf::new(),
            handle_name: String::new(),
            handle_url: String::new(),
            api_base_url: String::new(),
            prefix: HandlePrefix::default(),
            permissions: String::new(),
            overwrite: DEFAULT_OVERWRITE.to_string(),
            verify_tls: false,
            extra_headers: HeadersMap::new(),
            timeout: None,
        }
    }
}

/// Handle namespace, either "org/env" as one string or as two parts
///
/// In TOML: `prefix = "1000/TEST"` or
///
/// ```toml
/// [prefix]
/// org = "1000"
/// env = "TEST"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum HandlePrefix {
    Combined(String),
    Split {
        #[serde(default)]
        org: String,
        #[serde(default)]
        env: String,
    },
}

impl HandlePrefix {
    pub fn split(org: impl Into<String>, env: impl Into<String>) -> Self {
        HandlePrefix::Split {
            org: org.into(),
            env: env.into(),
        }
    }

    /// The prefix as it appears in URLs and the HS_ADMIN record
    pub fn resolve(&self) -> String {
        match self {
            HandlePrefix::Combined(prefix) => prefix.clone(),
            HandlePrefix::Split { org, env } => format!("{}/{}", org, env),
        }
    }

    /// Names of the components that are empty
    pub fn empty_components(&self) -> Vec<&'static str> {
        match self {
            HandlePrefix::Combined(prefix) if prefix.trim().is_empty() => vec!["prefix"],
            HandlePrefix::Combined(_) => vec![],
            HandlePrefix::Split { org, env } => {
                let mut empty = Vec::new();
                if org.trim().is_empty() {
                    empty.push("prefix.org");
                }
                if env.trim().is_empty() {
                    empty.push("prefix.env");
                }
                empty
            }
        }
    }
}

impl Default for HandlePrefix {
    fn default() -> Self {
        HandlePrefix::Combined(String::new())
    }
}

impl From<&str> for HandlePrefix {
    fn from(value: &str) -> Self {
        HandlePrefix::Combined(value.to_string())
    }
}

impl From<String> for HandlePrefix {
    fn from(value: String) -> Self {
        HandlePrefix::Combined(value)
    }
}

impl From<(&str, &str)> for HandlePrefix {
    fn from((org, env): (&str, &str)) -> Self {
        HandlePrefix::split(org, env)
    }
}

impl fmt::Display for HandlePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve())
    }
}
