//! JSON body for handle create/update requests
//!
//! The body is a `values` list with two records, always in this order:
//!
//! ```json
//! {
//!   "values": [
//!     {"index": 1, "type": "URL",
//!      "data": {"format": "string", "value": "https://example.com"}},
//!     {"index": 100, "type": "HS_ADMIN",
//!      "data": {"format": "admin",
//!               "value": {"index": 200, "handle": "1000/TEST",
//!                         "permissions": "011111110011", "format": "admin"}}}
//!   ]
//! }
//! ```
//!
//! The API schema wants `format: "admin"` on both the data envelope and the
//! embedded admin value.

use serde::{Deserialize, Serialize};

use crate::config::HandleConfig;

pub const URL_INDEX: u32 = 1;
pub const ADMIN_INDEX: u32 = 100;
/// Index of the administrator handle value referenced by HS_ADMIN
pub const ADMIN_HANDLE_INDEX: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlePayload {
    pub values: Vec<HandleValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleValue {
    pub index: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ValueData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", content = "value", rename_all = "lowercase")]
pub enum ValueData {
    String(String),
    Admin(AdminValue),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminValue {
    pub index: u32,
    pub handle: String,
    pub permissions: String,
    pub format: String,
}

impl HandleValue {
    pub fn url(target: impl Into<String>) -> Self {
        Self {
            index: URL_INDEX,
            kind: "URL".to_string(),
            data: ValueData::String(target.into()),
        }
    }

    pub fn admin(handle: impl Into<String>, permissions: impl Into<String>) -> Self {
        Self {
            index: ADMIN_INDEX,
            kind: "HS_ADMIN".to_string(),
            data: ValueData::Admin(AdminValue {
                index: ADMIN_HANDLE_INDEX,
                handle: handle.into(),
                permissions: permissions.into(),
                format: "admin".to_string(),
            }),
        }
    }
}

impl HandlePayload {
    pub fn from_config(config: &HandleConfig) -> Self {
        Self {
            values: vec![
                HandleValue::url(config.handle_url.clone()),
                HandleValue::admin(config.resolved_prefix(), config.permissions.clone()),
            ],
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
