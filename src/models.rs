// src/models.rs
//
// Wire and view types for flows and the gateway connection settings.  All
// JSON exchanged with the backend is camelCase.
//
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, PORT_MAX, PORT_MIN};
use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latest_version: Option<String>,
    /// `None` means the flow has never been published.
    #[serde(default)]
    pub published_version: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Flow {
    /// Only published flows can be executed.
    pub fn can_execute(&self) -> bool {
        self.published_version.is_some()
    }
}

/// Query sent to the list endpoint.  `page_index` is zero-based; any 1-based
/// display value is converted in `views::pagination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowListQuery {
    pub page_index: u32,
    pub page_size: u32,
    pub search_text: String,
}

impl Default for FlowListQuery {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            search_text: String::new(),
        }
    }
}

impl FlowListQuery {
    pub fn with_page(mut self, page_index: u32) -> Self {
        self.page_index = page_index;
        self
    }

    /// A different page size always lands on the first page.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        if page_size != self.page_size {
            self.page_index = 0;
        }
        self.page_size = page_size;
        self
    }

    /// A different search text always lands on the first page.
    pub fn with_search(mut self, search_text: &str) -> Self {
        if search_text != self.search_text {
            self.page_index = 0;
        }
        self.search_text = search_text.to_string();
        self
    }

    /// Query-string for `GET /api/flows`.  The search parameter is only sent
    /// when there is something to search for.
    pub fn to_query_string(&self) -> String {
        let mut qs = format!("page={}&size={}", self.page_index, self.page_size);
        let search = self.search_text.trim();
        if !search.is_empty() {
            qs.push_str("&search=");
            qs.push_str(&encode_component(search));
        }
        qs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowListResult {
    pub items: Vec<Flow>,
    pub total_elements: u64,
    pub query: FlowListQuery,
}

/// Spring `Page<T>` as serialised by the backend.  Only the fields the list
/// needs are decoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
}

impl PageResponse<Flow> {
    pub fn into_result(self, query: FlowListQuery) -> FlowListResult {
        FlowListResult {
            items: self.content,
            total_elements: self.total_elements,
            query,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlowRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateFlowRequest {
    /// Trim the inputs; an empty name is rejected, an empty description is
    /// dropped.
    pub fn new(name: &str, description: Option<&str>) -> Result<Self, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::field("name", "Flow name is required"));
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Ok(Self {
            name: name.to_string(),
            description,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchDeleteRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BatchDeleteReport {
    pub deleted: u32,
    pub total: u32,
}

// ---------------------------------------------------------------------------
// Gateway settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySettings {
    pub domain: String,
    pub port: u16,
    pub enabled: bool,
    // Derived by the server, read-only in the UI.
    #[serde(default)]
    pub web_socket_url: Option<String>,
    #[serde(default)]
    pub http_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl GatewaySettings {
    pub fn editable(&self) -> GatewaySettingsUpdate {
        GatewaySettingsUpdate {
            domain: self.domain.clone(),
            port: u32::from(self.port),
            enabled: self.enabled,
        }
    }
}

/// The user-editable subset.  `port` is wider than `u16` so out-of-range form
/// input can still be represented and rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySettingsUpdate {
    pub domain: String,
    pub port: u32,
    pub enabled: bool,
}

impl GatewaySettingsUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let domain = self.domain.trim();
        if domain.is_empty() {
            return Err(ApiError::field("domain", "Domain is required"));
        }
        if domain.contains("://") || domain.contains('/') || domain.contains(char::is_whitespace) {
            return Err(ApiError::field(
                "domain",
                "Domain must be a host name without scheme or path",
            ));
        }
        if !(PORT_MIN..=PORT_MAX).contains(&self.port) {
            return Err(ApiError::field(
                "port",
                format!("Port must be between {} and {}", PORT_MIN, PORT_MAX),
            ));
        }
        Ok(())
    }

    pub fn normalized(&self) -> Self {
        Self {
            domain: self.domain.trim().to_string(),
            port: self.port,
            enabled: self.enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateGatewaySettingsResponse {
    pub settings: GatewaySettings,
    #[serde(default)]
    pub message: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Percent-encode a query component (RFC 3986 unreserved characters pass
/// through).  Pure Rust so it also works in native unit tests.
pub fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Reverse of `encode_component`.  Malformed escapes are kept literally;
/// `None` when the decoded bytes are not UTF-8.
pub fn decode_component(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escaped = (bytes[i] == b'%')
            .then(|| encoded.get(i + 1..i + 3))
            .flatten()
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match escaped {
            Some(byte) => {
                out.push(byte);
                i += 3;
            }
            None => {
                out.push(bytes[i]);
                i += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}
