use std::cell::RefCell;

use serde::Deserialize;

use crate::constants::{DEFAULT_PAGE_SIZE, SEARCH_DEBOUNCE_MS};

/// API route configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    base_url: String,
    pub page_size: u32,
    pub search_debounce_ms: u32,
}

impl Default for ApiConfig {
    /// Points at the local development backend.  Only unit tests and the very
    /// first moments before `init_api_config()` rely on this value.
    fn default() -> Self {
        Self::from_url("http://localhost:8080")
    }
}

/// Shape accepted by `init_api_config_js`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub search_debounce_ms: Option<u32>,
}

impl From<JsApiConfig> for ApiConfig {
    fn from(cfg: JsApiConfig) -> Self {
        let mut out = ApiConfig::from_url(&cfg.base_url);
        if let Some(size) = cfg.page_size.filter(|s| *s > 0) {
            out.page_size = size;
        }
        if let Some(ms) = cfg.search_debounce_ms {
            out.search_debounce_ms = ms;
        }
        out
    }
}

impl ApiConfig {
    /// Resolve the base URL: build-time `API_BASE_URL`, else the page origin.
    pub fn detect() -> Self {
        if let Some(url) = option_env!("API_BASE_URL") {
            return Self::from_url(url);
        }
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .map(|origin| Self::from_url(&origin))
            .unwrap_or_default()
    }

    /// Create a new ApiConfig from a URL string
    pub fn from_url(url: &str) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: SEARCH_DEBOUNCE_MS,
        }
    }

    /// Get the base URL for all API calls
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get a full API URL for a given path
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

thread_local! {
    static API_CONFIG: RefCell<Option<ApiConfig>> = const { RefCell::new(None) };
}

/// Store the detected configuration unless JS already provided one.
pub fn init_api_config() {
    API_CONFIG.with(|cell| {
        let mut cfg = cell.borrow_mut();
        if cfg.is_none() {
            *cfg = Some(ApiConfig::detect());
        }
    });
}

pub fn set_api_config(config: ApiConfig) {
    API_CONFIG.with(|cell| *cell.borrow_mut() = Some(config));
}

pub fn current_config() -> ApiConfig {
    API_CONFIG.with(|cell| cell.borrow().clone().unwrap_or_default())
}
