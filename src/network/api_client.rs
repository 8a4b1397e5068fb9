use async_trait::async_trait;
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use super::config::{current_config, ApiConfig};
use super::remote::{FlowApi, GatewayApi};
use crate::constants::ACCESS_TOKEN_KEY;
use crate::debug_log;
use crate::error::ApiError;
use crate::models::{
    encode_component, BatchDeleteReport, BatchDeleteRequest, CreateFlowRequest, Flow,
    FlowListQuery, FlowListResult, GatewaySettings, GatewaySettingsUpdate, PageResponse,
    UpdateGatewaySettingsResponse,
};

// ----------------------------------------------------------------------------
// Helper – read the persisted JWT from localStorage
// ----------------------------------------------------------------------------

fn current_token() -> Option<String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(ACCESS_TOKEN_KEY).ok().flatten())
        .filter(|t| !t.is_empty())
}

// REST client for the flow and gateway endpoints, backed by `window.fetch`.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    config: ApiConfig,
}

impl Default for HttpApiClient {
    fn default() -> Self {
        Self::new(current_config())
    }
}

impl HttpApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.fetch_json(&self.config.url(path), "GET", None).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn send_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        method: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = serde_json::to_string(body)?;
        let text = self
            .fetch_json(&self.config.url(path), method, Some(&payload))
            .await?;
        Ok(serde_json::from_str(&text)?)
    }

    // Helper function to make fetch requests.  Non-2xx responses are mapped
    // onto `ApiError` using the backend's error envelope.
    pub async fn fetch_json(
        &self,
        url: &str,
        method: &str,
        body: Option<&str>,
    ) -> Result<String, ApiError> {
        use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

        debug_log!("{} {}", method, url);

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);

        let headers = Headers::new()?;
        headers.append("Accept", "application/json")?;
        if let Some(jwt) = current_token() {
            headers.append("Authorization", &format!("Bearer {}", jwt))?;
        }
        if let Some(data) = body {
            opts.set_body(&JsValue::from_str(data));
            headers.append("Content-Type", "application/json")?;
        }
        opts.set_headers(&headers);

        let request = Request::new_with_str_and_init(url, &opts)?;

        let window = web_sys::window().ok_or_else(|| ApiError::request("no global window exists"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let resp: Response = resp_value.dyn_into()?;

        let text = JsFuture::from(resp.text()?).await?;
        let text = text.as_string().unwrap_or_default();

        if !resp.ok() {
            let err = ApiError::from_response(resp.status(), &resp.status_text(), &text);
            debug_log!("{} {} failed: {}", method, url, err);
            return Err(err);
        }

        Ok(text)
    }
}

#[async_trait(?Send)]
impl FlowApi for HttpApiClient {
    async fn list_flows(&self, query: &FlowListQuery) -> Result<FlowListResult, ApiError> {
        let page: PageResponse<Flow> = self
            .get_json(&format!("/flows?{}", query.to_query_string()))
            .await?;
        Ok(page.into_result(query.clone()))
    }

    async fn create_flow(&self, request: &CreateFlowRequest) -> Result<Flow, ApiError> {
        self.send_json("/flows", "POST", request).await
    }

    async fn delete_flow(&self, id: &str) -> Result<(), ApiError> {
        let url = self.config.url(&format!("/flows/{}", encode_component(id)));
        self.fetch_json(&url, "DELETE", None).await?;
        Ok(())
    }

    async fn clone_flow(&self, id: &str, name: Option<&str>) -> Result<Flow, ApiError> {
        let mut path = format!("/flows/{}/clone", encode_component(id));
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            path.push_str("?name=");
            path.push_str(&encode_component(name));
        }
        let text = self.fetch_json(&self.config.url(&path), "POST", None).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn batch_delete_flows(&self, ids: &[String]) -> Result<BatchDeleteReport, ApiError> {
        let body = BatchDeleteRequest { ids: ids.to_vec() };
        self.send_json("/flows/batch", "DELETE", &body).await
    }
}

#[async_trait(?Send)]
impl GatewayApi for HttpApiClient {
    async fn get_gateway_settings(&self) -> Result<GatewaySettings, ApiError> {
        self.get_json("/settings/gateway").await
    }

    async fn update_gateway_settings(
        &self,
        update: &GatewaySettingsUpdate,
    ) -> Result<UpdateGatewaySettingsResponse, ApiError> {
        self.send_json("/settings/gateway", "PUT", update).await
    }
}
