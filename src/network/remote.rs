//! Contracts for the backend endpoints the two screens consume.
//!
//! Controllers only see these traits; `HttpApiClient` is the browser
//! implementation and the unit tests script their own.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{
    BatchDeleteReport, CreateFlowRequest, Flow, FlowListQuery, FlowListResult, GatewaySettings,
    GatewaySettingsUpdate, UpdateGatewaySettingsResponse,
};

#[async_trait(?Send)]
pub trait FlowApi {
    async fn list_flows(&self, query: &FlowListQuery) -> Result<FlowListResult, ApiError>;

    async fn create_flow(&self, request: &CreateFlowRequest) -> Result<Flow, ApiError>;

    async fn delete_flow(&self, id: &str) -> Result<(), ApiError>;

    async fn clone_flow(&self, id: &str, name: Option<&str>) -> Result<Flow, ApiError>;

    async fn batch_delete_flows(&self, ids: &[String]) -> Result<BatchDeleteReport, ApiError>;
}

#[async_trait(?Send)]
pub trait GatewayApi {
    async fn get_gateway_settings(&self) -> Result<GatewaySettings, ApiError>;

    async fn update_gateway_settings(
        &self,
        update: &GatewaySettingsUpdate,
    ) -> Result<UpdateGatewaySettingsResponse, ApiError>;
}
