// Re-export network modules
pub mod api_client;
pub mod config;
pub mod remote;

// Re-export commonly used items
pub use api_client::HttpApiClient;
pub use config::{current_config, init_api_config, set_api_config, ApiConfig};
pub use remote::{FlowApi, GatewayApi};
