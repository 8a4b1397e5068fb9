//! Non-visual view-state controllers, one per screen.

pub mod flow_list;
pub mod gateway_settings;

pub use flow_list::{DeleteOutcome, FetchOutcome, FlowListController, FlowListState};
pub use gateway_settings::{GatewaySettingsController, SettingsPhase, SettingsState};
