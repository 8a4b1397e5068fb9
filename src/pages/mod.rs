// src/pages/mod.rs
//
// Page presenters and their mount/unmount entry points.
//
pub mod flow_list;
pub mod gateway_settings;

pub use flow_list::{mount_flow_list, unmount_flow_list, FlowListPage, FlowListView};
pub use gateway_settings::{mount_gateway_settings, unmount_gateway_settings, GatewaySettingsPage};

/// User-visible outcome of an intent, shown as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn show(&self) {
        match self {
            Notice::Success(msg) => crate::toast::success(msg),
            Notice::Error(msg) => crate::toast::error(msg),
        }
    }
}
